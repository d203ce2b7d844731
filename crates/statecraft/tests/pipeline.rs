use num_bigint::BigUint;
use proptest::prelude::*;
use statecraft::prelude::*;
use statecraft_schema::fixtures;
use std::fs;

const CONFIG: &str = r#"
[project]
name = "arena"
description = "Arena game state"

[enums]
Direction = ["North", "East", "South", "West"]

[entries]
counter = "u64"

[entries.player]
fields = { id = "address", hp = "u32", facing = "Direction" }
keys = ["id"]

[errors]
notFound = "entity not found"
"#;

#[test]
fn build_writes_the_batch_and_is_idempotent() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("statecraft.toml");
    fs::write(&config_path, CONFIG).expect("write config");
    let root = dir.path().join("contracts/arena");

    let written = statecraft::build::build(&config_path, &root).expect("first build");
    assert_eq!(written.len(), 6);
    let first: Vec<_> = written
        .iter()
        .map(|p| fs::read_to_string(p).expect("generated file"))
        .collect();

    statecraft::build::build(&config_path, &root).expect("second build");
    let second: Vec<_> = written
        .iter()
        .map(|p| fs::read_to_string(p).expect("generated file"))
        .collect();

    assert_eq!(first, second);
    assert!(first[0].contains("module arena::schema {"));
}

#[test]
fn rebuilds_keep_owner_edited_package_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("statecraft.toml");
    fs::write(&config_path, CONFIG).expect("write config");
    let root = dir.path().join("arena");

    statecraft::build::build(&config_path, &root).expect("first build");
    let manifest = root.join("Move.toml");
    assert!(fs::read_to_string(&manifest).expect("manifest").contains("[package]"));

    fs::write(&manifest, "# owned by the package author\n").expect("edit manifest");
    fs::write(root.join("sources/codegen/schema.move"), "stale\n").expect("edit schema");
    statecraft::build::build(&config_path, &root).expect("second build");

    assert_eq!(
        fs::read_to_string(&manifest).expect("manifest"),
        "# owned by the package author\n"
    );
    assert!(
        fs::read_to_string(root.join("sources/codegen/schema.move"))
            .expect("schema")
            .starts_with("// Generated by statecraft.")
    );
}

#[test]
fn invalid_config_writes_nothing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config_path = dir.path().join("statecraft.json");
    fs::write(
        &config_path,
        r#"{ "project": { "name": "arena" }, "entries": { "x": "vector<vector<vector<u8>>>" } }"#,
    )
    .expect("write config");
    let root = dir.path().join("out");

    let err = statecraft::build::build(&config_path, &root).expect_err("nesting too deep");
    assert!(
        matches!(err, BuildError::Schema(SchemaError::UnsupportedNesting { .. })),
        "unexpected error: {err:?}"
    );
    assert!(!root.exists());
}

#[test]
fn set_events_decode_through_the_entry_codec() {
    let schema = fixtures::schema();
    let balance = schema.entry("balance").expect("fixture entry");
    let codec = EntryCodec::new(balance);

    let owner = Address::from_low_byte(3);
    let record = SetRecord {
        schema_id: "balance".into(),
        entity_key: Some(
            codec
                .encode_key(&[Value::Address(owner), Value::U8(2)])
                .expect("key"),
        ),
        payload: codec
            .encode_value(&[Value::U256(BigUint::from(1_000u32))])
            .expect("value"),
    };

    let bytes = record.encode();
    let decoded = codec
        .decode_set(&SetRecord::decode(&bytes).expect("record"))
        .expect("entry fields");

    assert_eq!(
        decoded.key,
        [
            ("owner".to_string(), Value::Address(owner)),
            ("coin".to_string(), Value::U8(2)),
        ]
    );
    assert_eq!(to_json(&Value::Struct(decoded.value))["amount"], "1000");
}

#[test]
fn json_arguments_encode_like_typed_values() {
    let schema = fixtures::schema();
    let inventory = schema.entry("inventory").expect("fixture entry");
    let ty = inventory.value_type().expect("value type");

    let parsed = from_json(
        &ty,
        &serde_json::json!({
            "items": [[1, 2], []],
            "weights": ["340282366920938463463374607431768211455"],
            "active": true,
            "updated": 5,
        }),
    )
    .expect("valid json");

    let typed = Value::record([
        ("items", Value::Vector(vec![Value::bytes(&[1, 2]), Value::bytes(&[])])),
        ("weights", Value::Vector(vec![Value::U128(u128::MAX)])),
        ("active", Value::Bool(true)),
        ("updated", Value::U64(5)),
    ]);

    assert_eq!(
        encode(&ty, &parsed).expect("encode json value"),
        encode(&ty, &typed).expect("encode typed value")
    );
}

proptest! {
    #[test]
    fn counter_payloads_round_trip_through_events(n in any::<u32>()) {
        let schema = fixtures::schema();
        let codec = EntryCodec::new(schema.entry("counter").expect("fixture entry"));

        let record = SetRecord {
            schema_id: "counter".into(),
            entity_key: None,
            payload: codec.encode_value(&[Value::U32(n)]).expect("payload"),
        };
        let decoded = codec
            .decode_set(&SetRecord::decode(&record.encode()).expect("record"))
            .expect("fields");

        prop_assert_eq!(decoded.value, vec![("value".to_string(), Value::U32(n))]);
    }
}
