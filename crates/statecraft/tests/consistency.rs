//! The generated Move module and the codec are produced independently from
//! the same schema; these tests read the emitted text back and check that it
//! describes exactly the layout the codec writes.

use statecraft::prelude::*;
use statecraft_schema::fixtures;

fn project() -> ProjectInfo {
    ProjectInfo::new("arena", "")
}

fn schema_move(schema: &Schema) -> String {
    let project = project();
    ModuleBuilder::new(&project, schema)
        .generate()
        .expect("fixture generates")
        .into_iter()
        .find(|f| f.path.ends_with("schema.move"))
        .map(|f| f.contents)
        .expect("schema.move is generated")
}

// Field names of `public struct <name> ... { ... }` as emitted.
fn struct_fields(text: &str, name: &str) -> Vec<String> {
    let header = format!("public struct {name} has ");
    let start = text
        .find(&header)
        .unwrap_or_else(|| panic!("struct {name} is emitted"));

    text[start..]
        .lines()
        .skip(1)
        .take_while(|line| line.trim() != "}")
        .map(|line| {
            line.trim()
                .split(':')
                .next()
                .expect("field line")
                .to_string()
        })
        .collect()
}

fn layout_names(ty: &TypeRef) -> Vec<String> {
    match ty {
        TypeRef::Composite(c) => c.field_names().map(str::to_string).collect(),
        other => panic!("expected a composite, found {other}"),
    }
}

#[test]
fn emitted_structs_match_codec_field_order() {
    let schema = fixtures::schema();
    let text = schema_move(&schema);

    for composite in schema.registry.composites() {
        assert_eq!(
            struct_fields(&text, &composite.name),
            composite.field_names().collect::<Vec<_>>(),
            "{}",
            composite.name
        );
    }

    let stored = schema.stored_entries();
    for ty in stored.flat_map(|e| [e.key_type(), e.value_type()]).flatten() {
        if matches!(ty, TypeRef::Composite(_)) {
            assert_eq!(struct_fields(&text, &ty.to_string()), layout_names(&ty));
        }
    }
}

#[test]
fn emitted_tags_match_codec_tags() {
    let schema = fixtures::schema();
    let text = schema_move(&schema);

    for ty in schema.registry.enums() {
        let enum_ref = TypeRef::Enum(ty.clone());
        for variant in &ty.variants {
            let bytes = encode(&enum_ref, &Value::variant(variant.as_str())).expect("encode tag");
            let arm = format!("{}::{variant} => {},", ty.name, bytes[0]);
            assert!(text.contains(&arm), "missing `{arm}`");
        }
    }
}

#[test]
fn emitted_key_parameters_match_key_layout() {
    let schema = fixtures::schema();
    let text = schema_move(&schema);
    let balance = schema.entry("balance").expect("fixture entry");

    let params = balance
        .key_fields()
        .iter()
        .map(|f| format!("{}: {}", f.name, f.ty.move_type()))
        .collect::<Vec<_>>()
        .join(", ");
    assert!(text.contains(&format!("fun has_balance(self: &Schema, {params}): bool")));

    let codec = EntryCodec::new(balance);
    let owner = Address::from_low_byte(7);
    let key = codec
        .encode_key(&[Value::Address(owner), Value::U8(1)])
        .expect("key in keys order");
    let decoded: Vec<_> = codec
        .decode_key(&key)
        .expect("decode")
        .into_iter()
        .map(|(name, _)| name)
        .collect();
    assert_eq!(decoded, ["owner", "coin"]);
}

#[test]
fn shorthand_forms_share_codec_descriptors() {
    let bare: SchemaSource =
        serde_json::from_value(serde_json::json!({ "entries": { "hp": "u32" } })).expect("bare");
    let fields: SchemaSource = serde_json::from_value(serde_json::json!({
        "entries": { "hp": { "fields": { "value": "u32" } } },
    }))
    .expect("fields");

    let bare = Schema::build(&bare).expect("bare schema");
    let fields = Schema::build(&fields).expect("fields schema");

    assert_eq!(bare.entries, fields.entries);
    assert_eq!(schema_move(&bare), schema_move(&fields));

    let a = EntryCodec::new(&bare.entries[0]);
    let b = EntryCodec::new(&fields.entries[0]);
    assert_eq!(
        a.encode_value(&[Value::U32(9)]),
        b.encode_value(&[Value::U32(9)])
    );
}
