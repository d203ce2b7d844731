use super::*;
use proptest::prelude::*;
use statecraft_schema::{fixtures, types::Field};
use std::sync::Arc;

// ---- helpers -----------------------------------------------------------

fn scalar(s: ScalarType) -> TypeRef {
    TypeRef::Scalar(s)
}

fn named(registry_name: &str) -> TypeRef {
    fixtures::registry()
        .get(registry_name)
        .cloned()
        .expect("fixture type should be registered")
}

fn three_variants() -> TypeRef {
    TypeRef::Enum(Arc::new(EnumType {
        name: "Tri".into(),
        variants: vec!["A".into(), "B".into(), "C".into()],
    }))
}

fn position(x: u32, y: u32, facing: &str) -> Value {
    Value::record([
        ("x", Value::U32(x)),
        ("y", Value::U32(y)),
        ("facing", Value::variant(facing)),
    ])
}

// Every type the fixture schema can put on the wire.
fn fixture_types() -> Vec<TypeRef> {
    let schema = fixtures::schema();
    let mut types: Vec<TypeRef> = ScalarType::ALL.into_iter().map(scalar).collect();
    types.extend(schema.registry.iter().cloned());
    for entry in &schema.entries {
        types.extend(entry.key_type());
        types.extend(entry.value_type());
    }
    types.push(TypeRef::sequence(TypeRef::sequence(scalar(ScalarType::String))));

    types
}

fn arb_value(ty: &TypeRef) -> BoxedStrategy<Value> {
    match ty {
        TypeRef::Scalar(s) => match s {
            ScalarType::Bool => any::<bool>().prop_map(Value::Bool).boxed(),
            ScalarType::U8 => any::<u8>().prop_map(Value::U8).boxed(),
            ScalarType::U16 => any::<u16>().prop_map(Value::U16).boxed(),
            ScalarType::U32 => any::<u32>().prop_map(Value::U32).boxed(),
            ScalarType::U64 => any::<u64>().prop_map(Value::U64).boxed(),
            ScalarType::U128 => any::<u128>().prop_map(Value::U128).boxed(),
            ScalarType::U256 => any::<[u8; 32]>()
                .prop_map(|b| Value::U256(BigUint::from_bytes_le(&b)))
                .boxed(),
            ScalarType::Address => any::<[u8; 32]>()
                .prop_map(|b| Value::Address(Address::new(b)))
                .boxed(),
            ScalarType::String => any::<String>().prop_map(Value::String).boxed(),
        },
        TypeRef::Enum(e) => prop::sample::select(e.variants.clone())
            .prop_map(Value::Enum)
            .boxed(),
        TypeRef::Composite(c) => c
            .fields
            .iter()
            .map(|f| {
                let name = f.name.clone();
                arb_value(&f.ty).prop_map(move |v| (name.clone(), v)).boxed()
            })
            .collect::<Vec<_>>()
            .prop_map(Value::Struct)
            .boxed(),
        TypeRef::Sequence(element) => prop::collection::vec(arb_value(element), 0..6)
            .prop_map(Value::Vector)
            .boxed(),
    }
}

fn arb_typed_value() -> impl Strategy<Value = (TypeRef, Value)> {
    prop::sample::select(fixture_types()).prop_flat_map(|ty| {
        let values = arb_value(&ty);
        (Just(ty), values)
    })
}

// ---- properties --------------------------------------------------------

proptest! {
    #[test]
    fn round_trip(case in arb_typed_value()) {
        let (ty, value) = case;
        let bytes = encode(&ty, &value).expect("generated values match their type");

        let (decoded, used) = decode(&ty, &bytes).expect("encoded bytes decode");
        prop_assert_eq!(&decoded, &value);
        prop_assert_eq!(used, bytes.len());

        prop_assert_eq!(encode(&ty, &decoded).expect("re-encode"), bytes);
    }

    #[test]
    fn decode_never_panics_on_noise(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        for ty in fixture_types() {
            let _ = decode(&ty, &bytes);
        }
    }

    #[test]
    fn decode_reports_consumed_prefix(case in arb_typed_value(), tail in prop::collection::vec(any::<u8>(), 1..8)) {
        let (ty, value) = case;
        let mut bytes = encode(&ty, &value).expect("encode");
        let len = bytes.len();
        bytes.extend_from_slice(&tail);

        let (decoded, used) = decode(&ty, &bytes).expect("prefix decodes");
        prop_assert_eq!(decoded, value);
        prop_assert_eq!(used, len);
        prop_assert!(decode_exact(&ty, &bytes).is_err());
    }
}

// ---- layouts -----------------------------------------------------------

#[test]
fn scalar_layouts_are_fixed_width_little_endian() {
    let cases = [
        (ScalarType::Bool, Value::Bool(true), vec![0x01]),
        (ScalarType::U8, Value::U8(0xab), vec![0xab]),
        (ScalarType::U16, Value::U16(0x0102), vec![0x02, 0x01]),
        (ScalarType::U32, Value::U32(1), vec![1, 0, 0, 0]),
        (ScalarType::U64, Value::U64(0x0102_0304), vec![4, 3, 2, 1, 0, 0, 0, 0]),
    ];

    for (s, value, expected) in cases {
        assert_eq!(encode(&scalar(s), &value).expect("encode"), expected, "{s}");
        assert_eq!(Some(expected.len()), s.fixed_width());
    }

    let big = encode(&scalar(ScalarType::U128), &Value::U128(1)).expect("u128");
    assert_eq!(big.len(), 16);
    assert_eq!(big[0], 1);

    let huge = encode(&scalar(ScalarType::U256), &Value::U256(BigUint::from(258u32)))
        .expect("u256");
    assert_eq!(huge.len(), 32);
    assert_eq!(&huge[..3], &[2, 1, 0]);
}

#[test]
fn address_is_raw_bytes() {
    let addr = Address::from_low_byte(2);
    let bytes = encode(&scalar(ScalarType::Address), &Value::Address(addr)).expect("address");
    assert_eq!(bytes, addr.to_bytes());
}

#[test]
fn string_is_length_prefixed_utf8() {
    let bytes = encode(&scalar(ScalarType::String), &Value::from("héllo")).expect("string");
    assert_eq!(bytes[0], 6);
    assert_eq!(&bytes[1..], "héllo".as_bytes());
}

#[test]
fn composite_concatenates_fields_in_declared_order() {
    let bytes = encode(&named("Position"), &position(1, 2, "South")).expect("position");

    assert_eq!(bytes, [1, 0, 0, 0, 2, 0, 0, 0, 2]);
}

#[test]
fn enum_tag_is_declared_index() {
    let direction = named("Direction");
    for (tag, variant) in ["North", "East", "South", "West"].into_iter().enumerate() {
        let bytes = encode(&direction, &Value::variant(variant)).expect("variant");
        assert_eq!(bytes, [u8::try_from(tag).expect("small index")]);
    }
}

#[test]
fn empty_sequence_is_a_single_zero() {
    for element in [scalar(ScalarType::U8), named("Position"), TypeRef::sequence(scalar(ScalarType::U64))] {
        let ty = TypeRef::sequence(element);
        let bytes = encode(&ty, &Value::Vector(Vec::new())).expect("empty vector");
        assert_eq!(bytes, [0x00]);
        assert_eq!(decode_exact(&ty, &bytes), Ok(Value::Vector(Vec::new())));
    }
}

#[test]
fn nested_sequences_prefix_each_level() {
    let ty = TypeRef::sequence(TypeRef::sequence(scalar(ScalarType::U8)));
    let value = Value::Vector(vec![Value::bytes(&[7, 8]), Value::bytes(&[])]);

    assert_eq!(encode(&ty, &value).expect("nested"), [2, 2, 7, 8, 0]);
}

// ---- errors ------------------------------------------------------------

#[test]
fn out_of_range_tag_is_rejected() {
    let err = decode(&three_variants(), &[0x05]).expect_err("tag 5 of 3 variants");

    assert_eq!(
        err,
        CodecError::InvalidVariantTag {
            ty: "Tri".into(),
            tag: 5,
            variants: 3,
        }
    );
}

#[test]
fn unknown_variant_name_is_rejected_on_encode() {
    let err = encode(&three_variants(), &Value::variant("D")).expect_err("no such variant");
    assert!(matches!(err, CodecError::InvalidEncoding(_)), "unexpected error: {err:?}");
}

#[test]
fn truncated_input_reports_need() {
    let err = decode(&scalar(ScalarType::U64), &[1, 2, 3]).expect_err("three of eight bytes");
    assert_eq!(
        err,
        CodecError::TruncatedInput {
            needed: 8,
            remaining: 3
        }
    );

    let err = decode(&scalar(ScalarType::String), &[5, b'a'])
        .expect_err("string shorter than its prefix");
    assert!(matches!(err, CodecError::TruncatedInput { needed: 5, remaining: 1 }));
}

#[test]
fn hostile_counts_fail_without_allocating() {
    let mut bytes = Vec::new();
    uleb128::write(&mut bytes, u64::from(u32::MAX));
    let ty = TypeRef::sequence(scalar(ScalarType::U64));

    let err = decode(&ty, &bytes).expect_err("count far beyond the input");
    assert!(matches!(err, CodecError::TruncatedInput { .. }));
}

#[test]
fn invalid_bytes_are_rejected() {
    let err = decode(&scalar(ScalarType::Bool), &[2]).expect_err("bool byte 2");
    assert!(matches!(err, CodecError::InvalidEncoding(_)));

    let err = decode(&scalar(ScalarType::String), &[2, 0xff, 0xfe]).expect_err("not UTF-8");
    assert!(matches!(err, CodecError::InvalidEncoding(_)));

    let err = decode_exact(&scalar(ScalarType::U8), &[1, 2]).expect_err("trailing byte");
    assert!(matches!(err, CodecError::InvalidEncoding(_)));
}

#[test]
fn oversized_u256_is_rejected() {
    let value = Value::U256(BigUint::from(1u8) << 256);
    let err = encode(&scalar(ScalarType::U256), &value).expect_err("257 bits");
    assert!(matches!(err, CodecError::InvalidEncoding(_)));
}

#[test]
fn mismatched_values_are_rejected_and_leave_the_buffer_alone() {
    let mut out = vec![0xaa];
    let err = encode_into(&named("Position"), &Value::U8(1), &mut out)
        .expect_err("u8 is not a Position");
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
    assert_eq!(out, [0xaa]);

    // a bad last field must not leave the first fields behind
    let err = encode_into(&named("Position"), &position(1, 2, "Up"), &mut out)
        .expect_err("unknown variant");
    assert!(matches!(err, CodecError::InvalidEncoding(_)));
    assert_eq!(out, [0xaa]);
}

#[test]
fn struct_fields_must_match_declaration() {
    let ty = named("Position");

    let reordered = Value::record([
        ("y", Value::U32(2)),
        ("x", Value::U32(1)),
        ("facing", Value::variant("North")),
    ]);
    let err = encode(&ty, &reordered).expect_err("fields out of order");
    assert!(matches!(err, CodecError::TypeMismatch { .. }));

    let missing = Value::record([("x", Value::U32(1)), ("y", Value::U32(2))]);
    let err = encode(&ty, &missing).expect_err("field missing");
    assert!(matches!(err, CodecError::TypeMismatch { .. }));
}

#[test]
fn deeper_nesting_is_unsupported() {
    let too_deep = TypeRef::sequence(TypeRef::sequence(TypeRef::sequence(scalar(ScalarType::U8))));
    assert!(matches!(
        encode(&too_deep, &Value::Vector(Vec::new())),
        Err(CodecError::UnsupportedType(_))
    ));
    assert!(matches!(decode(&too_deep, &[0]), Err(CodecError::UnsupportedType(_))));

    // nesting hidden inside a composite field counts too
    let wrapper = TypeRef::Composite(Arc::new(CompositeType {
        name: "Wrapper".into(),
        fields: vec![Field::new("inner", too_deep)],
    }));
    assert!(matches!(decode(&wrapper, &[0]), Err(CodecError::UnsupportedType(_))));
}

#[test]
fn enums_past_the_variant_cap_are_unsupported() {
    let wide = TypeRef::Enum(Arc::new(EnumType {
        name: "Wide".into(),
        variants: (0..300).map(|i| format!("V{i}")).collect(),
    }));

    let err = encode(&wide, &Value::variant("V299")).expect_err("tag would not fit a byte");
    assert!(
        matches!(err, CodecError::UnsupportedType(_)),
        "unexpected error: {err:?}"
    );
    assert!(matches!(decode(&wide, &[200]), Err(CodecError::UnsupportedType(_))));
}
