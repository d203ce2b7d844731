//! JSON bridge for building call arguments and rendering decoded state.
//!
//! Integers wider than 32 bits render as decimal strings so that no JSON
//! consumer loses precision; on input both numbers and decimal strings are
//! accepted and range-checked.

use crate::{
    error::CodecError,
    value::{Address, Value},
};
use num_bigint::BigUint;
use serde_json::{Map, Value as JsonValue};
use statecraft_schema::types::{CompositeType, ScalarType, TypeRef};

/// Render a value as JSON.
#[must_use]
pub fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::U8(n) => JsonValue::from(*n),
        Value::U16(n) => JsonValue::from(*n),
        Value::U32(n) => JsonValue::from(*n),
        Value::U64(n) => JsonValue::String(n.to_string()),
        Value::U128(n) => JsonValue::String(n.to_string()),
        Value::U256(n) => JsonValue::String(n.to_string()),
        Value::Address(a) => JsonValue::String(a.to_string()),
        Value::String(s) | Value::Enum(s) => JsonValue::String(s.clone()),
        Value::Struct(fields) => JsonValue::Object(
            fields
                .iter()
                .map(|(name, v)| (name.clone(), to_json(v)))
                .collect::<Map<_, _>>(),
        ),
        Value::Vector(items) => JsonValue::Array(items.iter().map(to_json).collect()),
    }
}

/// Build a value of type `ty` from JSON.
pub fn from_json(ty: &TypeRef, json: &JsonValue) -> Result<Value, CodecError> {
    match ty {
        TypeRef::Scalar(s) => scalar_from_json(*s, json),
        TypeRef::Enum(e) => {
            let JsonValue::String(variant) = json else {
                return Err(CodecError::mismatch(e.name.clone(), json_kind(json)));
            };
            if e.tag_of(variant).is_none() {
                return Err(CodecError::invalid(format!(
                    "'{variant}' is not a variant of {}",
                    e.name
                )));
            }

            Ok(Value::Enum(variant.clone()))
        }
        TypeRef::Composite(c) => composite_from_json(c, json),
        TypeRef::Sequence(element) => {
            let JsonValue::Array(items) = json else {
                return Err(CodecError::mismatch(ty.to_string(), json_kind(json)));
            };

            items
                .iter()
                .map(|item| from_json(element, item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Vector)
        }
    }
}

fn composite_from_json(ty: &CompositeType, json: &JsonValue) -> Result<Value, CodecError> {
    let JsonValue::Object(map) = json else {
        return Err(CodecError::mismatch(ty.name.clone(), json_kind(json)));
    };
    if let Some(extra) = map.keys().find(|k| ty.field(k).is_none()) {
        return Err(CodecError::mismatch(
            format!("a field of {}", ty.name),
            format!("unknown field '{extra}'"),
        ));
    }

    // output follows declared order whatever the object order
    let fields = ty
        .fields
        .iter()
        .map(|field| {
            let raw = map.get(&field.name).ok_or_else(|| {
                CodecError::mismatch(format!("field '{}' of {}", field.name, ty.name), "nothing")
            })?;

            Ok((field.name.clone(), from_json(&field.ty, raw)?))
        })
        .collect::<Result<Vec<_>, CodecError>>()?;

    Ok(Value::Struct(fields))
}

fn scalar_from_json(scalar: ScalarType, json: &JsonValue) -> Result<Value, CodecError> {
    let value = match scalar {
        ScalarType::Bool => match json {
            JsonValue::Bool(b) => Value::Bool(*b),
            other => return Err(CodecError::mismatch("bool", json_kind(other))),
        },
        ScalarType::U8 => Value::U8(narrow(scalar, json)?),
        ScalarType::U16 => Value::U16(narrow(scalar, json)?),
        ScalarType::U32 => Value::U32(narrow(scalar, json)?),
        ScalarType::U64 => Value::U64(narrow(scalar, json)?),
        ScalarType::U128 => Value::U128(narrow(scalar, json)?),
        ScalarType::U256 => {
            let n = unsigned(scalar, json)?;
            if n.bits() > 256 {
                return Err(CodecError::invalid(format!("{n} does not fit in u256")));
            }
            Value::U256(n)
        }
        ScalarType::Address => match json {
            JsonValue::String(s) => Value::Address(s.parse::<Address>()?),
            other => return Err(CodecError::mismatch("address", json_kind(other))),
        },
        ScalarType::String => match json {
            JsonValue::String(s) => Value::String(s.clone()),
            other => return Err(CodecError::mismatch("string", json_kind(other))),
        },
    };

    Ok(value)
}

// Parse any unsigned integer from a JSON number or decimal string.
fn unsigned(scalar: ScalarType, json: &JsonValue) -> Result<BigUint, CodecError> {
    let digits = match json {
        JsonValue::Number(n) => n.to_string(),
        JsonValue::String(s) => s.trim().to_string(),
        other => return Err(CodecError::mismatch(scalar.to_string(), json_kind(other))),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CodecError::invalid(format!(
            "'{digits}' is not an unsigned integer"
        )));
    }

    digits
        .parse::<BigUint>()
        .map_err(|err| CodecError::invalid(format!("'{digits}': {err}")))
}

fn narrow<T>(scalar: ScalarType, json: &JsonValue) -> Result<T, CodecError>
where
    T: TryFrom<BigUint>,
{
    let n = unsigned(scalar, json)?;

    T::try_from(n.clone())
        .map_err(|_| CodecError::invalid(format!("{n} does not fit in {scalar}")))
}

const fn json_kind(json: &JsonValue) -> &'static str {
    match json {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

///
/// TESTS
///
