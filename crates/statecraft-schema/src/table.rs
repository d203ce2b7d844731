//! Strict loading of declaration tables.
//!
//! `serde_json::Map` keeps the last of two equal keys, so a JSON config that
//! declares a field twice would lose one silently. Tables are read through
//! `UniqueValue` instead, which rejects a repeated key at any depth.

use serde::{
    Deserialize, Deserializer,
    de::{self, MapAccess, SeqAccess, Visitor},
};
use serde_json::{Map, Number, Value as JsonValue};
use std::fmt;

/// Deserialize a `name -> declaration` table, rejecting repeated keys.
pub fn unique_table<'de, D>(deserializer: D) -> Result<Map<String, JsonValue>, D::Error>
where
    D: Deserializer<'de>,
{
    match UniqueValue::deserialize(deserializer)?.0 {
        JsonValue::Object(map) => Ok(map),
        other => Err(de::Error::custom(format!(
            "expected a table, found {}",
            crate::normalize::json_kind(&other)
        ))),
    }
}

///
/// UniqueValue
///

struct UniqueValue(JsonValue);

impl<'de> Deserialize<'de> for UniqueValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(UniqueValueVisitor)
    }
}

struct UniqueValueVisitor;

impl<'de> Visitor<'de> for UniqueValueVisitor {
    type Value = UniqueValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a declaration value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::from(v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::from(v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Number::from_f64(v)
            .map(|n| UniqueValue(JsonValue::Number(n)))
            .ok_or_else(|| E::custom(format!("{v} is not a finite number")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::String(v.to_string())))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::String(v)))
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::Null))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(UniqueValue(JsonValue::Null))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        UniqueValue::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0).min(256));
        while let Some(UniqueValue(item)) = seq.next_element()? {
            items.push(item);
        }

        Ok(UniqueValue(JsonValue::Array(items)))
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut map = Map::new();
        while let Some(key) = access.next_key::<String>()? {
            if map.contains_key(&key) {
                return Err(de::Error::custom(format!("key '{key}' is declared twice")));
            }
            let UniqueValue(value) = access.next_value()?;
            map.insert(key, value);
        }

        Ok(UniqueValue(JsonValue::Object(map)))
    }
}

///
/// TESTS
///
