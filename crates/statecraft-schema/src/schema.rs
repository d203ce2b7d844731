use crate::{
    entry::SchemaEntry,
    error::SchemaError,
    normalize::{SchemaNormalizer, json_kind, parse_field_map},
    registry::{TypeDefinition, TypeRegistry},
    table::unique_table,
    validate::validate_error_name,
};
use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

///
/// SchemaSource
///
/// The raw declaration sections as loaded from a config file. Every section is
/// an insertion-ordered map, so declaration order survives loading. Unknown
/// sections and keys declared twice are load errors.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaSource {
    #[serde(deserialize_with = "unique_table")]
    pub enums: Map<String, JsonValue>,

    #[serde(deserialize_with = "unique_table")]
    pub types: Map<String, JsonValue>,

    #[serde(deserialize_with = "unique_table")]
    pub entries: Map<String, JsonValue>,

    #[serde(deserialize_with = "unique_table")]
    pub errors: Map<String, JsonValue>,
}

///
/// ErrorCode
///
/// A named abort message. Names are re-cased for the generated constant and
/// assertion helper.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ErrorCode {
    pub name: String,
    pub message: String,
}

impl ErrorCode {
    /// `notFound` -> `NOT_FOUND`
    #[must_use]
    pub fn constant_name(&self) -> String {
        self.name.to_case(Case::UpperSnake)
    }

    /// `notFound` -> `not_found_error`
    #[must_use]
    pub fn fn_name(&self) -> String {
        format!("{}_error", self.name.to_case(Case::Snake))
    }
}

///
/// Schema
///
/// The frozen result of one schema build: registry, normalized entries and
/// error codes, each in declaration order. Nothing mutates it afterwards.
///

#[derive(Clone, Debug)]
pub struct Schema {
    pub registry: TypeRegistry,
    pub entries: Vec<SchemaEntry>,
    pub errors: Vec<ErrorCode>,
}

impl Schema {
    /// Build the whole schema, failing on the first invalid declaration.
    ///
    /// Enums register first, then composite types in declaration order, then
    /// entries are normalized, then error codes are checked.
    pub fn build(source: &SchemaSource) -> Result<Self, SchemaError> {
        let mut registry = TypeRegistry::new();

        for (name, raw) in &source.enums {
            registry.register(name, TypeDefinition::Enum(parse_variants(name, raw)?))?;
        }
        for (name, raw) in &source.types {
            registry.register(name, TypeDefinition::Composite(parse_field_map(name, raw)?))?;
        }

        let entries = {
            let mut normalizer = SchemaNormalizer::new(&registry);
            source
                .entries
                .iter()
                .map(|(name, raw)| normalizer.normalize_raw(name, raw))
                .collect::<Result<Vec<_>, _>>()?
        };

        let errors = parse_errors(&source.errors)?;

        tracing::debug!(
            types = registry.len(),
            entries = entries.len(),
            errors = errors.len(),
            "schema built"
        );

        Ok(Self {
            registry,
            entries,
            errors,
        })
    }

    #[must_use]
    pub fn entry(&self, name: &str) -> Option<&SchemaEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Entries that own on-chain storage.
    pub fn stored_entries(&self) -> impl Iterator<Item = &SchemaEntry> {
        self.entries.iter().filter(|e| !e.offchain)
    }
}

fn parse_variants(name: &str, raw: &JsonValue) -> Result<Vec<String>, SchemaError> {
    let JsonValue::Array(items) = raw else {
        return Err(SchemaError::shape(
            name,
            format!("enum variants must be a list, found {}", json_kind(raw)),
        ));
    };

    items
        .iter()
        .map(|item| match item {
            JsonValue::String(variant) => Ok(variant.clone()),
            other => Err(SchemaError::shape(
                name,
                format!("enum variants must be strings, found {}", json_kind(other)),
            )),
        })
        .collect()
}

fn parse_errors(raw: &Map<String, JsonValue>) -> Result<Vec<ErrorCode>, SchemaError> {
    let mut constants = BTreeMap::<String, &str>::new();
    let mut errors = Vec::with_capacity(raw.len());

    for (name, message) in raw {
        validate_error_name(name)?;

        let JsonValue::String(message) = message else {
            return Err(SchemaError::InvalidErrorCode {
                name: name.clone(),
                reason: format!("message must be a string, found {}", json_kind(message)),
            });
        };
        if !message.is_ascii() {
            return Err(SchemaError::InvalidErrorCode {
                name: name.clone(),
                reason: "message must be ASCII".to_string(),
            });
        }

        let code = ErrorCode {
            name: name.clone(),
            message: message.clone(),
        };
        if let Some(previous) = constants.insert(code.constant_name(), name) {
            return Err(SchemaError::InvalidErrorCode {
                name: name.clone(),
                reason: format!("collides with '{previous}'"),
            });
        }

        errors.push(code);
    }

    Ok(errors)
}

///
/// TESTS
///
