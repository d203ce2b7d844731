use crate::{
    SINGLETON_FIELD,
    entry::{SchemaEntry, check_struct_names},
    error::SchemaError,
    registry::TypeRegistry,
    types::Field,
    validate::validate_ident,
};
use serde_json::{Map, Value as JsonValue};
use std::{collections::BTreeSet, sync::Arc};

///
/// EntryShape
///
/// The four accepted shorthand forms of an entry declaration, as produced by
/// one explicit parse step. Anything else is rejected with `UnrecognizedShape`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EntryShape {
    /// `counter = "u32"`
    Bare(String),

    /// `{ fields = { ... } }`
    Fields { fields: Vec<(String, String)> },

    /// `{ fields = { ... }, keys = [...] }`
    Keyed {
        fields: Vec<(String, String)>,
        keys: Vec<String>,
    },

    /// `{ offchain = true, fields = { ... }, keys = [...]? }`
    Offchain {
        fields: Vec<(String, String)>,
        keys: Vec<String>,
    },
}

impl EntryShape {
    /// Classify one raw declaration.
    pub fn parse(entry: &str, raw: &JsonValue) -> Result<Self, SchemaError> {
        match raw {
            JsonValue::String(expr) => Ok(Self::Bare(expr.clone())),
            JsonValue::Object(map) => Self::parse_object(entry, map),
            other => Err(SchemaError::shape(
                entry,
                format!("expected a type string or a table, found {}", json_kind(other)),
            )),
        }
    }

    fn parse_object(entry: &str, map: &Map<String, JsonValue>) -> Result<Self, SchemaError> {
        if let Some(member) = map
            .keys()
            .find(|k| !matches!(k.as_str(), "fields" | "keys" | "offchain"))
        {
            return Err(SchemaError::shape(entry, format!("unknown member '{member}'")));
        }

        let fields = match map.get("fields") {
            Some(raw) => parse_field_map(entry, raw)?,
            None => return Err(SchemaError::shape(entry, "missing 'fields'")),
        };

        let keys = match map.get("keys") {
            None => Vec::new(),
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(|item| match item {
                    JsonValue::String(key) => Ok(key.clone()),
                    other => Err(SchemaError::shape(
                        entry,
                        format!("keys must be strings, found {}", json_kind(other)),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(SchemaError::shape(
                    entry,
                    format!("'keys' must be a list, found {}", json_kind(other)),
                ));
            }
        };

        let offchain = match map.get("offchain") {
            None => false,
            Some(JsonValue::Bool(flag)) => *flag,
            Some(other) => {
                return Err(SchemaError::shape(
                    entry,
                    format!("'offchain' must be a boolean, found {}", json_kind(other)),
                ));
            }
        };

        let shape = if offchain {
            Self::Offchain { fields, keys }
        } else if keys.is_empty() {
            Self::Fields { fields }
        } else {
            Self::Keyed { fields, keys }
        };

        Ok(shape)
    }
}

/// Parse an ordered `name -> type expression` table.
pub(crate) fn parse_field_map(
    owner: &str,
    raw: &JsonValue,
) -> Result<Vec<(String, String)>, SchemaError> {
    let JsonValue::Object(map) = raw else {
        return Err(SchemaError::shape(
            owner,
            format!("fields must be a table, found {}", json_kind(raw)),
        ));
    };

    map.iter()
        .map(|(name, ty)| match ty {
            JsonValue::String(expr) => Ok((name.clone(), expr.clone())),
            other => Err(SchemaError::shape(
                owner,
                format!(
                    "field '{name}' must name a type, found {}",
                    json_kind(other)
                ),
            )),
        })
        .collect()
}

pub(crate) const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "a list",
        JsonValue::Object(_) => "a table",
    }
}

///
/// SchemaNormalizer
///
/// Turns parsed shapes into canonical `SchemaEntry` values against a finished
/// registry. Tracks generated struct names so entries cannot collide with each
/// other or with registered types.
///

#[derive(Debug)]
pub struct SchemaNormalizer<'a> {
    registry: &'a TypeRegistry,
    struct_names: BTreeSet<String>,
}

impl<'a> SchemaNormalizer<'a> {
    #[must_use]
    pub const fn new(registry: &'a TypeRegistry) -> Self {
        Self {
            registry,
            struct_names: BTreeSet::new(),
        }
    }

    /// Parse and normalize one raw declaration.
    pub fn normalize_raw(&mut self, name: &str, raw: &JsonValue) -> Result<SchemaEntry, SchemaError> {
        let shape = EntryShape::parse(name, raw)?;

        self.normalize(name, shape)
    }

    /// Normalize one parsed declaration.
    pub fn normalize(&mut self, name: &str, shape: EntryShape) -> Result<SchemaEntry, SchemaError> {
        validate_ident(name)?;

        let (fields, keys, offchain) = match shape {
            EntryShape::Bare(expr) => (vec![(SINGLETON_FIELD.to_string(), expr)], Vec::new(), false),
            EntryShape::Fields { fields } => (fields, Vec::new(), false),
            EntryShape::Keyed { fields, keys } => (fields, keys, false),
            EntryShape::Offchain { fields, keys } => (fields, keys, true),
        };
        if fields.is_empty() {
            return Err(SchemaError::EmptyFields(name.to_string()));
        }

        let [struct_name, key_struct_name] = check_struct_names(self.registry, name)?;
        for generated in [&struct_name, &key_struct_name] {
            if self.struct_names.contains(generated) {
                return Err(SchemaError::DuplicateTypeName(generated.clone()));
            }
        }

        let fields = fields
            .into_iter()
            .map(|(field, expr)| Ok(Field::new(field, self.registry.resolve(&expr)?)))
            .collect::<Result<Vec<_>, SchemaError>>()?;
        let composite = TypeRegistry::composite(&struct_name, fields)?;

        let mut seen = BTreeSet::new();
        for key in &keys {
            if composite.field(key).is_none() {
                return Err(SchemaError::InvalidKeyReference {
                    entry: name.to_string(),
                    key: key.clone(),
                });
            }
            if !seen.insert(key.as_str()) {
                return Err(SchemaError::DuplicateKey {
                    entry: name.to_string(),
                    key: key.clone(),
                });
            }
        }

        let singleton = keys.is_empty()
            && composite.fields.len() == 1
            && composite.fields[0].name == SINGLETON_FIELD;

        tracing::debug!(
            entry = name,
            fields = composite.fields.len(),
            keys = keys.len(),
            offchain,
            singleton,
            "normalized entry"
        );
        self.struct_names.insert(struct_name);
        self.struct_names.insert(key_struct_name);

        Ok(SchemaEntry {
            name: name.to_string(),
            composite: Arc::new(composite),
            keys,
            offchain,
            singleton,
        })
    }
}

///
/// TESTS
///
