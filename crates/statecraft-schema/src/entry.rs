use crate::{
    error::SchemaError,
    registry::TypeRegistry,
    types::{CompositeType, Field, TypeRef},
    validate::validate_type_name,
};
use convert_case::{Case, Casing};
use std::sync::Arc;

///
/// SchemaEntry
///
/// One declared on-chain state shape in canonical form.
///
/// `composite` holds every declared field in declaration order. `keys` is the
/// ordered key subset in *keys* declaration order, which drives both accessor
/// signatures and the key tuple encoding.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SchemaEntry {
    pub name: String,
    pub composite: Arc<CompositeType>,
    pub keys: Vec<String>,
    pub offchain: bool,
    pub singleton: bool,
}

impl SchemaEntry {
    /// Struct name of the entry's value record (`player_stats` -> `PlayerStats`).
    #[must_use]
    pub fn struct_name(&self) -> String {
        entry_struct_name(&self.name)
    }

    /// Struct name of the entry's key record.
    #[must_use]
    pub fn key_struct_name(&self) -> String {
        entry_key_struct_name(&self.name)
    }

    #[must_use]
    pub fn is_keyed(&self) -> bool {
        !self.keys.is_empty()
    }

    /// Key fields in keys declaration order.
    #[must_use]
    pub fn key_fields(&self) -> Vec<&Field> {
        self.keys
            .iter()
            .filter_map(|key| self.composite.field(key))
            .collect()
    }

    /// Non-key fields in field declaration order.
    #[must_use]
    pub fn value_fields(&self) -> Vec<&Field> {
        self.composite
            .fields
            .iter()
            .filter(|f| !self.keys.contains(&f.name))
            .collect()
    }

    /// Lookup key type: `None` without keys, the field type for a single key,
    /// otherwise the `<Entry>Key` record in keys order.
    #[must_use]
    pub fn key_type(&self) -> Option<TypeRef> {
        record_type(self.key_struct_name(), self.key_fields())
    }

    /// Stored value type: `None` when every field is a key, the field type for
    /// a single value field, otherwise the `<Entry>` record in field order.
    #[must_use]
    pub fn value_type(&self) -> Option<TypeRef> {
        record_type(self.struct_name(), self.value_fields())
    }
}

pub(crate) fn entry_struct_name(entry: &str) -> String {
    entry.to_case(Case::Pascal)
}

pub(crate) fn entry_key_struct_name(entry: &str) -> String {
    format!("{}Key", entry_struct_name(entry))
}

// A lone field stands for itself; several fields form a record.
fn record_type(name: String, fields: Vec<&Field>) -> Option<TypeRef> {
    match fields.len() {
        0 => None,
        1 => Some(fields[0].ty.clone()),
        _ => Some(TypeRef::Composite(Arc::new(CompositeType {
            name,
            fields: fields.into_iter().cloned().collect(),
        }))),
    }
}

pub(crate) fn check_struct_names(
    registry: &TypeRegistry,
    entry: &str,
) -> Result<[String; 2], SchemaError> {
    let names = [entry_struct_name(entry), entry_key_struct_name(entry)];
    for name in &names {
        validate_type_name(name)?;
        if registry.contains(name) {
            return Err(SchemaError::DuplicateTypeName(name.clone()));
        }
    }

    Ok(names)
}
