use crate::{
    codec::{decode_exact, encode},
    error::CodecError,
    record::SetRecord,
    value::Value,
};
use statecraft_schema::{entry::SchemaEntry, types::TypeRef};

/// Named field values in layout order.
pub type RecordFields = Vec<(String, Value)>;

///
/// DecodedRecord
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DecodedRecord {
    pub key: RecordFields,
    pub value: RecordFields,
}

///
/// EntryCodec
///
/// Encodes and decodes the key and value bytes of one entry. The layouts come
/// from `SchemaEntry::key_type` and `SchemaEntry::value_type`, the same views
/// the generated accessors are built from.
///

#[derive(Clone, Debug)]
pub struct EntryCodec<'a> {
    entry: &'a SchemaEntry,
    key: Option<TypeRef>,
    value: Option<TypeRef>,
}

impl<'a> EntryCodec<'a> {
    #[must_use]
    pub fn new(entry: &'a SchemaEntry) -> Self {
        Self {
            entry,
            key: entry.key_type(),
            value: entry.value_type(),
        }
    }

    #[must_use]
    pub const fn entry(&self) -> &'a SchemaEntry {
        self.entry
    }

    /// Encode key field values given in keys order.
    pub fn encode_key(&self, values: &[Value]) -> Result<Vec<u8>, CodecError> {
        let names = self.key_names();
        encode_part(self.key.as_ref(), &names, values, "key")
    }

    /// Encode value field values given in field order.
    pub fn encode_value(&self, values: &[Value]) -> Result<Vec<u8>, CodecError> {
        let names = self.value_names();
        encode_part(self.value.as_ref(), &names, values, "value")
    }

    pub fn decode_key(&self, bytes: &[u8]) -> Result<RecordFields, CodecError> {
        decode_part(self.key.as_ref(), &self.key_names(), bytes)
    }

    pub fn decode_value(&self, bytes: &[u8]) -> Result<RecordFields, CodecError> {
        decode_part(self.value.as_ref(), &self.value_names(), bytes)
    }

    /// Decode a `SetRecord` emitted for this entry.
    pub fn decode_set(&self, record: &SetRecord) -> Result<DecodedRecord, CodecError> {
        if record.schema_id != self.entry.name {
            return Err(CodecError::mismatch(
                format!("record for '{}'", self.entry.name),
                format!("record for '{}'", record.schema_id),
            ));
        }

        let key = match (&record.entity_key, self.entry.is_keyed()) {
            (Some(bytes), true) => self.decode_key(bytes)?,
            (None, false) => Vec::new(),
            (Some(_), false) => {
                return Err(CodecError::mismatch("no entity key", "an entity key"));
            }
            (None, true) => return Err(CodecError::mismatch("an entity key", "none")),
        };
        let value = self.decode_value(&record.payload)?;

        tracing::trace!(
            entry = %self.entry.name,
            key_fields = key.len(),
            value_fields = value.len(),
            "decoded set record"
        );

        Ok(DecodedRecord { key, value })
    }

    fn key_names(&self) -> Vec<&str> {
        self.entry
            .key_fields()
            .into_iter()
            .map(|f| f.name.as_str())
            .collect()
    }

    fn value_names(&self) -> Vec<&str> {
        self.entry
            .value_fields()
            .into_iter()
            .map(|f| f.name.as_str())
            .collect()
    }
}

fn encode_part(
    ty: Option<&TypeRef>,
    names: &[&str],
    values: &[Value],
    part: &str,
) -> Result<Vec<u8>, CodecError> {
    if values.len() != names.len() {
        return Err(CodecError::mismatch(
            format!("{} {part} values", names.len()),
            values.len().to_string(),
        ));
    }

    match (ty, values) {
        (None, _) => Ok(Vec::new()),
        (Some(ty), [single]) => encode(ty, single),
        (Some(ty), _) => {
            let record = names
                .iter()
                .zip(values)
                .map(|(name, value)| ((*name).to_string(), value.clone()))
                .collect();

            encode(ty, &Value::Struct(record))
        }
    }
}

fn decode_part(
    ty: Option<&TypeRef>,
    names: &[&str],
    bytes: &[u8],
) -> Result<RecordFields, CodecError> {
    let Some(ty) = ty else {
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        return Err(CodecError::invalid(format!(
            "{} bytes where no fields were expected",
            bytes.len()
        )));
    };

    match (decode_exact(ty, bytes)?, names) {
        (value, [single]) => Ok(vec![((*single).to_string(), value)]),
        (Value::Struct(fields), _) => Ok(fields),
        (other, _) => Err(CodecError::mismatch(ty.to_string(), other.kind())),
    }
}

///
/// TESTS
///
