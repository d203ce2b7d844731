//! Codec for the two event records every generated schema module emits.

use crate::{
    codec::{Reader, write_bytes},
    error::CodecError,
};

///
/// SetRecord
///
/// Mirrors `SetRecord { schema_id: String, entity_key: Option<vector<u8>>,
/// payload: vector<u8> }`. `entity_key` is `None` for key-less entries.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SetRecord {
    pub schema_id: String,
    pub entity_key: Option<Vec<u8>>,
    pub payload: Vec<u8>,
}

impl SetRecord {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_bytes(&mut out, self.schema_id.as_bytes());
        match &self.entity_key {
            None => out.push(0),
            Some(key) => {
                out.push(1);
                write_bytes(&mut out, key);
            }
        }
        write_bytes(&mut out, &self.payload);

        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let schema_id = reader.read_string()?;
        let entity_key = match reader.read_u8()? {
            0 => None,
            1 => Some(reader.read_bytes()?.to_vec()),
            tag => {
                return Err(CodecError::invalid(format!(
                    "option tag must be 0 or 1, found {tag}"
                )));
            }
        };
        let payload = reader.read_bytes()?.to_vec();
        finish(&reader)?;

        Ok(Self {
            schema_id,
            entity_key,
            payload,
        })
    }
}

///
/// RemoveRecord
///
/// Mirrors `RemoveRecord { schema_id: String, entity_key: vector<u8> }`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RemoveRecord {
    pub schema_id: String,
    pub entity_key: Vec<u8>,
}

impl RemoveRecord {
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        write_bytes(&mut out, self.schema_id.as_bytes());
        write_bytes(&mut out, &self.entity_key);

        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, CodecError> {
        let mut reader = Reader::new(bytes);
        let schema_id = reader.read_string()?;
        let entity_key = reader.read_bytes()?.to_vec();
        finish(&reader)?;

        Ok(Self {
            schema_id,
            entity_key,
        })
    }
}

fn finish(reader: &Reader<'_>) -> Result<(), CodecError> {
    match reader.remaining() {
        0 => Ok(()),
        n => Err(CodecError::invalid(format!("{n} trailing bytes after event record"))),
    }
}

///
/// TESTS
///
