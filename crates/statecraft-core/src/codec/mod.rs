//! Canonical binary codec.
//!
//! Layout per type:
//! - `bool`: one byte, `0` or `1`
//! - `u8`..`u256`: fixed-width little-endian
//! - `address`: 32 raw bytes
//! - `string`: ULEB128 byte length, then UTF-8
//! - `vector<T>`: ULEB128 element count, then the elements
//! - composite: fields concatenated in declared order
//! - enum: one byte holding the declared variant index

pub mod uleb128;

#[cfg(test)]
mod tests;

use crate::{
    error::CodecError,
    value::{Address, Value},
};
use num_bigint::BigUint;
use statecraft_schema::types::{CompositeType, EnumType, ScalarType, TypeRef};

const U256_BYTES: usize = 32;

/// Encode one value into a fresh buffer.
pub fn encode(ty: &TypeRef, value: &Value) -> Result<Vec<u8>, CodecError> {
    let mut out = Vec::new();
    encode_into(ty, value, &mut out)?;

    Ok(out)
}

/// Append one encoded value to `out`. On error `out` is left as it was.
pub fn encode_into(ty: &TypeRef, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    check_supported(ty)?;

    let start = out.len();
    let result = write_value(ty, value, out);
    if result.is_err() {
        out.truncate(start);
    }

    result
}

/// Decode one value from the front of `bytes`, returning it with the number
/// of bytes consumed.
pub fn decode(ty: &TypeRef, bytes: &[u8]) -> Result<(Value, usize), CodecError> {
    check_supported(ty)?;

    let mut reader = Reader::new(bytes);
    let value = read_value(ty, &mut reader)?;

    Ok((value, reader.position()))
}

/// Decode one value that must span all of `bytes`.
pub fn decode_exact(ty: &TypeRef, bytes: &[u8]) -> Result<Value, CodecError> {
    let (value, used) = decode(ty, bytes)?;
    if used != bytes.len() {
        return Err(CodecError::invalid(format!(
            "{} trailing bytes after {ty}",
            bytes.len() - used
        )));
    }

    Ok(value)
}

fn check_supported(ty: &TypeRef) -> Result<(), CodecError> {
    if ty.is_supported() {
        Ok(())
    } else {
        Err(CodecError::UnsupportedType(ty.to_string()))
    }
}

///
/// Reader
///
/// Forward-only cursor over an input buffer.
///

#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    #[must_use]
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let remaining = self.remaining();
        if n > remaining {
            return Err(CodecError::TruncatedInput {
                needed: n,
                remaining,
            });
        }

        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;

        Ok(slice)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0; N];
        out.copy_from_slice(self.take(N)?);

        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool, CodecError> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            b => Err(CodecError::invalid(format!("bool byte must be 0 or 1, found {b}"))),
        }
    }

    /// ULEB128 length followed by that many raw bytes.
    pub fn read_bytes(&mut self) -> Result<&'a [u8], CodecError> {
        let len = uleb128::read_len(self)?;

        self.take(len)
    }

    pub fn read_string(&mut self) -> Result<String, CodecError> {
        let bytes = self.read_bytes()?;

        String::from_utf8(bytes.to_vec())
            .map_err(|err| CodecError::invalid(format!("string is not UTF-8: {err}")))
    }
}

/// Append a ULEB128 length and the raw bytes.
pub fn write_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    uleb128::write(out, bytes.len() as u64);
    out.extend_from_slice(bytes);
}

///
/// ENCODE
///

fn write_value(ty: &TypeRef, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match ty {
        TypeRef::Scalar(scalar) => write_scalar(*scalar, value, out),
        TypeRef::Enum(e) => write_enum(e, value, out),
        TypeRef::Composite(c) => write_composite(c, value, out),
        TypeRef::Sequence(element) => {
            let Value::Vector(items) = value else {
                return Err(CodecError::mismatch(ty.to_string(), value.kind()));
            };

            uleb128::write(out, items.len() as u64);
            for item in items {
                write_value(element, item, out)?;
            }

            Ok(())
        }
    }
}

fn write_scalar(scalar: ScalarType, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    match (scalar, value) {
        (ScalarType::Bool, Value::Bool(b)) => out.push(u8::from(*b)),
        (ScalarType::U8, Value::U8(n)) => out.push(*n),
        (ScalarType::U16, Value::U16(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (ScalarType::U32, Value::U32(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (ScalarType::U64, Value::U64(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (ScalarType::U128, Value::U128(n)) => out.extend_from_slice(&n.to_le_bytes()),
        (ScalarType::U256, Value::U256(n)) => {
            if n.bits() > 256 {
                return Err(CodecError::invalid(format!("{n} does not fit in u256")));
            }
            let mut bytes = n.to_bytes_le();
            bytes.resize(U256_BYTES, 0);
            out.extend_from_slice(&bytes);
        }
        (ScalarType::Address, Value::Address(addr)) => out.extend_from_slice(&addr.0),
        (ScalarType::String, Value::String(s)) => write_bytes(out, s.as_bytes()),
        (scalar, value) => return Err(CodecError::mismatch(scalar.to_string(), value.kind())),
    }

    Ok(())
}

fn write_enum(ty: &EnumType, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let Value::Enum(variant) = value else {
        return Err(CodecError::mismatch(ty.name.clone(), value.kind()));
    };
    let tag = ty
        .tag_of(variant)
        .ok_or_else(|| CodecError::invalid(format!("'{variant}' is not a variant of {}", ty.name)))?;

    out.push(tag);

    Ok(())
}

fn write_composite(ty: &CompositeType, value: &Value, out: &mut Vec<u8>) -> Result<(), CodecError> {
    let Value::Struct(fields) = value else {
        return Err(CodecError::mismatch(ty.name.clone(), value.kind()));
    };
    if fields.len() != ty.fields.len() {
        return Err(CodecError::mismatch(
            format!("{} with {} fields", ty.name, ty.fields.len()),
            format!("struct with {} fields", fields.len()),
        ));
    }

    for (declared, (name, field_value)) in ty.fields.iter().zip(fields) {
        if declared.name != *name {
            return Err(CodecError::mismatch(
                format!("field '{}' of {}", declared.name, ty.name),
                format!("field '{name}'"),
            ));
        }
        write_value(&declared.ty, field_value, out)?;
    }

    Ok(())
}

///
/// DECODE
///

fn read_value(ty: &TypeRef, reader: &mut Reader<'_>) -> Result<Value, CodecError> {
    match ty {
        TypeRef::Scalar(scalar) => read_scalar(*scalar, reader),
        TypeRef::Enum(e) => {
            let tag = reader.read_u8()?;
            let variant = e.variant(tag).ok_or_else(|| CodecError::InvalidVariantTag {
                ty: e.name.clone(),
                tag,
                variants: e.variants.len(),
            })?;

            Ok(Value::Enum(variant.to_string()))
        }
        TypeRef::Composite(c) => {
            let mut fields = Vec::with_capacity(c.fields.len());
            for field in &c.fields {
                fields.push((field.name.clone(), read_value(&field.ty, reader)?));
            }

            Ok(Value::Struct(fields))
        }
        TypeRef::Sequence(element) => {
            let count = uleb128::read_len(reader)?;

            // every element takes at least one byte
            let mut items = Vec::with_capacity(count.min(reader.remaining()));
            for _ in 0..count {
                items.push(read_value(element, reader)?);
            }

            Ok(Value::Vector(items))
        }
    }
}

fn read_scalar(scalar: ScalarType, reader: &mut Reader<'_>) -> Result<Value, CodecError> {
    let value = match scalar {
        ScalarType::Bool => Value::Bool(reader.read_bool()?),
        ScalarType::U8 => Value::U8(reader.read_u8()?),
        ScalarType::U16 => Value::U16(u16::from_le_bytes(reader.read_array()?)),
        ScalarType::U32 => Value::U32(u32::from_le_bytes(reader.read_array()?)),
        ScalarType::U64 => Value::U64(u64::from_le_bytes(reader.read_array()?)),
        ScalarType::U128 => Value::U128(u128::from_le_bytes(reader.read_array()?)),
        ScalarType::U256 => Value::U256(BigUint::from_bytes_le(
            &reader.read_array::<U256_BYTES>()?,
        )),
        ScalarType::Address => Value::Address(Address::new(reader.read_array()?)),
        ScalarType::String => Value::String(reader.read_string()?),
    };

    Ok(value)
}
