//! Unsigned LEB128 lengths, in canonical (shortest) form only.

use super::Reader;
use crate::error::CodecError;

/// Append `n` as ULEB128.
pub fn write(out: &mut Vec<u8>, mut n: u64) {
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let byte = (n & 0x7f) as u8;
        n >>= 7;
        if n == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Read one ULEB128 value, rejecting overlong and overflowing encodings.
pub fn read(reader: &mut Reader<'_>) -> Result<u64, CodecError> {
    let mut value: u64 = 0;
    let mut shift = 0u32;

    loop {
        let byte = reader.read_u8()?;
        let bits = u64::from(byte & 0x7f);

        if shift == 63 && bits > 1 {
            return Err(CodecError::invalid("ULEB128 value overflows u64"));
        }
        value |= bits << shift;

        if byte & 0x80 == 0 {
            if byte == 0 && shift > 0 {
                return Err(CodecError::invalid("non-canonical ULEB128 encoding"));
            }
            return Ok(value);
        }

        shift += 7;
        if shift > 63 {
            return Err(CodecError::invalid("ULEB128 value overflows u64"));
        }
    }
}

/// Read a ULEB128 length and convert it to `usize`.
pub fn read_len(reader: &mut Reader<'_>) -> Result<usize, CodecError> {
    let len = read(reader)?;

    usize::try_from(len).map_err(|_| CodecError::invalid(format!("length {len} exceeds usize")))
}

///
/// TESTS
///
