//! Runtime half of the statecraft pipeline.
//!
//! Values travel to and from the chain as canonical binary bytes whose layout
//! is fully determined by a resolved `TypeRef`. Nothing here performs I/O.

pub mod codec;
pub mod entry;
pub mod error;
pub mod json;
pub mod record;
pub mod value;

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        codec::{decode, decode_exact, encode, encode_into},
        entry::{DecodedRecord, EntryCodec, RecordFields},
        error::{AddressError, CodecError},
        json::{from_json, to_json},
        record::{RemoveRecord, SetRecord},
        value::{Address, Value},
    };
}
