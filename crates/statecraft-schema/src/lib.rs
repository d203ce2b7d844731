//! Schema half of the statecraft pipeline.
//!
//! - `registry`: resolves type expressions and named enum/composite declarations.
//! - `normalize`: collapses the four entry shorthand forms into a `SchemaEntry`.
//! - `schema`: the frozen aggregate handed to the emitter and the codec.
//! - `table`: strict loading of declaration tables.
//! - `validate`: identifier rules shared by every declared name.

pub mod entry;
pub mod error;
pub mod normalize;
pub mod registry;
pub mod schema;
pub mod table;
pub mod types;
pub mod validate;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

/// Maximum length for any declared identifier.
pub const MAX_IDENT_LEN: usize = 64;

/// Maximum number of variants in one enum. Move caps enums at 127 variants,
/// which also keeps the one-byte wire tag identical to its ULEB128 form.
pub const MAX_ENUM_VARIANTS: usize = 127;

/// Maximum number of stacked `vector<...>` constructors in one type expression.
pub const MAX_SEQUENCE_DEPTH: usize = 2;

/// Field name used by the bare-type entry shorthand.
pub const SINGLETON_FIELD: &str = "value";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        entry::SchemaEntry,
        error::SchemaError,
        normalize::{EntryShape, SchemaNormalizer},
        registry::{TypeDefinition, TypeRegistry},
        schema::{ErrorCode, Schema, SchemaSource},
        types::{CompositeType, EnumType, Field, ScalarType, TypeRef},
    };
}
