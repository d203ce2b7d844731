//! Identifier rules shared by every declared name.

pub mod naming;

pub use naming::{
    validate_error_name, validate_field_name, validate_ident, validate_type_name,
    validate_variant_name,
};
