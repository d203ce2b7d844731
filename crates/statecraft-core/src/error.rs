use thiserror::Error as ThisError;

///
/// CodecError
///
/// Failures raised while encoding or decoding one value. Errors never touch
/// registry state; the caller decides whether to retry.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum CodecError {
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),

    #[error("tag {tag} is out of range for enum '{ty}' with {variants} variants")]
    InvalidVariantTag { ty: String, tag: u8, variants: usize },

    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },

    #[error("unsupported type '{0}'")]
    UnsupportedType(String),
}

impl CodecError {
    pub(crate) fn mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::TypeMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidEncoding(reason.into())
    }
}

///
/// AddressError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address contains invalid hex: {0}")]
    InvalidHex(String),

    #[error("address has {len} hex digits (max 64)")]
    TooLong { len: usize },
}

impl From<AddressError> for CodecError {
    fn from(err: AddressError) -> Self {
        Self::InvalidEncoding(err.to_string())
    }
}
