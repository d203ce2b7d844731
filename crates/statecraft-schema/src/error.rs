use thiserror::Error as ThisError;

///
/// SchemaError
///
/// Failures raised while building a registry or normalizing entries.
/// Any of these aborts the whole generation batch.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum SchemaError {
    #[error("'{owner}' declares field '{field}' more than once")]
    DuplicateField { owner: String, field: String },

    #[error("entry '{entry}' lists key '{key}' more than once")]
    DuplicateKey { entry: String, key: String },

    #[error("type name '{0}' is already registered")]
    DuplicateTypeName(String),

    #[error("enum '{ty}' declares variant '{variant}' more than once")]
    DuplicateVariant { ty: String, variant: String },

    #[error("enum '{0}' has no variants")]
    EmptyEnum(String),

    #[error("'{0}' has no fields")]
    EmptyFields(String),

    #[error("error code '{name}' is invalid: {reason}")]
    InvalidErrorCode { name: String, reason: String },

    #[error("invalid identifier '{ident}': {reason}")]
    InvalidIdentifier { ident: String, reason: String },

    #[error("entry '{entry}' names key '{key}' which is not one of its fields")]
    InvalidKeyReference { entry: String, key: String },

    #[error("malformed type expression '{0}'")]
    MalformedType(String),

    #[error("enum '{ty}' has {count} variants (max {max})")]
    TooManyVariants { ty: String, count: usize, max: usize },

    #[error("unknown type '{0}'")]
    UnknownType(String),

    #[error("entry '{entry}' matches no declaration form: {reason}")]
    UnrecognizedShape { entry: String, reason: String },

    #[error("type expression '{expr}' nests {depth} vectors (max {max})")]
    UnsupportedNesting {
        expr: String,
        depth: usize,
        max: usize,
    },
}

impl SchemaError {
    pub(crate) fn shape(entry: &str, reason: impl Into<String>) -> Self {
        Self::UnrecognizedShape {
            entry: entry.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn ident(ident: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            ident: ident.to_string(),
            reason: reason.into(),
        }
    }
}
