mod address;

pub use address::Address;

use num_bigint::BigUint;

///
/// Value
///
/// A dynamically typed value whose binary layout is given by a `TypeRef`.
///
/// Enums carry the variant name; the tag is looked up from the type.
/// Struct fields must appear exactly as declared, in declared order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Value {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    U256(BigUint),
    Address(Address),
    String(String),
    Enum(String),
    Struct(Vec<(String, Self)>),
    Vector(Vec<Self>),
}

impl Value {
    /// Short label used in type mismatch diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "u8",
            Self::U16(_) => "u16",
            Self::U32(_) => "u32",
            Self::U64(_) => "u64",
            Self::U128(_) => "u128",
            Self::U256(_) => "u256",
            Self::Address(_) => "address",
            Self::String(_) => "string",
            Self::Enum(_) => "enum variant",
            Self::Struct(_) => "struct",
            Self::Vector(_) => "vector",
        }
    }

    /// Build a struct value from `(field, value)` pairs.
    pub fn record<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, Self)>,
        K: Into<String>,
    {
        Self::Struct(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn variant(name: impl Into<String>) -> Self {
        Self::Enum(name.into())
    }

    /// `vector<u8>` value from raw bytes.
    #[must_use]
    pub fn bytes(bytes: &[u8]) -> Self {
        Self::Vector(bytes.iter().copied().map(Self::U8).collect())
    }

    /// Field lookup on a struct value.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Self::Struct(fields) => fields.iter().find(|(k, _)| k == name).map(|(_, v)| v),
            _ => None,
        }
    }
}

macro_rules! impl_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from! {
    bool => Bool,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    BigUint => U256,
    Address => Address,
    String => String,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Vector(items.into_iter().map(Into::into).collect())
    }
}
