use crate::{MAX_ENUM_VARIANTS, MAX_SEQUENCE_DEPTH};
use derive_more::Display;
use std::{fmt, sync::Arc};

///
/// ScalarType
///
/// The closed set of built-in value types. Widths and encodings never change.
///

#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ScalarType {
    #[display("bool")]
    Bool,
    #[display("u8")]
    U8,
    #[display("u16")]
    U16,
    #[display("u32")]
    U32,
    #[display("u64")]
    U64,
    #[display("u128")]
    U128,
    #[display("u256")]
    U256,
    #[display("address")]
    Address,
    #[display("string")]
    String,
}

impl ScalarType {
    pub const ALL: [Self; 9] = [
        Self::Bool,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
        Self::U128,
        Self::U256,
        Self::Address,
        Self::String,
    ];

    /// Parse a scalar keyword. `String` is accepted as an alias of `string`.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let scalar = match keyword {
            "bool" => Self::Bool,
            "u8" => Self::U8,
            "u16" => Self::U16,
            "u32" => Self::U32,
            "u64" => Self::U64,
            "u128" => Self::U128,
            "u256" => Self::U256,
            "address" => Self::Address,
            "string" | "String" => Self::String,
            _ => return None,
        };

        Some(scalar)
    }

    /// Encoded width in bytes, or `None` for length-prefixed scalars.
    #[must_use]
    pub const fn fixed_width(self) -> Option<usize> {
        match self {
            Self::Bool | Self::U8 => Some(1),
            Self::U16 => Some(2),
            Self::U32 => Some(4),
            Self::U64 => Some(8),
            Self::U128 => Some(16),
            Self::U256 | Self::Address => Some(32),
            Self::String => None,
        }
    }

    /// Type name as written in generated Move source.
    #[must_use]
    pub const fn move_type(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::U128 => "u128",
            Self::U256 => "u256",
            Self::Address => "address",
            Self::String => "String",
        }
    }
}

///
/// EnumType
///
/// Payload-free tagged enum. A variant's position is its permanent wire tag.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EnumType {
    pub name: String,
    pub variants: Vec<String>,
}

impl EnumType {
    /// Wire tag of a variant, if declared.
    #[must_use]
    pub fn tag_of(&self, variant: &str) -> Option<u8> {
        self.variants
            .iter()
            .position(|v| v == variant)
            .and_then(|index| u8::try_from(index).ok())
    }

    /// Variant name for a wire tag, if in range.
    #[must_use]
    pub fn variant(&self, tag: u8) -> Option<&str> {
        self.variants.get(usize::from(tag)).map(String::as_str)
    }
}

///
/// Field
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: TypeRef,
}

impl Field {
    #[must_use]
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

///
/// CompositeType
///
/// Named record. Field order is load-bearing for both the generated struct
/// layout and the binary encoding.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositeType {
    pub name: String,
    pub fields: Vec<Field>,
}

impl CompositeType {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}

///
/// TypeRef
///
/// A resolved type. Enum and composite descriptors are shared read-only.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeRef {
    Scalar(ScalarType),
    Enum(Arc<EnumType>),
    Composite(Arc<CompositeType>),
    Sequence(Box<Self>),
}

impl TypeRef {
    #[must_use]
    pub fn sequence(element: Self) -> Self {
        Self::Sequence(Box::new(element))
    }

    /// Number of directly stacked sequence constructors at the top of this type.
    #[must_use]
    pub fn sequence_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self;
        while let Self::Sequence(inner) = current {
            depth += 1;
            current = inner;
        }

        depth
    }

    /// Whether every sequence stays within the supported nesting and every
    /// enum within the variant cap.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        let mut stack = vec![self];
        while let Some(ty) = stack.pop() {
            match ty {
                Self::Scalar(_) => {}
                Self::Enum(e) => {
                    if e.variants.len() > MAX_ENUM_VARIANTS {
                        return false;
                    }
                }
                Self::Composite(c) => stack.extend(c.fields.iter().map(|f| &f.ty)),
                Self::Sequence(inner) => {
                    if ty.sequence_depth() > MAX_SEQUENCE_DEPTH {
                        return false;
                    }
                    stack.push(inner);
                }
            }
        }

        true
    }

    /// Type as written in generated Move source.
    #[must_use]
    pub fn move_type(&self) -> String {
        match self {
            Self::Scalar(s) => s.move_type().to_string(),
            Self::Enum(e) => e.name.clone(),
            Self::Composite(c) => c.name.clone(),
            Self::Sequence(inner) => format!("vector<{}>", inner.move_type()),
        }
    }

    /// Short label used in diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Enum(_) => "enum",
            Self::Composite(_) => "composite",
            Self::Sequence(_) => "sequence",
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar(s) => write!(f, "{s}"),
            Self::Enum(e) => f.write_str(&e.name),
            Self::Composite(c) => f.write_str(&c.name),
            Self::Sequence(inner) => write!(f, "vector<{inner}>"),
        }
    }
}

impl From<ScalarType> for TypeRef {
    fn from(scalar: ScalarType) -> Self {
        Self::Scalar(scalar)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_keywords_round_trip_through_display() {
        for scalar in ScalarType::ALL {
            let keyword = scalar.to_string();
            assert_eq!(ScalarType::from_keyword(&keyword), Some(scalar));
        }
        assert_eq!(ScalarType::from_keyword("String"), Some(ScalarType::String));
        assert_eq!(ScalarType::from_keyword("u512"), None);
    }

    #[test]
    fn sequence_depth_counts_stacked_vectors_only() {
        let bytes = TypeRef::sequence(ScalarType::U8.into());
        assert_eq!(bytes.sequence_depth(), 1);
        assert_eq!(TypeRef::sequence(bytes.clone()).sequence_depth(), 2);
        assert_eq!(TypeRef::from(ScalarType::U8).sequence_depth(), 0);
        assert!(TypeRef::sequence(bytes.clone()).is_supported());
        assert!(!TypeRef::sequence(TypeRef::sequence(bytes)).is_supported());
    }

    #[test]
    fn enum_tags_follow_declaration_position() {
        let ty = EnumType {
            name: "Direction".into(),
            variants: vec!["North".into(), "East".into(), "South".into()],
        };

        assert_eq!(ty.tag_of("North"), Some(0));
        assert_eq!(ty.tag_of("South"), Some(2));
        assert_eq!(ty.tag_of("West"), None);
        assert_eq!(ty.variant(1), Some("East"));
        assert_eq!(ty.variant(3), None);
    }

    #[test]
    fn oversized_hand_built_enums_never_wrap_tags() {
        let ty = EnumType {
            name: "Wide".into(),
            variants: (0..300).map(|i| format!("V{i}")).collect(),
        };

        assert_eq!(ty.tag_of("V255"), Some(255));
        assert_eq!(ty.tag_of("V256"), None);
        assert_eq!(ty.tag_of("V299"), None);
        assert!(!TypeRef::Enum(Arc::new(ty)).is_supported());
    }

    #[test]
    fn move_type_renders_string_alias_and_vectors() {
        let ty = TypeRef::sequence(ScalarType::String.into());
        assert_eq!(ty.move_type(), "vector<String>");
        assert_eq!(ty.to_string(), "vector<string>");
    }
}
