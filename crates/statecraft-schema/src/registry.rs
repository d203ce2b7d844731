use crate::{
    MAX_ENUM_VARIANTS, MAX_SEQUENCE_DEPTH,
    error::SchemaError,
    types::{CompositeType, EnumType, Field, ScalarType, TypeRef},
    validate::{validate_field_name, validate_type_name, validate_variant_name},
};
use std::{
    collections::{BTreeMap, BTreeSet},
    sync::Arc,
};

///
/// TypeDefinition
///
/// Raw named declaration accepted by `TypeRegistry::register`.
/// Composite fields carry unresolved type expressions.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TypeDefinition {
    Enum(Vec<String>),
    Composite(Vec<(String, String)>),
}

///
/// TypeRegistry
///
/// Resolves type expressions against the scalar keywords and previously
/// registered enums/composites. Built through `&mut self`, then shared by `&`.
/// A composite can only reference names registered before it, so recursive
/// composites cannot be expressed.
///

#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    types: BTreeMap<String, TypeRef>,
    order: Vec<String>,
}

impl TypeRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named enum or composite and return its resolved reference.
    pub fn register(
        &mut self,
        name: &str,
        definition: TypeDefinition,
    ) -> Result<TypeRef, SchemaError> {
        validate_type_name(name)?;
        if self.contains(name) {
            return Err(SchemaError::DuplicateTypeName(name.to_string()));
        }

        let ty = match definition {
            TypeDefinition::Enum(variants) => TypeRef::Enum(Arc::new(build_enum(name, variants)?)),
            TypeDefinition::Composite(fields) => {
                TypeRef::Composite(Arc::new(self.build_composite(name, fields)?))
            }
        };

        tracing::debug!(name, kind = ty.kind(), "registered type");
        self.types.insert(name.to_string(), ty.clone());
        self.order.push(name.to_string());

        Ok(ty)
    }

    /// Resolve a scalar keyword, a `vector<...>` expression, or a registered name.
    pub fn resolve(&self, expr: &str) -> Result<TypeRef, SchemaError> {
        let (depth, base) = strip_vectors(expr)?;
        if depth > MAX_SEQUENCE_DEPTH {
            return Err(SchemaError::UnsupportedNesting {
                expr: expr.trim().to_string(),
                depth,
                max: MAX_SEQUENCE_DEPTH,
            });
        }

        let mut ty = self.resolve_name(base)?;
        for _ in 0..depth {
            ty = TypeRef::sequence(ty);
        }

        Ok(ty)
    }

    /// Build a composite from already-resolved fields without registering it.
    ///
    /// Entry key and value records are assembled this way; they share the
    /// field rules of registered composites but live in the entry namespace.
    pub fn composite(name: &str, fields: Vec<Field>) -> Result<CompositeType, SchemaError> {
        if fields.is_empty() {
            return Err(SchemaError::EmptyFields(name.to_string()));
        }

        let mut seen = BTreeSet::new();
        for field in &fields {
            validate_field_name(&field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    owner: name.to_string(),
                    field: field.name.clone(),
                });
            }
        }

        Ok(CompositeType {
            name: name.to_string(),
            fields,
        })
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&TypeRef> {
        self.types.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered types in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeRef> {
        self.order.iter().filter_map(|name| self.types.get(name))
    }

    /// Registered enums in registration order.
    pub fn enums(&self) -> impl Iterator<Item = &Arc<EnumType>> {
        self.iter().filter_map(|ty| match ty {
            TypeRef::Enum(e) => Some(e),
            _ => None,
        })
    }

    /// Registered composites in registration order.
    pub fn composites(&self) -> impl Iterator<Item = &Arc<CompositeType>> {
        self.iter().filter_map(|ty| match ty {
            TypeRef::Composite(c) => Some(c),
            _ => None,
        })
    }

    fn resolve_name(&self, name: &str) -> Result<TypeRef, SchemaError> {
        if let Some(scalar) = ScalarType::from_keyword(name) {
            return Ok(TypeRef::Scalar(scalar));
        }

        self.types
            .get(name)
            .cloned()
            .ok_or_else(|| SchemaError::UnknownType(name.to_string()))
    }

    fn build_composite(
        &self,
        name: &str,
        fields: Vec<(String, String)>,
    ) -> Result<CompositeType, SchemaError> {
        let fields = fields
            .into_iter()
            .map(|(field, expr)| Ok(Field::new(field, self.resolve(&expr)?)))
            .collect::<Result<Vec<_>, SchemaError>>()?;

        Self::composite(name, fields)
    }
}

// Validate and freeze one enum's variant list.
fn build_enum(name: &str, variants: Vec<String>) -> Result<EnumType, SchemaError> {
    if variants.is_empty() {
        return Err(SchemaError::EmptyEnum(name.to_string()));
    }
    if variants.len() > MAX_ENUM_VARIANTS {
        return Err(SchemaError::TooManyVariants {
            ty: name.to_string(),
            count: variants.len(),
            max: MAX_ENUM_VARIANTS,
        });
    }

    let mut seen = BTreeSet::new();
    for variant in &variants {
        validate_variant_name(variant)?;
        if !seen.insert(variant.as_str()) {
            return Err(SchemaError::DuplicateVariant {
                ty: name.to_string(),
                variant: variant.clone(),
            });
        }
    }

    Ok(EnumType {
        name: name.to_string(),
        variants,
    })
}

// Peel `vector<...>` constructors off an expression, returning the depth and
// the innermost name. Nesting is counted before the name is looked up.
fn strip_vectors(expr: &str) -> Result<(usize, &str), SchemaError> {
    let mut depth = 0;
    let mut rest = expr.trim();

    while let Some(inner) = rest.strip_prefix("vector") {
        let inner = inner.trim_start();
        let Some(inner) = inner.strip_prefix('<') else {
            break;
        };
        let Some(inner) = inner.trim_end().strip_suffix('>') else {
            return Err(SchemaError::MalformedType(expr.trim().to_string()));
        };

        depth += 1;
        rest = inner.trim();
    }

    if rest.is_empty() || rest.contains(['<', '>', ',', ' ']) {
        return Err(SchemaError::MalformedType(expr.trim().to_string()));
    }

    Ok((depth, rest))
}

///
/// TESTS
///
