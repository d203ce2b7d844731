use crate::{MAX_IDENT_LEN, error::SchemaError};

/// Move keywords that can never be used as identifiers.
const RESERVED_WORDS: &[&str] = &[
    "abort", "acquires", "as", "break", "const", "continue", "copy", "else", "enum", "false",
    "friend", "fun", "has", "if", "let", "loop", "macro", "match", "module", "move", "mut",
    "native", "phantom", "public", "return", "struct", "true", "type", "use", "while",
];

/// Locals and parameters used by generated accessors; fields must not shadow them.
const GENERATED_LOCALS: &[&str] = &["ctx", "record_key", "record_value", "records", "self", "slot"];

/// Ensure a lower-case identifier (entries, projects) is well formed.
pub fn validate_ident(ident: &str) -> Result<(), SchemaError> {
    validate_common(ident)?;

    let mut chars = ident.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_lowercase()) {
        return Err(SchemaError::ident(ident, "must start with a lowercase letter"));
    }
    if !chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_') {
        return Err(SchemaError::ident(
            ident,
            "may only contain lowercase letters, digits and '_'",
        ));
    }

    Ok(())
}

/// Field names follow `validate_ident` and must not collide with generated locals.
pub fn validate_field_name(ident: &str) -> Result<(), SchemaError> {
    validate_ident(ident)?;

    if GENERATED_LOCALS.contains(&ident) {
        return Err(SchemaError::ident(ident, "is reserved by generated accessors"));
    }

    Ok(())
}

/// Type names the generated schema module defines or imports itself.
const GENERATED_TYPES: &[&str] = &[
    "Option", "RemoveRecord", "Schema", "SetRecord", "String", "Table", "TxContext", "UID",
];

/// Ensure a type name (enum, composite) is a Move struct identifier that does
/// not shadow a generated or imported type.
pub fn validate_type_name(ident: &str) -> Result<(), SchemaError> {
    validate_upper(ident)?;

    if GENERATED_TYPES.contains(&ident) {
        return Err(SchemaError::ident(ident, "is reserved by the generated module"));
    }

    Ok(())
}

/// Enum variants share the struct naming rule.
pub fn validate_variant_name(ident: &str) -> Result<(), SchemaError> {
    validate_upper(ident)
}

/// Error-code names may be snake, camel or Pascal case; they are re-cased on emit.
pub fn validate_error_name(ident: &str) -> Result<(), SchemaError> {
    validate_common(ident)?;

    let mut chars = ident.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        return Err(SchemaError::ident(ident, "must start with a letter"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SchemaError::ident(
            ident,
            "may only contain letters, digits and '_'",
        ));
    }

    Ok(())
}

fn validate_upper(ident: &str) -> Result<(), SchemaError> {
    validate_common(ident)?;

    let mut chars = ident.chars();
    if !chars.next().is_some_and(|c| c.is_ascii_uppercase()) {
        return Err(SchemaError::ident(ident, "must start with an uppercase letter"));
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SchemaError::ident(
            ident,
            "may only contain letters, digits and '_'",
        ));
    }

    Ok(())
}

fn validate_common(ident: &str) -> Result<(), SchemaError> {
    if ident.is_empty() {
        return Err(SchemaError::ident(ident, "is empty"));
    }
    if ident.len() > MAX_IDENT_LEN {
        return Err(SchemaError::ident(
            ident,
            format!("exceeds max length {MAX_IDENT_LEN}"),
        ));
    }
    if RESERVED_WORDS.contains(&ident) {
        return Err(SchemaError::ident(ident, "is a reserved word"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_reserved_words() {
        assert!(validate_ident("").is_err(), "empty identifiers should fail");
        assert!(
            validate_ident("struct").is_err(),
            "reserved keywords should be rejected"
        );
    }

    #[test]
    fn accepts_snake_case_identifier() {
        assert!(validate_ident("player_stats2").is_ok());
    }

    #[test]
    fn lower_idents_reject_upper_and_punctuation() {
        assert!(validate_ident("Player").is_err());
        assert!(validate_ident("player-stats").is_err());
        assert!(validate_ident("9lives").is_err());
    }

    #[test]
    fn type_names_must_start_upper() {
        assert!(validate_type_name("AccountStatus").is_ok());
        assert!(validate_type_name("accountStatus").is_err());
        assert!(validate_variant_name("Frozen").is_ok());
        assert!(validate_variant_name("frozen").is_err());
    }

    #[test]
    fn type_names_cannot_shadow_generated_types() {
        assert!(validate_type_name("Schema").is_err());
        assert!(validate_type_name("SetRecord").is_err());
        assert!(validate_variant_name("Schema").is_ok());
    }

    #[test]
    fn field_names_cannot_shadow_generated_locals() {
        let err = validate_field_name("record_key").expect_err("generated local must be rejected");
        assert!(
            matches!(err, SchemaError::InvalidIdentifier { ref reason, .. } if reason.contains("generated")),
            "unexpected error: {err:?}"
        );
        assert!(validate_field_name("value").is_ok());
    }

    #[test]
    fn length_limit_is_enforced() {
        let long = "a".repeat(MAX_IDENT_LEN + 1);
        assert!(validate_ident(&long).is_err());
        assert!(validate_ident(&"a".repeat(MAX_IDENT_LEN)).is_ok());
    }

    #[test]
    fn error_names_accept_pascal_and_snake() {
        assert!(validate_error_name("AccountNotFound").is_ok());
        assert!(validate_error_name("account_not_found").is_ok());
        assert!(validate_error_name("_hidden").is_err());
    }
}
