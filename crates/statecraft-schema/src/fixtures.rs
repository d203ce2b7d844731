//! Shared declarations for the codec and emitter test suites.

use crate::{
    registry::{TypeDefinition, TypeRegistry},
    schema::{Schema, SchemaSource},
};
use serde_json::json;

/// Raw sections covering every entry form and every scalar.
#[must_use]
pub fn source() -> SchemaSource {
    let value = json!({
        "enums": {
            "Direction": ["North", "East", "South", "West"],
            "Status": ["Active", "Frozen", "Retired"],
        },
        "types": {
            "Position": { "x": "u32", "y": "u32", "facing": "Direction" },
        },
        "entries": {
            "counter": "u32",
            "player": {
                "fields": {
                    "id": "address",
                    "name": "string",
                    "level": "u16",
                    "status": "Status",
                    "position": "Position",
                },
                "keys": ["id"],
            },
            "balance": {
                "fields": { "coin": "u8", "owner": "address", "amount": "u256" },
                "keys": ["owner", "coin"],
            },
            "inventory": {
                "fields": {
                    "items": "vector<vector<u8>>",
                    "weights": "vector<u128>",
                    "active": "bool",
                    "updated": "u64",
                },
            },
            "moves": {
                "offchain": true,
                "fields": { "player": "address", "path": "vector<Direction>" },
                "keys": ["player"],
            },
        },
        "errors": {
            "notFound": "entity not found",
            "invalid_owner": "caller is not the owner",
        },
    });

    match serde_json::from_value(value) {
        Ok(source) => source,
        Err(err) => panic!("fixture source is invalid: {err}"),
    }
}

/// The built fixture schema.
#[must_use]
pub fn schema() -> Schema {
    match Schema::build(&source()) {
        Ok(schema) => schema,
        Err(err) => panic!("fixture schema is invalid: {err}"),
    }
}

/// Just the registered types: `Direction`, `Status`, `Position`.
#[must_use]
pub fn registry() -> TypeRegistry {
    let mut registry = TypeRegistry::new();
    let definitions = [
        (
            "Direction",
            TypeDefinition::Enum(strings(&["North", "East", "South", "West"])),
        ),
        (
            "Status",
            TypeDefinition::Enum(strings(&["Active", "Frozen", "Retired"])),
        ),
        (
            "Position",
            TypeDefinition::Composite(vec![
                ("x".into(), "u32".into()),
                ("y".into(), "u32".into()),
                ("facing".into(), "Direction".into()),
            ]),
        ),
    ];

    for (name, definition) in definitions {
        if let Err(err) = registry.register(name, definition) {
            panic!("fixture type {name} is invalid: {err}");
        }
    }

    registry
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
