use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use statecraft_schema::{schema::SchemaSource, table::unique_table, validate::validate_ident};
use std::{fs, path::Path};

///
/// ProjectInfo
///
/// Names the generated package. `name` becomes the Move address alias of
/// every generated module.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectInfo {
    pub name: String,

    #[serde(default)]
    pub description: String,
}

impl ProjectInfo {
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_ident(&self.name).map_err(|err| ConfigError::InvalidProject(err.to_string()))?;

        if self.description.contains(['\n', '\r']) {
            return Err(ConfigError::InvalidProject(
                "description must be a single line".to_string(),
            ));
        }

        Ok(())
    }
}

///
/// ConfigFormat
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Self::Toml),
            Some("json") => Ok(Self::Json),
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

///
/// ProjectConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "ConfigFile")]
pub struct ProjectConfig {
    pub project: ProjectInfo,

    #[serde(flatten)]
    pub schema: SchemaSource,
}

impl From<ConfigFile> for ProjectConfig {
    fn from(file: ConfigFile) -> Self {
        Self {
            project: file.project,
            schema: SchemaSource {
                enums: file.enums,
                types: file.types,
                entries: file.entries,
                errors: file.errors,
            },
        }
    }
}

///
/// ConfigFile
///
/// On-disk layout: `[project]` beside the schema sections. Spelled out
/// field by field so that an unknown section is rejected.
///

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    project: ProjectInfo,

    #[serde(default, deserialize_with = "unique_table")]
    enums: Map<String, JsonValue>,

    #[serde(default, deserialize_with = "unique_table")]
    types: Map<String, JsonValue>,

    #[serde(default, deserialize_with = "unique_table")]
    entries: Map<String, JsonValue>,

    #[serde(default, deserialize_with = "unique_table")]
    errors: Map<String, JsonValue>,
}

impl ProjectConfig {
    /// Read and parse a config file, choosing the format by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let format = ConfigFormat::from_path(path)?;
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), ?format, "loading project config");

        Self::parse(&text, format)
    }

    pub fn parse(text: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        match format {
            ConfigFormat::Json => Self::from_json_str(text),
            ConfigFormat::Toml => Self::from_toml_str(text),
        }
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.project.validate()?;

        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.project.validate()?;

        Ok(config)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const TOML: &str = r#"
[project]
name = "arena"
description = "Arena game state"

[enums]
Direction = ["North", "East", "South", "West"]

[types.Position]
x = "u32"
y = "u32"

[entries]
counter = "u64"

[entries.player]
fields = { id = "address", hp = "u32", pos = "Position" }
keys = ["id"]

[errors]
notFound = "entity not found"
"#;

    #[test]
    fn toml_keeps_declaration_order() {
        let config = ProjectConfig::from_toml_str(TOML).expect("valid toml");

        assert_eq!(config.project, ProjectInfo::new("arena", "Arena game state"));
        assert_eq!(
            config.schema.entries.keys().collect::<Vec<_>>(),
            ["counter", "player"]
        );

        let fields = config.schema.entries["player"]["fields"]
            .as_object()
            .expect("fields table");
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["id", "hp", "pos"]);
    }

    #[test]
    fn json_and_toml_agree() {
        let json = r#"{
            "project": { "name": "arena", "description": "Arena game state" },
            "enums": { "Direction": ["North", "East", "South", "West"] },
            "types": { "Position": { "x": "u32", "y": "u32" } },
            "entries": {
                "counter": "u64",
                "player": { "fields": { "id": "address", "hp": "u32", "pos": "Position" }, "keys": ["id"] }
            },
            "errors": { "notFound": "entity not found" }
        }"#;

        assert_eq!(
            ProjectConfig::from_json_str(json).expect("valid json"),
            ProjectConfig::from_toml_str(TOML).expect("valid toml")
        );
    }

    #[test]
    fn sections_are_optional() {
        let config = ProjectConfig::from_toml_str("[project]\nname = \"empty\"\n")
            .expect("project alone is enough");
        assert!(config.schema.entries.is_empty());
        assert!(config.project.description.is_empty());
    }

    #[test]
    fn project_name_is_validated() {
        let err = ProjectConfig::from_toml_str("[project]\nname = \"Arena\"\n")
            .expect_err("uppercase project name");
        assert!(
            matches!(err, ConfigError::InvalidProject(_)),
            "unexpected error: {err:?}"
        );

        let err = ProjectConfig::from_toml_str("[enums]\nDir = [\"N\"]\n")
            .expect_err("project table is required");
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn misspelled_sections_are_rejected() {
        let err = ProjectConfig::from_toml_str(
            "[project]\nname = \"arena\"\n\n[entires]\ncounter = \"u64\"\n",
        )
        .expect_err("entires is not a section");
        assert!(
            matches!(err, ConfigError::Toml(ref e) if e.to_string().contains("unknown field `entires`")),
            "unexpected error: {err:?}"
        );

        let err = ProjectConfig::from_json_str(r#"{ "project": { "nmae": "arena" } }"#)
            .expect_err("nmae is not a project key");
        assert!(matches!(err, ConfigError::Json(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn repeated_json_keys_are_rejected() {
        let err = ProjectConfig::from_json_str(
            r#"{
                "project": { "name": "arena" },
                "entries": { "pair": { "fields": { "a": "u8", "a": "u16" } } }
            }"#,
        )
        .expect_err("field a declared twice");
        assert!(
            matches!(err, ConfigError::Json(ref e) if e.to_string().contains("key 'a' is declared twice")),
            "unexpected error: {err:?}"
        );

        let err = ProjectConfig::from_json_str(
            r#"{ "project": { "name": "arena" }, "entries": { "hp": "u8", "hp": "u16" } }"#,
        )
        .expect_err("entry hp declared twice");
        assert!(matches!(err, ConfigError::Json(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let path = dir.path().join("statecraft.toml");
        let mut file = fs::File::create(&path).expect("create");
        file.write_all(TOML.as_bytes()).expect("write");
        assert!(ProjectConfig::load(&path).is_ok());

        let err = ProjectConfig::load(dir.path().join("statecraft.yaml"))
            .expect_err("yaml is not supported");
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

        let err = ProjectConfig::load(dir.path().join("missing.json")).expect_err("no file");
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
