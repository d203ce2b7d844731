//! Move source generation for statecraft schemas.
//!
//! Generation is pure string building over a frozen `Schema`; files only
//! reach disk through `write_batch`, once the whole batch exists.

mod dapp_key;
mod error;
mod errors;
mod events;
mod macros;
mod package;
mod source;
mod storage;
mod types;
mod writer;

pub use error::BuildError;
pub use package::SUI_FRAMEWORK_REV;
pub use source::SourceWriter;
pub use writer::write_batch;

use statecraft_config_build::{ProjectConfig, ProjectInfo};
use statecraft_schema::schema::Schema;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

/// Directory, relative to the package root, that receives generated modules.
pub const CODEGEN_DIR: &str = "sources/codegen";

/// First line of every generated file.
pub const HEADER: &str = "// Generated by statecraft. Do not edit.";

///
/// GeneratedFile
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratedFile {
    /// Path relative to the output root.
    pub path: PathBuf,
    pub contents: String,
    pub policy: WritePolicy,
}

impl GeneratedFile {
    /// Regenerated module under `CODEGEN_DIR`.
    #[must_use]
    pub fn codegen(file_name: &str, contents: String) -> Self {
        Self {
            path: Path::new(CODEGEN_DIR).join(file_name),
            contents,
            policy: WritePolicy::Replace,
        }
    }

    /// Starting point the package owner edits; written once, never replaced.
    #[must_use]
    pub fn scaffold(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents,
            policy: WritePolicy::CreateOnly,
        }
    }
}

///
/// WritePolicy
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum WritePolicy {
    /// Overwrite whatever is at the target.
    #[default]
    Replace,

    /// Write only when nothing exists at the target yet.
    CreateOnly,
}

/// Build the schema described by a loaded config and generate every file.
pub fn generate(config: &ProjectConfig) -> Result<Vec<GeneratedFile>, BuildError> {
    config.project.validate()?;
    let schema = Schema::build(&config.schema)?;

    ModuleBuilder::new(&config.project, &schema).generate()
}

/// Load a config file, generate, and commit the batch under `root`.
/// Returns the target path of every file in the batch.
pub fn build(
    config_path: impl AsRef<Path>,
    root: impl AsRef<Path>,
) -> Result<Vec<PathBuf>, BuildError> {
    let root = root.as_ref();
    let config = ProjectConfig::load(config_path)?;
    let files = generate(&config)?;
    write_batch(root, &files)?;

    Ok(files.iter().map(|file| root.join(&file.path)).collect())
}

///
/// ModuleBuilder
///

#[derive(Clone, Copy, Debug)]
pub struct ModuleBuilder<'a> {
    pub(crate) project: &'a ProjectInfo,
    pub(crate) schema: &'a Schema,
}

impl<'a> ModuleBuilder<'a> {
    #[must_use]
    pub const fn new(project: &'a ProjectInfo, schema: &'a Schema) -> Self {
        Self { project, schema }
    }

    /// Generate the schema module, the dapp key module and, when error codes
    /// are declared, the errors module; then the create-only package files.
    pub fn generate(&self) -> Result<Vec<GeneratedFile>, BuildError> {
        let mut files = vec![self.schema_module()?, dapp_key::generate(self)];
        if !self.schema.errors.is_empty() {
            files.push(errors::generate(self));
        }
        files.extend(package::generate(self)?);

        tracing::debug!(
            project = %self.project.name,
            files = files.len(),
            "generated move sources"
        );

        Ok(files)
    }

    /// `<project>::<module>`
    #[must_use]
    pub fn module_path(&self, module: &str) -> String {
        format!("{}::{module}", self.project.name)
    }

    pub(crate) fn header(&self, w: &mut SourceWriter) {
        w.line(HEADER);
        if !self.project.description.is_empty() {
            w.line(format!("// {}", self.project.description));
        }
        w.blank();
    }

    fn schema_module(&self) -> Result<GeneratedFile, BuildError> {
        let mut functions = FunctionNames::default();
        let mut w = SourceWriter::new();

        self.header(&mut w);
        w.block(format!("module {}", self.module_path("schema")), |w| {
            self.imports(w);
            types::generate(self, w, &mut functions);
            storage::generate(self, w, &mut functions);
            events::generate(w, &mut functions);
        });
        functions.finish()?;

        Ok(GeneratedFile::codegen("schema.move", w.finish()))
    }

    // Only what the module body uses, so the Move compiler stays quiet.
    fn imports(&self, w: &mut SourceWriter) {
        let has_entries = !self.schema.entries.is_empty();
        let has_storage = self.schema.stored_entries().next().is_some();
        let has_tables = self.schema.stored_entries().any(|e| e.is_keyed());

        if has_entries {
            w.line("use std::string::{Self, String};");
            w.line("use sui::bcs;");
        } else {
            w.line("use std::string::String;");
        }
        if has_storage {
            w.line("use sui::dynamic_field as df;");
        }
        w.line("use sui::event;");
        if has_tables {
            w.line("use sui::table::{Self, Table};");
        }
        w.blank();
    }
}

///
/// FunctionNames
///
/// Tracks every function the schema module defines so that two declarations
/// re-cased into the same name fail the build instead of the Move compiler.
///

#[derive(Debug, Default)]
pub(crate) struct FunctionNames {
    owners: BTreeMap<String, String>,
    clash: Option<BuildError>,
}

impl FunctionNames {
    pub(crate) fn declare(&mut self, name: &str, owner: &str) {
        if let Some(first) = self.owners.get(name) {
            if self.clash.is_none() {
                self.clash = Some(BuildError::DuplicateFunction {
                    name: name.to_string(),
                    first: first.clone(),
                    second: owner.to_string(),
                });
            }
            return;
        }

        self.owners.insert(name.to_string(), owner.to_string());
    }

    fn finish(self) -> Result<(), BuildError> {
        self.clash.map_or(Ok(()), Err)
    }
}

///
/// TESTS
///
