use crate::{BuildError, GeneratedFile, ModuleBuilder, SourceWriter};
use serde::Serialize;
use std::collections::BTreeMap;

/// Sui framework branch the generated manifest builds against.
pub const SUI_FRAMEWORK_REV: &str = "framework/mainnet";

const SUI_GIT: &str = "https://github.com/MystenLabs/sui.git";
const SUI_SUBDIR: &str = "crates/sui-framework/packages/sui-framework";

///
/// Manifest
///

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    package: Package<'a>,
    dependencies: BTreeMap<&'a str, GitDependency<'a>>,
    addresses: BTreeMap<&'a str, &'a str>,
}

#[derive(Debug, Serialize)]
struct Package<'a> {
    name: &'a str,
    edition: &'a str,
}

#[derive(Debug, Serialize)]
struct GitDependency<'a> {
    git: &'a str,
    subdir: &'a str,
    rev: &'a str,
}

/// Package files the owner maintains after the first run: `Move.toml`, the
/// deploy hook and the migration version module.
pub fn generate(builder: &ModuleBuilder<'_>) -> Result<Vec<GeneratedFile>, BuildError> {
    Ok(vec![
        GeneratedFile::scaffold("Move.toml", manifest(builder)?),
        GeneratedFile::scaffold("sources/scripts/deploy_hook.move", deploy_hook(builder)),
        GeneratedFile::scaffold("sources/scripts/migrate.move", migrate(builder)),
    ])
}

fn manifest(builder: &ModuleBuilder<'_>) -> Result<String, BuildError> {
    let name = builder.project.name.as_str();
    let manifest = Manifest {
        package: Package {
            name,
            edition: "2024",
        },
        dependencies: BTreeMap::from([(
            "Sui",
            GitDependency {
                git: SUI_GIT,
                subdir: SUI_SUBDIR,
                rev: SUI_FRAMEWORK_REV,
            },
        )]),
        addresses: BTreeMap::from([(name, "0x0")]),
    };

    Ok(toml::to_string(&manifest)?)
}

fn deploy_hook(builder: &ModuleBuilder<'_>) -> String {
    let mut w = SourceWriter::new();

    w.block(format!("module {}", builder.module_path("deploy_hook")), |w| {
        w.line(format!("use {}::Schema;", builder.module_path("schema")));
        w.blank();
        w.line("/// Runs once, right after the schema object is created.");
        w.block(
            "public(package) fun run(_schema: &mut Schema, _ctx: &mut TxContext)",
            |_| {},
        );
    });

    w.finish()
}

fn migrate(builder: &ModuleBuilder<'_>) -> String {
    let mut w = SourceWriter::new();

    w.block(format!("module {}", builder.module_path("migrate")), |w| {
        w.line("const ON_CHAIN_VERSION: u32 = 1;");
        w.blank();
        w.block("public fun on_chain_version(): u32", |w| {
            w.line("ON_CHAIN_VERSION");
        });
    });

    w.finish()
}
