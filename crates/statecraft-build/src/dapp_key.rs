use crate::{GeneratedFile, ModuleBuilder, SourceWriter};

/// Witness type identifying the package that owns the schema.
pub fn generate(builder: &ModuleBuilder<'_>) -> GeneratedFile {
    let mut w = SourceWriter::new();

    builder.header(&mut w);
    w.block(format!("module {}", builder.module_path("dapp_key")), |w| {
        w.line("use std::ascii::String;");
        w.line("use std::type_name;");
        w.line("use sui::address;");
        w.blank();

        w.line("/// Authorization token for the app.");
        w.line("public struct DappKey has copy, drop {}");
        w.blank();

        w.block("public(package) fun new(): DappKey", |w| w.line("DappKey {}"));
        w.blank();

        w.block("public fun to_string(): String", |w| {
            w.line("type_name::get<DappKey>().into_string()");
        });
        w.blank();

        w.block("public fun package_id(): address", |w| {
            w.line("let package_id = type_name::get<DappKey>().get_address();");
            w.line("address::from_ascii_bytes(package_id.as_bytes())");
        });
    });

    GeneratedFile::codegen("dapp_key.move", w.finish())
}
