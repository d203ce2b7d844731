use crate::{GeneratedFile, ModuleBuilder, SourceWriter};
use std::fmt::Write as _;

/// `#[error]` constants with one assertion helper each.
pub fn generate(builder: &ModuleBuilder<'_>) -> GeneratedFile {
    let mut w = SourceWriter::new();

    builder.header(&mut w);
    w.block(format!("module {}", builder.module_path("errors")), |w| {
        for code in &builder.schema.errors {
            let constant = code.constant_name();

            w.line("#[error]");
            w.line(format!(
                "const {constant}: vector<u8> = b\"{}\";",
                escape_byte_string(&code.message)
            ));
            w.blank();
            w.block(
                format!("public fun {}(condition: bool)", code.fn_name()),
                |w| w.line(format!("assert!(condition, {constant})")),
            );
            w.blank();
        }
    });

    GeneratedFile::codegen("errors.move", w.finish())
}

/// Escape text for a Move `b"..."` literal.
pub fn escape_byte_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'"' => out.push_str("\\\""),
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            0x20..=0x7e => out.push(char::from(byte)),
            _ => {
                let _ = write!(out, "\\x{byte:02x}");
            }
        }
    }

    out
}

///
/// TESTS
///
