use crate::{FunctionNames, SourceWriter};

/// The two event records shared by every entry.
pub fn generate(w: &mut SourceWriter, fns: &mut FunctionNames) {
    w.block("public struct SetRecord has copy, drop", |w| {
        w.line("schema_id: String,");
        w.line("entity_key: Option<vector<u8>>,");
        w.line("payload: vector<u8>,");
    });
    w.blank();

    w.block("public struct RemoveRecord has copy, drop", |w| {
        w.line("schema_id: String,");
        w.line("entity_key: vector<u8>,");
    });
    w.blank();

    fns.declare("emit_set_record", "SetRecord");
    w.block(
        "public(package) fun emit_set_record(schema_id: String, entity_key: Option<vector<u8>>, payload: vector<u8>)",
        |w| w.line("event::emit(SetRecord { schema_id, entity_key, payload });"),
    );
    w.blank();

    fns.declare("emit_remove_record", "RemoveRecord");
    w.block(
        "public(package) fun emit_remove_record(schema_id: String, entity_key: vector<u8>)",
        |w| w.line("event::emit(RemoveRecord { schema_id, entity_key });"),
    );
}
