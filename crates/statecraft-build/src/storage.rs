//! The `Schema` root object and per-entry accessors.
//!
//! Keyed entries live in a `Table<K, V>` and key-less entries in an
//! `Option<V>`, each stored as a dynamic field of the root object under the
//! entry name. Offchain entries own no storage and only publish events.

use crate::{
    FunctionNames, ModuleBuilder, SourceWriter,
    types::{pack, params, struct_def},
};
use statecraft_schema::{entry::SchemaEntry, types::Field};

/// Stored type for an entry whose fields are all keys.
const PRESENCE_TYPE: &str = "bool";

pub fn generate(builder: &ModuleBuilder<'_>, w: &mut SourceWriter, fns: &mut FunctionNames) {
    let entries: Vec<EntryAccess<'_>> = builder.schema.entries.iter().map(EntryAccess::new).collect();

    for access in &entries {
        access.record_structs(w);
    }

    root(w, fns, &entries);

    for access in &entries {
        if access.entry.offchain {
            access.offchain_set(w, fns);
            access.offchain_remove(w, fns);
        } else {
            access.register(w, fns);
            access.has(w, fns);
            access.get(w, fns);
            access.set(w, fns);
            access.remove(w, fns);
        }
    }
}

fn root(w: &mut SourceWriter, fns: &mut FunctionNames, entries: &[EntryAccess<'_>]) {
    w.block("public struct Schema has key, store", |w| w.line("id: UID,"));
    w.blank();

    let stored: Vec<_> = entries.iter().filter(|a| !a.entry.offchain).collect();
    fns.declare("create", "Schema");
    w.block("public fun create(ctx: &mut TxContext): Schema", |w| {
        if stored.is_empty() {
            w.line("Schema { id: object::new(ctx) }");
            return;
        }

        w.line("let mut schema = Schema { id: object::new(ctx) };");
        for access in &stored {
            w.line(format!("register_{}(&mut schema, ctx);", access.entry.name));
        }
        w.line("schema");
    });
    w.blank();
}

///
/// EntryAccess
///
/// Move-side names and expressions for one entry, derived from the same key
/// and value views the entry codec uses.
///

struct EntryAccess<'a> {
    entry: &'a SchemaEntry,
    key_fields: Vec<&'a Field>,
    value_fields: Vec<&'a Field>,
    key_type: Option<String>,
    value_type: Option<String>,
}

impl<'a> EntryAccess<'a> {
    fn new(entry: &'a SchemaEntry) -> Self {
        Self {
            entry,
            key_fields: entry.key_fields(),
            value_fields: entry.value_fields(),
            key_type: entry.key_type().map(|ty| ty.move_type()),
            value_type: entry.value_type().map(|ty| ty.move_type()),
        }
    }

    fn name(&self) -> &str {
        &self.entry.name
    }

    fn label(&self) -> String {
        format!("b\"{}\"", self.entry.name)
    }

    fn schema_id(&self) -> String {
        format!("string::utf8({})", self.label())
    }

    fn stored_value_type(&self) -> &str {
        self.value_type.as_deref().unwrap_or(PRESENCE_TYPE)
    }

    fn storage_type(&self) -> String {
        match &self.key_type {
            Some(key) => format!("Table<{key}, {}>", self.stored_value_type()),
            None => format!("Option<{}>", self.stored_value_type()),
        }
    }

    // `df::borrow<vector<u8>, Table<K, V>>(&self.id, b"entry")`
    fn borrow(&self, mutable: bool) -> String {
        let (func, id) = if mutable {
            ("borrow_mut", "&mut self.id")
        } else {
            ("borrow", "&self.id")
        };

        format!(
            "df::{func}<vector<u8>, {}>({id}, {})",
            self.storage_type(),
            self.label()
        )
    }

    fn local(&self) -> &'static str {
        if self.entry.is_keyed() { "records" } else { "slot" }
    }

    fn all_params(&self) -> Vec<&'a Field> {
        self.key_fields
            .iter()
            .chain(&self.value_fields)
            .copied()
            .collect()
    }

    fn signature(&self, prefix: &str, receiver: Option<&str>, fields: &[&Field]) -> String {
        let mut parts = Vec::new();
        parts.extend(receiver.map(str::to_string));
        let params = params(fields);
        if !params.is_empty() {
            parts.push(params);
        }

        format!("{prefix}_{}({})", self.name(), parts.join(", "))
    }

    fn key_struct_name(&self) -> String {
        self.entry.key_struct_name()
    }

    fn value_struct_name(&self) -> String {
        self.entry.struct_name()
    }

    fn record_structs(&self, w: &mut SourceWriter) {
        if self.key_fields.len() > 1 {
            struct_def(w, &self.key_struct_name(), &self.key_fields);
        }
        if self.value_fields.len() > 1 {
            struct_def(w, &self.value_struct_name(), &self.value_fields);
        }
    }

    fn bind_key(&self, w: &mut SourceWriter) {
        match self.key_fields.as_slice() {
            [] => {}
            [single] => w.line(format!("let record_key = {};", single.name)),
            fields => w.line(format!(
                "let record_key = {};",
                pack(&self.key_struct_name(), fields)
            )),
        }
    }

    fn bind_value(&self, w: &mut SourceWriter) {
        match self.value_fields.as_slice() {
            [] => w.line("let record_value = true;"),
            [single] => w.line(format!("let record_value = {};", single.name)),
            fields => w.line(format!(
                "let record_value = {};",
                pack(&self.value_struct_name(), fields)
            )),
        }
    }

    fn entity_key(&self) -> &'static str {
        if self.entry.is_keyed() {
            "option::some(bcs::to_bytes(&record_key))"
        } else {
            "option::none()"
        }
    }

    fn removed_key(&self) -> &'static str {
        if self.entry.is_keyed() {
            "bcs::to_bytes(&record_key)"
        } else {
            "vector[]"
        }
    }

    fn payload(&self) -> &'static str {
        if self.value_fields.is_empty() {
            "vector[]"
        } else {
            "bcs::to_bytes(&record_value)"
        }
    }

    fn emit_set(&self, w: &mut SourceWriter) {
        w.line(format!(
            "emit_set_record({}, {}, {});",
            self.schema_id(),
            self.entity_key(),
            self.payload()
        ));
    }

    fn emit_remove(&self, w: &mut SourceWriter) {
        w.line(format!(
            "emit_remove_record({}, {});",
            self.schema_id(),
            self.removed_key()
        ));
    }

    fn declare(&self, fns: &mut FunctionNames, prefix: &str) {
        fns.declare(&format!("{prefix}_{}", self.name()), self.name());
    }

    ///
    /// STORED ENTRIES
    ///

    fn register(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "register");

        let (ctx, init) = match &self.key_type {
            Some(key) => (
                "ctx",
                format!("table::new<{key}, {}>(ctx)", self.stored_value_type()),
            ),
            None => (
                "_ctx",
                format!("option::none<{}>()", self.stored_value_type()),
            ),
        };

        w.block(
            format!(
                "public(package) fun register_{}(self: &mut Schema, {ctx}: &mut TxContext)",
                self.name()
            ),
            |w| w.line(format!("df::add(&mut self.id, {}, {init});", self.label())),
        );
        w.blank();
    }

    fn has(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "has");

        let sig = self.signature("has", Some("self: &Schema"), &self.key_fields);
        w.block(format!("public fun {sig}: bool"), |w| {
            self.bind_key(w);
            w.line(format!("let {} = {};", self.local(), self.borrow(false)));
            if self.entry.is_keyed() {
                w.line("records.contains(record_key)");
            } else {
                w.line("slot.is_some()");
            }
        });
        w.blank();
    }

    fn get(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        // nothing to read back when every field is a key
        if self.value_fields.is_empty() {
            return;
        }
        self.declare(fns, "get");

        let returns = match self.value_fields.as_slice() {
            [single] => single.ty.move_type(),
            fields => format!(
                "({})",
                fields
                    .iter()
                    .map(|f| f.ty.move_type())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        };
        let stored = if self.entry.is_keyed() {
            "*records.borrow(record_key)"
        } else {
            "*slot.borrow()"
        };

        let sig = self.signature("get", Some("self: &Schema"), &self.key_fields);
        w.block(format!("public fun {sig}: {returns}"), |w| {
            self.bind_key(w);
            w.line(format!("let {} = {};", self.local(), self.borrow(false)));
            match self.value_fields.as_slice() {
                [_] => w.line(stored),
                fields => {
                    w.line(format!(
                        "let {} = {stored};",
                        pack(&self.value_struct_name(), fields)
                    ));
                    w.line(format!(
                        "({})",
                        fields
                            .iter()
                            .map(|f| f.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", ")
                    ));
                }
            }
        });
        w.blank();
    }

    fn set(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "set");

        let sig = self.signature("set", Some("self: &mut Schema"), &self.all_params());
        w.block(format!("public(package) fun {sig}"), |w| {
            self.bind_key(w);
            self.bind_value(w);
            w.line(format!("let {} = {};", self.local(), self.borrow(true)));
            if self.entry.is_keyed() {
                w.line("if (records.contains(record_key)) {");
                w.indent();
                w.line("*records.borrow_mut(record_key) = record_value;");
                w.dedent();
                w.line("} else {");
                w.indent();
                w.line("records.add(record_key, record_value);");
                w.dedent();
                w.line("};");
            } else {
                w.line("slot.swap_or_fill(record_value);");
            }
            self.emit_set(w);
        });
        w.blank();
    }

    fn remove(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "remove");

        let sig = self.signature("remove", Some("self: &mut Schema"), &self.key_fields);
        w.block(format!("public(package) fun {sig}"), |w| {
            self.bind_key(w);
            w.line(format!("let {} = {};", self.local(), self.borrow(true)));
            if self.entry.is_keyed() {
                w.line("records.remove(record_key);");
            } else {
                w.line("slot.extract();");
            }
            self.emit_remove(w);
        });
        w.blank();
    }

    ///
    /// OFFCHAIN ENTRIES
    ///

    fn offchain_set(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "set");

        let sig = self.signature("set", None, &self.all_params());
        w.block(format!("public(package) fun {sig}"), |w| {
            self.bind_key(w);
            if !self.value_fields.is_empty() {
                self.bind_value(w);
            }
            self.emit_set(w);
        });
        w.blank();
    }

    fn offchain_remove(&self, w: &mut SourceWriter, fns: &mut FunctionNames) {
        self.declare(fns, "remove");

        let sig = self.signature("remove", None, &self.key_fields);
        w.block(format!("public(package) fun {sig}"), |w| {
            self.bind_key(w);
            self.emit_remove(w);
        });
        w.blank();
    }
}
