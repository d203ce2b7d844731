use crate::{FunctionNames, ModuleBuilder, SourceWriter};
use convert_case::{Case, Casing};
use statecraft_schema::types::{CompositeType, EnumType, Field, TypeRef};

/// Registered enums and composites, in registration order.
pub fn generate(builder: &ModuleBuilder<'_>, w: &mut SourceWriter, fns: &mut FunctionNames) {
    for ty in builder.schema.registry.iter() {
        match ty {
            TypeRef::Enum(e) => enum_type(w, fns, e),
            TypeRef::Composite(c) => composite_type(w, fns, c),
            TypeRef::Scalar(_) | TypeRef::Sequence(_) => {}
        }
    }
}

/// `public struct` with copy/drop/store abilities and fields in order.
pub fn struct_def(w: &mut SourceWriter, name: &str, fields: &[&Field]) {
    w.block(format!("public struct {name} has copy, drop, store"), |w| {
        for field in fields {
            w.line(format!("{}: {},", field.name, field.ty.move_type()));
        }
    });
    w.blank();
}

/// `a: u8, b: String`
pub fn params(fields: &[&Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.ty.move_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `Name { a, b }`
pub fn pack(name: &str, fields: &[&Field]) -> String {
    let names = fields
        .iter()
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!("{name} {{ {names} }}")
}

fn enum_type(w: &mut SourceWriter, fns: &mut FunctionNames, ty: &EnumType) {
    let name = &ty.name;
    let snake = name.to_case(Case::Snake);

    w.block(format!("public enum {name} has copy, drop, store"), |w| {
        for variant in &ty.variants {
            w.line(format!("{variant},"));
        }
    });
    w.blank();

    // tag = declared position, the same byte the codec writes
    let tag_fn = format!("{snake}_tag");
    fns.declare(&tag_fn, name);
    w.block(format!("public fun {tag_fn}(self: &{name}): u8"), |w| {
        w.block("match (self)", |w| {
            for (tag, variant) in ty.variants.iter().enumerate() {
                w.line(format!("{name}::{variant} => {tag},"));
            }
        });
    });
    w.blank();

    for variant in &ty.variants {
        let ctor = format!("{snake}_{}", variant.to_case(Case::Snake));
        fns.declare(&ctor, name);
        w.block(format!("public fun {ctor}(): {name}"), |w| {
            w.line(format!("{name}::{variant}"));
        });
        w.blank();
    }
}

fn composite_type(w: &mut SourceWriter, fns: &mut FunctionNames, ty: &CompositeType) {
    let name = &ty.name;
    let snake = name.to_case(Case::Snake);
    let fields: Vec<&Field> = ty.fields.iter().collect();

    struct_def(w, name, &fields);

    let ctor = format!("new_{snake}");
    fns.declare(&ctor, name);
    w.block(
        format!("public fun {ctor}({}): {name}", params(&fields)),
        |w| w.line(pack(name, &fields)),
    );
    w.blank();

    for field in &fields {
        let getter = format!("{snake}_{}", field.name);
        fns.declare(&getter, name);
        w.block(
            format!(
                "public fun {getter}(self: &{name}): {}",
                field.ty.move_type()
            ),
            |w| w.line(format!("self.{}", field.name)),
        );
        w.blank();

        let setter = format!("set_{snake}_{}", field.name);
        fns.declare(&setter, name);
        w.block(
            format!(
                "public fun {setter}(self: &mut {name}, {}: {})",
                field.name,
                field.ty.move_type()
            ),
            |w| w.line(format!("self.{0} = {0};", field.name)),
        );
        w.blank();
    }

    let set_all = format!("set_{snake}");
    fns.declare(&set_all, name);
    w.block(
        format!("public fun {set_all}(self: &mut {name}, {})", params(&fields)),
        |w| {
            for field in &fields {
                w.line(format!("self.{0} = {0};", field.name));
            }
        },
    );
    w.blank();

    // every field at once, in declared order
    let get_all = format!("get_{snake}");
    fns.declare(&get_all, name);
    let (returns, values) = if let [field] = fields.as_slice() {
        (field.ty.move_type(), format!("self.{}", field.name))
    } else {
        (
            format!(
                "({})",
                fields
                    .iter()
                    .map(|f| f.ty.move_type())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            format!(
                "({})",
                fields
                    .iter()
                    .map(|f| format!("self.{}", f.name))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        )
    };
    w.block(format!("public fun {get_all}(self: &{name}): {returns}"), |w| {
        w.line(values);
    });
    w.blank();
}
