//! Schema-file renderer: emission records to zod construction source.

use crate::expr::{Check, Property, SchemaExpr};
use crate::generate::EmissionRecord;
use crate::ir::LiteralValue;

const HEADER: &str = "// Generated by zodgen";

/// Render the validator-definition file for an ordered record list.
///
/// `source_import` is the module path the original declarations live in; it
/// is imported for every runtime enum the expressions mention and for the
/// declared type of every deferred (lazy) schema.
pub fn render_schema_file(records: &[EmissionRecord], source_import: &str) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str("import { z } from \"zod\";\n");

    let imports = source_imports(records);
    if !imports.is_empty() {
        out.push_str(&format!(
            "import {{ {} }} from \"{}\";\n",
            imports.join(", "),
            source_import
        ));
    }

    for record in records {
        out.push('\n');
        push_doc_block(&mut out, &record.docs, 0);
        if record.deferred {
            out.push_str(&format!(
                "export const {}: z.ZodSchema<{}> = z.lazy(() => {});\n",
                record.schema_name,
                record.type_name,
                expr_string(&record.expr, 0)
            ));
        } else {
            out.push_str(&format!(
                "export const {} = {};\n",
                record.schema_name,
                expr_string(&record.expr, 0)
            ));
        }
    }
    out
}

/// Names that must be imported from the source module, in first-use order.
fn source_imports(records: &[EmissionRecord]) -> Vec<String> {
    let mut names = Vec::new();
    for record in records {
        if record.deferred && !names.contains(&record.type_name) {
            names.push(record.type_name.clone());
        }
        record.expr.enum_names(&mut names);
    }
    names
}

fn expr_string(expr: &SchemaExpr, indent: usize) -> String {
    match expr {
        SchemaExpr::String(checks) => format!("z.string(){}", checks_suffix(checks)),
        SchemaExpr::Number(checks) => format!("z.number(){}", checks_suffix(checks)),
        SchemaExpr::Boolean => "z.boolean()".to_string(),
        SchemaExpr::Null => "z.null()".to_string(),
        SchemaExpr::Any => "z.any()".to_string(),
        SchemaExpr::Literal(value) => format!("z.literal({})", literal_string(value)),
        SchemaExpr::EnumLiteral { enum_name, member } => {
            format!("z.literal({}.{})", enum_name, member)
        }
        SchemaExpr::NativeEnum(name) => format!("z.nativeEnum({})", name),
        SchemaExpr::Union(members) => {
            let rendered: Vec<String> = members.iter().map(|m| expr_string(m, indent)).collect();
            format!("z.union([{}])", rendered.join(", "))
        }
        SchemaExpr::Array(inner) => format!("z.array({})", expr_string(inner, indent)),
        SchemaExpr::Optional(inner) => format!("{}.optional()", expr_string(inner, indent)),
        SchemaExpr::Object(props) => object_string(props, indent),
        SchemaExpr::Ref(name) => name.clone(),
        SchemaExpr::Omit { base, keys } => {
            format!("{}.omit({})", expr_string(base, indent), keys_record(keys))
        }
        SchemaExpr::Pick { base, keys } => {
            format!("{}.pick({})", expr_string(base, indent), keys_record(keys))
        }
    }
}

fn object_string(props: &[Property], indent: usize) -> String {
    if props.is_empty() {
        return "z.object({})".to_string();
    }
    let outer = " ".repeat(indent);
    let inner = " ".repeat(indent + 4);
    let mut out = String::from("z.object({\n");
    for (i, prop) in props.iter().enumerate() {
        push_doc_block(&mut out, &prop.docs, indent + 4);
        out.push_str(&format!(
            "{}{}: {}",
            inner,
            prop.name,
            expr_string(&prop.expr, indent + 4)
        ));
        if i + 1 < props.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(&format!("{}}})", outer));
    out
}

fn checks_suffix(checks: &[Check]) -> String {
    checks
        .iter()
        .map(|check| match check {
            Check::Email => ".email()".to_string(),
            Check::Url => ".url()".to_string(),
            Check::Uuid => ".uuid()".to_string(),
            Check::Min(arg) => format!(".min({})", arg),
            Check::Max(arg) => format!(".max({})", arg),
        })
        .collect()
}

fn literal_string(value: &LiteralValue) -> String {
    match value {
        LiteralValue::Str(s) => format!("\"{}\"", escape(s)),
        LiteralValue::Int(i) => i.to_string(),
        LiteralValue::Bool(b) => b.to_string(),
    }
}

fn keys_record(keys: &[String]) -> String {
    let entries: Vec<String> = keys
        .iter()
        .map(|key| format!("\"{}\": true", escape(key)))
        .collect();
    format!("{{ {} }}", entries.join(", "))
}

fn escape(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn push_doc_block(out: &mut String, docs: &[String], indent: usize) {
    if docs.is_empty() {
        return;
    }
    let pad = " ".repeat(indent);
    out.push_str(&format!("{}/**\n", pad));
    for line in docs {
        if line.is_empty() {
            out.push_str(&format!("{} *\n", pad));
        } else {
            out.push_str(&format!("{} * {}\n", pad, line));
        }
    }
    out.push_str(&format!("{} */\n", pad));
}
