//! Shape compilation: one declaration's structural shape to a validator
//! expression tree.
//!
//! Pure translation. References compile to symbolic schema identifiers
//! (never inlined sub-expressions); whether a record additionally needs lazy
//! wrapping is decided by the emission plan, not here. Documentation tags
//! refine primitive validators (`@format email` -> `.email()`).

use crate::config::GenerateConfig;
use crate::expr::{Check, Property, SchemaExpr};
use crate::ir::{DeclKind, DerivedOp, DerivedShape, Field, JsDocTag, Shape};
use crate::resolve::{Resolution, resolve};
use crate::table::DeclarationTable;

/// Compile the declaration at `index` into its validator expression.
pub fn compile(table: &DeclarationTable, config: &GenerateConfig, index: usize) -> SchemaExpr {
    let decl = table.get(index);
    let compiler = Compiler {
        table,
        config,
        namespace: &decl.namespace,
    };
    match &decl.kind {
        DeclKind::Alias(shape) => {
            let expr = compiler.shape(shape);
            apply_checks(expr, checks_from_tags(&decl.tags))
        }
        DeclKind::Object(object) => SchemaExpr::Object(
            object
                .fields
                .iter()
                .map(|field| compiler.property(field))
                .collect(),
        ),
        // Enums validate against their own runtime representation.
        DeclKind::Enum(_) => SchemaExpr::NativeEnum(decl.flat_name()),
        DeclKind::Derived(derived) => compiler.derived(derived),
    }
}

struct Compiler<'a> {
    table: &'a DeclarationTable,
    config: &'a GenerateConfig,
    namespace: &'a [String],
}

impl Compiler<'_> {
    fn property(&self, field: &Field) -> Property {
        let mut expr = apply_checks(self.shape(&field.shape), checks_from_tags(&field.tags));
        if field.optional {
            expr = SchemaExpr::optional(expr);
        }
        Property {
            name: field.name.clone(),
            expr,
            docs: if self.config.keep_comments {
                field.docs.clone()
            } else {
                Vec::new()
            },
        }
    }

    fn shape(&self, shape: &Shape) -> SchemaExpr {
        match shape {
            Shape::String => SchemaExpr::string(),
            Shape::Number => SchemaExpr::number(),
            Shape::Boolean => SchemaExpr::Boolean,
            Shape::Null => SchemaExpr::Null,
            Shape::Any => SchemaExpr::Any,
            Shape::Literal(value) => SchemaExpr::Literal(value.clone()),
            Shape::Reference(token) => self.reference(token),
            Shape::Array(inner) => SchemaExpr::array(self.shape(inner)),
            Shape::Optional(inner) => SchemaExpr::optional(self.shape(inner)),
            Shape::Union(members) => {
                SchemaExpr::Union(members.iter().map(|m| self.shape(m)).collect())
            }
            Shape::Derived(derived) => self.derived(derived),
        }
    }

    fn reference(&self, token: &str) -> SchemaExpr {
        match resolve(self.table, token, self.namespace) {
            Resolution::Decl(target) => {
                let flat = self.table.get(target).flat_name();
                SchemaExpr::Ref(self.config.schema_name(&flat))
            }
            Resolution::EnumMember { decl, member } => SchemaExpr::EnumLiteral {
                enum_name: self.table.get(decl).flat_name(),
                member,
            },
            // Outside the analyzed set: catch-all validator.
            Resolution::Opaque => SchemaExpr::Any,
        }
    }

    fn derived(&self, derived: &DerivedShape) -> SchemaExpr {
        let base = match resolve(self.table, &derived.base, self.namespace) {
            Resolution::Decl(target) => {
                let flat = self.table.get(target).flat_name();
                Box::new(SchemaExpr::Ref(self.config.schema_name(&flat)))
            }
            _ => return SchemaExpr::Any,
        };
        match derived.op {
            DerivedOp::Omit => SchemaExpr::Omit {
                base,
                keys: derived.keys.clone(),
            },
            DerivedOp::Pick => SchemaExpr::Pick {
                base,
                keys: derived.keys.clone(),
            },
        }
    }
}

/// Map documentation tags to refinement checks.
fn checks_from_tags(tags: &[JsDocTag]) -> Vec<Check> {
    let mut checks = Vec::new();
    for tag in tags {
        let args = tag.args.as_deref().unwrap_or("");
        match tag.name.as_str() {
            "format" => match args {
                "email" => checks.push(Check::Email),
                "url" | "uri" => checks.push(Check::Url),
                "uuid" => checks.push(Check::Uuid),
                _ => {}
            },
            "min" | "minLength" | "minimum" if args.parse::<f64>().is_ok() => {
                checks.push(Check::Min(args.to_string()));
            }
            "max" | "maxLength" | "maximum" if args.parse::<f64>().is_ok() => {
                checks.push(Check::Max(args.to_string()));
            }
            _ => {}
        }
    }
    checks
}

/// Attach checks to the primitive validator they refine, reaching through an
/// optional wrapper (`string | null` with `@format email` still refines the
/// string).
fn apply_checks(expr: SchemaExpr, checks: Vec<Check>) -> SchemaExpr {
    if checks.is_empty() {
        return expr;
    }
    match expr {
        SchemaExpr::String(mut existing) => {
            existing.extend(checks);
            SchemaExpr::String(existing)
        }
        SchemaExpr::Number(mut existing) => {
            existing.extend(checks);
            SchemaExpr::Number(existing)
        }
        SchemaExpr::Optional(inner) => SchemaExpr::optional(apply_checks(*inner, checks)),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Declaration, EnumValue, LiteralValue, Shape};

    fn compile_single(decl: Declaration) -> SchemaExpr {
        let table = DeclarationTable::build(vec![decl]);
        compile(&table, &GenerateConfig::default(), 0)
    }

    #[test]
    fn literal_union_compiles_to_literal_alternation() {
        let expr = compile_single(Declaration::alias(
            "Name",
            Shape::Union(vec![
                Shape::string_literal("superman"),
                Shape::string_literal("clark kent"),
            ]),
        ));

        assert_eq!(
            expr,
            SchemaExpr::Union(vec![
                SchemaExpr::literal_str("superman"),
                SchemaExpr::literal_str("clark kent"),
            ])
        );
    }

    #[test]
    fn format_tag_refines_string_field() {
        let expr = compile_single(Declaration::object(
            "Superman",
            vec![Field::required("email", Shape::String).with_tag("format", Some("email"))],
        ));

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "email".to_string(),
                expr: SchemaExpr::String(vec![Check::Email]),
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn optional_field_wraps_after_refinement() {
        let expr = compile_single(Declaration::object(
            "Superman",
            vec![Field::optional("age", Shape::Number).with_tag("min", Some("0"))],
        ));

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "age".to_string(),
                expr: SchemaExpr::optional(SchemaExpr::Number(vec![Check::Min("0".into())])),
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn non_numeric_bound_tag_is_ignored() {
        let expr = compile_single(Declaration::object(
            "Superman",
            vec![Field::required("age", Shape::Number).with_tag("min", Some("zero"))],
        ));

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "age".to_string(),
                expr: SchemaExpr::number(),
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn resolved_reference_uses_generated_identifier() {
        let table = DeclarationTable::build(vec![
            Declaration::alias("Name", Shape::String),
            Declaration::object("Superman", vec![Field::required("name", Shape::reference("Name"))]),
        ]);
        let expr = compile(&table, &GenerateConfig::default(), 1);

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "name".to_string(),
                expr: SchemaExpr::Ref("nameSchema".to_string()),
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn unresolved_reference_degrades_to_any() {
        let expr = compile_single(Declaration::object(
            "Superman",
            vec![Field::required("nemesis", Shape::reference("LexLuthor"))],
        ));

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "nemesis".to_string(),
                expr: SchemaExpr::Any,
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn enum_member_reference_compiles_to_enum_literal() {
        let table = DeclarationTable::build(vec![
            Declaration::string_enum("Superhero", vec![("Superman", "superman")]),
            Declaration::object(
                "Favorite",
                vec![Field::required("superhero", Shape::reference("Superhero.Superman"))],
            ),
        ]);
        let expr = compile(&table, &GenerateConfig::default(), 1);

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "superhero".to_string(),
                expr: SchemaExpr::EnumLiteral {
                    enum_name: "Superhero".to_string(),
                    member: "Superman".to_string(),
                },
                docs: Vec::new(),
            }])
        );
    }

    #[test]
    fn enum_declaration_binds_to_runtime_representation() {
        let expr = compile_single(Declaration {
            kind: DeclKind::Enum(crate::ir::EnumShape {
                variants: vec![crate::ir::EnumVariant {
                    name: "Superman".to_string(),
                    value: Some(EnumValue::Str("superman".to_string())),
                }],
            }),
            ..Declaration::alias("Superhero", Shape::Any)
        });

        assert_eq!(expr, SchemaExpr::NativeEnum("Superhero".to_string()));
    }

    #[test]
    fn omit_applies_to_base_schema() {
        let table = DeclarationTable::build(vec![
            Declaration::object("Superman", vec![]),
            Declaration {
                kind: DeclKind::Derived(DerivedShape {
                    op: DerivedOp::Omit,
                    base: "Superman".to_string(),
                    keys: vec!["underKryptonite".to_string()],
                }),
                ..Declaration::alias("BadassSuperman", Shape::Any)
            },
        ]);
        let expr = compile(&table, &GenerateConfig::default(), 1);

        assert_eq!(
            expr,
            SchemaExpr::Omit {
                base: Box::new(SchemaExpr::Ref("supermanSchema".to_string())),
                keys: vec!["underKryptonite".to_string()],
            }
        );
    }

    #[test]
    fn literal_value_compiles_to_literal_validator() {
        let expr = compile_single(Declaration::object(
            "Villain",
            vec![Field::required(
                "didKillSuperman",
                Shape::Literal(LiteralValue::Bool(true)),
            )],
        ));

        assert_eq!(
            expr,
            SchemaExpr::Object(vec![Property {
                name: "didKillSuperman".to_string(),
                expr: SchemaExpr::Literal(LiteralValue::Bool(true)),
                docs: Vec::new(),
            }])
        );
    }
}
