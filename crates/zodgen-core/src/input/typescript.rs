//! TypeScript declaration extraction.
//!
//! Extracts type declarations (interfaces, type aliases, enums, namespaces)
//! from TypeScript source into the IR. Non-type statements are ignored.
//! Declarations with type parameters are marked generic; the declaration
//! table skips them.

use super::ParseError;
use crate::ir::{
    DeclKind, Declaration, DerivedOp, DerivedShape, EnumShape, EnumValue, EnumVariant, Field,
    JsDocTag, LiteralValue, ObjectShape, Shape,
};
use tree_sitter::{Node, Parser};

/// Parse TypeScript source and extract its type declarations.
pub fn parse_declarations(source: &str) -> Result<Vec<Declaration>, ParseError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| ParseError::Unsupported(format!("tree-sitter init: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| ParseError::Unsupported("failed to parse TypeScript".into()))?;

    let ctx = ExtractContext::new(source);
    let mut declarations = Vec::new();
    ctx.extract_scope(tree.root_node(), &[], &mut declarations)?;
    Ok(declarations)
}

/// A JSDoc block: content lines plus the tags parsed out of them.
#[derive(Debug, Clone, Default)]
struct DocBlock {
    lines: Vec<String>,
    tags: Vec<JsDocTag>,
}

struct ExtractContext<'a> {
    source: &'a str,
}

impl<'a> ExtractContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    /// Walk one statement scope (the file root or a namespace body).
    fn extract_scope(
        &self,
        scope: Node,
        namespace: &[String],
        out: &mut Vec<Declaration>,
    ) -> Result<(), ParseError> {
        let mut pending: Option<DocBlock> = None;

        let mut cursor = scope.walk();
        for child in scope.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    pending = self.extract_doc_block(child);
                }
                "interface_declaration" | "type_alias_declaration" | "enum_declaration" => {
                    self.extract_declaration(child, namespace, false, pending.take(), out)?;
                }
                "internal_module" => {
                    self.extract_namespace(child, namespace, out)?;
                    pending = None;
                }
                "expression_statement" => {
                    // `namespace X {}` without modifiers parses as an
                    // expression statement wrapping an internal_module.
                    if let Some(module) = named_child_of_kind(child, "internal_module") {
                        self.extract_namespace(module, namespace, out)?;
                    }
                    pending = None;
                }
                "export_statement" => {
                    if let Some(decl) = child.child_by_field_name("declaration") {
                        match decl.kind() {
                            "interface_declaration"
                            | "type_alias_declaration"
                            | "enum_declaration" => {
                                self.extract_declaration(
                                    decl,
                                    namespace,
                                    true,
                                    pending.take(),
                                    out,
                                )?;
                            }
                            "internal_module" => {
                                self.extract_namespace(decl, namespace, out)?;
                            }
                            _ => {}
                        }
                    } else if let Some(module) = named_child_of_kind(child, "internal_module") {
                        self.extract_namespace(module, namespace, out)?;
                    }
                    pending = None;
                }
                _ => {
                    pending = None;
                }
            }
        }
        Ok(())
    }

    fn extract_namespace(
        &self,
        module: Node,
        namespace: &[String],
        out: &mut Vec<Declaration>,
    ) -> Result<(), ParseError> {
        let name = module
            .child_by_field_name("name")
            .ok_or_else(|| ParseError::Unsupported("namespace missing name".into()))?;

        // `namespace A.B` nests two segments at once.
        let mut path: Vec<String> = namespace.to_vec();
        for segment in self.node_text(name).split('.') {
            path.push(segment.to_string());
        }

        if let Some(body) = module.child_by_field_name("body") {
            self.extract_scope(body, &path, out)?;
        }
        Ok(())
    }

    fn extract_declaration(
        &self,
        node: Node,
        namespace: &[String],
        exported: bool,
        docs: Option<DocBlock>,
        out: &mut Vec<Declaration>,
    ) -> Result<(), ParseError> {
        let decl = match node.kind() {
            "interface_declaration" => self.extract_interface(node)?,
            "type_alias_declaration" => self.extract_type_alias(node)?,
            "enum_declaration" => self.extract_enum(node)?,
            other => {
                return Err(ParseError::Unsupported(format!(
                    "unexpected declaration node: {}",
                    other
                )));
            }
        };

        let docs = docs.unwrap_or_default();
        out.push(Declaration {
            namespace: namespace.to_vec(),
            exported,
            docs: docs.lines,
            tags: docs.tags,
            ..decl
        });
        Ok(())
    }

    fn extract_interface(&self, node: Node) -> Result<Declaration, ParseError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| ParseError::Unsupported("interface missing name".into()))?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| ParseError::Unsupported("interface missing body".into()))?;

        let mut decl = Declaration::object(self.node_text(name), self.extract_fields(body)?);
        decl.generic = node.child_by_field_name("type_parameters").is_some();
        Ok(decl)
    }

    fn extract_type_alias(&self, node: Node) -> Result<Declaration, ParseError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| ParseError::Unsupported("type alias missing name".into()))?;
        let value = node
            .child_by_field_name("value")
            .ok_or_else(|| ParseError::Unsupported("type alias missing value".into()))?;

        let kind = if value.kind() == "object_type" {
            // `type X = { .. }` is an object shape, same as an interface.
            DeclKind::Object(ObjectShape {
                fields: self.extract_fields(value)?,
            })
        } else {
            match self.extract_shape(value)? {
                Shape::Derived(derived) => DeclKind::Derived(derived),
                shape => DeclKind::Alias(shape),
            }
        };

        let mut decl = Declaration {
            kind,
            ..Declaration::alias(self.node_text(name), Shape::Any)
        };
        decl.generic = node.child_by_field_name("type_parameters").is_some();
        Ok(decl)
    }

    fn extract_fields(&self, body: Node) -> Result<Vec<Field>, ParseError> {
        let mut fields = Vec::new();
        let mut pending: Option<DocBlock> = None;

        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    pending = self.extract_doc_block(child);
                }
                "property_signature" => {
                    let mut field = self.extract_property(child)?;
                    let docs = pending.take().unwrap_or_default();
                    field.docs = docs.lines;
                    field.tags = docs.tags;
                    fields.push(field);
                }
                _ => {
                    pending = None;
                }
            }
        }
        Ok(fields)
    }

    fn extract_property(&self, node: Node) -> Result<Field, ParseError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| ParseError::Unsupported("property missing name".into()))?;

        let shape = match node.child_by_field_name("type") {
            Some(annotation) => self.extract_type_annotation(annotation)?,
            None => Shape::Any,
        };

        let mut field = if self.has_question_mark(node) {
            Field::optional(self.node_text(name), shape)
        } else {
            Field::required(self.node_text(name), shape)
        };
        // `T | null` on a required field reads as an optional value too.
        if let Shape::Optional(inner) = field.shape.clone() {
            field.shape = *inner;
            field.optional = true;
        }
        Ok(field)
    }

    fn has_question_mark(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && self.node_text(child) == "?" {
                return true;
            }
        }
        false
    }

    fn extract_type_annotation(&self, node: Node) -> Result<Shape, ParseError> {
        // type_annotation is `:` followed by the actual type node.
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_named() {
                return self.extract_shape(child);
            }
        }
        Ok(Shape::Any)
    }

    fn extract_shape(&self, node: Node) -> Result<Shape, ParseError> {
        match node.kind() {
            "predefined_type" => Ok(match self.node_text(node) {
                "string" => Shape::String,
                "number" => Shape::Number,
                "boolean" => Shape::Boolean,
                "void" | "undefined" | "never" => Shape::Null,
                _ => Shape::Any,
            }),

            "type_identifier" => Ok(Shape::reference(self.node_text(node))),

            // `Superhero.Superman` / `Ns.Type`; resolution decides which.
            "nested_type_identifier" => Ok(Shape::reference(self.node_text(node))),

            "union_type" => self.extract_union(node),

            "array_type" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() {
                        return Ok(Shape::array(self.extract_shape(child)?));
                    }
                }
                Ok(Shape::array(Shape::Any))
            }

            "generic_type" => self.extract_generic(node),

            "literal_type" => self.extract_literal(node),

            "parenthesized_type" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() {
                        return self.extract_shape(child);
                    }
                }
                Ok(Shape::Any)
            }

            // Tuples, intersections, inline object types, and function types
            // have no structural counterpart here.
            _ => Ok(Shape::Any),
        }
    }

    fn extract_union(&self, node: Node) -> Result<Shape, ParseError> {
        let mut members = Vec::new();
        self.flatten_union(node, &mut members)?;

        // `T | null` / `T | undefined` is an optional value.
        if members.len() == 2 {
            if let Some(null_at) = members.iter().position(|m| matches!(m, Shape::Null)) {
                return Ok(Shape::optional(members.swap_remove(1 - null_at)));
            }
        }
        Ok(Shape::Union(members))
    }

    fn flatten_union(&self, node: Node, out: &mut Vec<Shape>) -> Result<(), ParseError> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() {
                continue;
            }
            if child.kind() == "union_type" {
                self.flatten_union(child, out)?;
            } else {
                out.push(self.extract_shape(child)?);
            }
        }
        Ok(())
    }

    fn extract_generic(&self, node: Node) -> Result<Shape, ParseError> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or("");

        let mut args = Vec::new();
        if let Some(type_args) = node.child_by_field_name("type_arguments") {
            let mut cursor = type_args.walk();
            for child in type_args.children(&mut cursor) {
                if child.is_named() {
                    args.push(child);
                }
            }
        }

        match name {
            "Array" | "ReadonlyArray" | "Set" => {
                let inner = match args.first() {
                    Some(&arg) => self.extract_shape(arg)?,
                    None => Shape::Any,
                };
                Ok(Shape::array(inner))
            }
            // Wrappers that don't change the structural shape.
            "Promise" | "Partial" | "Required" | "Readonly" => match args.first() {
                Some(&arg) => self.extract_shape(arg),
                None => Ok(Shape::Any),
            },
            "Omit" => self.extract_derived(DerivedOp::Omit, &args),
            "Pick" => self.extract_derived(DerivedOp::Pick, &args),
            // Other generics (Record, Map, user generics) are opaque.
            _ => Ok(Shape::Any),
        }
    }

    fn extract_derived(&self, op: DerivedOp, args: &[Node]) -> Result<Shape, ParseError> {
        let base = match args.first() {
            Some(&arg)
                if arg.kind() == "type_identifier" || arg.kind() == "nested_type_identifier" =>
            {
                self.node_text(arg).to_string()
            }
            // A derived form over anything but a named base is inexpressible.
            _ => return Ok(Shape::Any),
        };

        let mut keys = Vec::new();
        if let Some(&keys_node) = args.get(1) {
            if !self.collect_key_literals(keys_node, &mut keys) {
                return Ok(Shape::Any);
            }
        }
        if keys.is_empty() {
            return Ok(Shape::Any);
        }

        Ok(Shape::Derived(DerivedShape { op, base, keys }))
    }

    /// Collect `"a" | "b"` key literals. Returns false on anything else.
    fn collect_key_literals(&self, node: Node, out: &mut Vec<String>) -> bool {
        match node.kind() {
            "literal_type" => match self.extract_literal(node) {
                Ok(Shape::Literal(LiteralValue::Str(key))) => {
                    out.push(key);
                    true
                }
                _ => false,
            },
            "union_type" => {
                let mut cursor = node.walk();
                for child in node.children(&mut cursor) {
                    if child.is_named() && !self.collect_key_literals(child, out) {
                        return false;
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn extract_literal(&self, node: Node) -> Result<Shape, ParseError> {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "string" => {
                    return Ok(Shape::Literal(LiteralValue::Str(
                        self.string_value(child),
                    )));
                }
                "number" => {
                    let text = self.node_text(child);
                    if let Ok(n) = text.parse::<i64>() {
                        return Ok(Shape::Literal(LiteralValue::Int(n)));
                    }
                    return Ok(Shape::Any);
                }
                "true" => return Ok(Shape::Literal(LiteralValue::Bool(true))),
                "false" => return Ok(Shape::Literal(LiteralValue::Bool(false))),
                "null" | "undefined" => return Ok(Shape::Null),
                _ => {}
            }
        }
        Ok(Shape::Any)
    }

    /// The contents of a string node, without quote delimiters.
    fn string_value(&self, node: Node) -> String {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "string_fragment" {
                return self.node_text(child).to_string();
            }
        }
        let text = self.node_text(node);
        if text.len() >= 2 && (text.starts_with('"') || text.starts_with('\'')) {
            text[1..text.len() - 1].to_string()
        } else {
            text.to_string()
        }
    }

    fn extract_enum(&self, node: Node) -> Result<Declaration, ParseError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| ParseError::Unsupported("enum missing name".into()))?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| ParseError::Unsupported("enum missing body".into()))?;

        let mut variants = Vec::new();
        let mut cursor = body.walk();
        for child in body.children(&mut cursor) {
            match child.kind() {
                "enum_assignment" => {
                    let member = child
                        .child_by_field_name("name")
                        .map(|n| self.node_text(n).to_string())
                        .unwrap_or_default();
                    let value = child.child_by_field_name("value").and_then(|v| {
                        let text = self.node_text(v);
                        if v.kind() == "string" {
                            Some(EnumValue::Str(self.string_value(v)))
                        } else {
                            text.parse::<i64>().ok().map(EnumValue::Int)
                        }
                    });
                    variants.push(EnumVariant {
                        name: member,
                        value,
                    });
                }
                "property_identifier" => {
                    variants.push(EnumVariant {
                        name: self.node_text(child).to_string(),
                        value: None,
                    });
                }
                _ => {}
            }
        }

        Ok(Declaration {
            kind: DeclKind::Enum(EnumShape { variants }),
            ..Declaration::alias(self.node_text(name), Shape::Any)
        })
    }

    fn extract_doc_block(&self, node: Node) -> Option<DocBlock> {
        let text = self.node_text(node);
        if !text.starts_with("/**") {
            return None;
        }
        let inner = text
            .strip_prefix("/**")
            .and_then(|s| s.strip_suffix("*/"))
            .unwrap_or(text);

        let mut lines: Vec<String> = inner
            .lines()
            .map(|line| line.trim().trim_start_matches('*').trim().to_string())
            .collect();
        while lines.first().is_some_and(|l| l.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        if lines.is_empty() {
            return None;
        }

        let tags = parse_tags(&lines);
        Some(DocBlock { lines, tags })
    }
}

fn named_child_of_kind<'t>(node: Node<'t>, kind: &str) -> Option<Node<'t>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| child.kind() == kind);
    found
}

/// Parse `@name args` tag lines out of JSDoc content lines.
fn parse_tags(lines: &[String]) -> Vec<JsDocTag> {
    lines
        .iter()
        .filter_map(|line| line.strip_prefix('@'))
        .map(|rest| match rest.split_once(char::is_whitespace) {
            Some((name, args)) => JsDocTag {
                name: name.to_string(),
                args: {
                    let args = args.trim();
                    (!args.is_empty()).then(|| args.to_string())
                },
            },
            None => JsDocTag {
                name: rest.to_string(),
                args: None,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_interface_with_optional_field() {
        let decls = parse_declarations(
            r#"
            export interface Superman {
                name: string;
                age: number;
                underKryptonite?: boolean;
            }
            "#,
        )
        .unwrap();

        assert_eq!(decls.len(), 1);
        let decl = &decls[0];
        assert_eq!(decl.name, "Superman");
        assert!(decl.exported);
        match &decl.kind {
            DeclKind::Object(object) => {
                assert_eq!(object.fields.len(), 3);
                assert!(matches!(object.fields[0].shape, Shape::String));
                assert!(!object.fields[0].optional);
                assert!(object.fields[2].optional);
                assert!(matches!(object.fields[2].shape, Shape::Boolean));
            }
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn extracts_literal_union_alias() {
        let decls =
            parse_declarations(r#"export type Name = "superman" | "clark kent" | "kal-l";"#)
                .unwrap();

        match &decls[0].kind {
            DeclKind::Alias(Shape::Union(members)) => {
                assert_eq!(members.len(), 3);
                assert_eq!(members[0], Shape::string_literal("superman"));
                assert_eq!(members[2], Shape::string_literal("kal-l"));
            }
            other => panic!("expected literal union, got {:?}", other),
        }
    }

    #[test]
    fn extracts_omit_as_derived_declaration() {
        let decls =
            parse_declarations(r#"export type BadassSuperman = Omit<Superman, "underKryptonite">;"#)
                .unwrap();

        match &decls[0].kind {
            DeclKind::Derived(derived) => {
                assert_eq!(derived.op, DerivedOp::Omit);
                assert_eq!(derived.base, "Superman");
                assert_eq!(derived.keys, vec!["underKryptonite".to_string()]);
            }
            other => panic!("expected Derived, got {:?}", other),
        }
    }

    #[test]
    fn extracts_pick_with_key_union() {
        let decls =
            parse_declarations(r#"export type Mini = Pick<Superman, "name" | "age">;"#).unwrap();

        match &decls[0].kind {
            DeclKind::Derived(derived) => {
                assert_eq!(derived.op, DerivedOp::Pick);
                assert_eq!(
                    derived.keys,
                    vec!["name".to_string(), "age".to_string()]
                );
            }
            other => panic!("expected Derived, got {:?}", other),
        }
    }

    #[test]
    fn extracts_string_enum() {
        let decls = parse_declarations(
            r#"
            export enum Superhero {
                Superman = "superman",
                ClarkKent = "clark-kent",
            }
            "#,
        )
        .unwrap();

        match &decls[0].kind {
            DeclKind::Enum(e) => {
                assert_eq!(e.variants.len(), 2);
                assert_eq!(e.variants[0].name, "Superman");
                assert_eq!(
                    e.variants[0].value,
                    Some(EnumValue::Str("superman".to_string()))
                );
            }
            other => panic!("expected Enum, got {:?}", other),
        }
    }

    #[test]
    fn extracts_numeric_enum_members() {
        let decls = parse_declarations(
            r#"
            enum Direction {
                Up,
                Down,
            }
            "#,
        )
        .unwrap();

        match &decls[0].kind {
            DeclKind::Enum(e) => {
                assert_eq!(e.variants.len(), 2);
                assert_eq!(e.variants[0].value, None);
            }
            other => panic!("expected Enum, got {:?}", other),
        }
        assert!(!decls[0].exported);
    }

    #[test]
    fn extracts_enum_member_reference() {
        let decls = parse_declarations(
            r#"
            export type FavoriteSuperhero = {
                superhero: Superhero.Superman
            };
            "#,
        )
        .unwrap();

        match &decls[0].kind {
            DeclKind::Object(object) => {
                assert_eq!(
                    object.fields[0].shape,
                    Shape::reference("Superhero.Superman")
                );
            }
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn namespace_members_carry_their_path() {
        let decls = parse_declarations(
            r#"
            export namespace Metropolis {
                export type Name = "superman" | "clark kent";

                export interface Superman {
                    name: Name;
                }

                const fly = () => console.log("I can fly!");
            }
            "#,
        )
        .unwrap();

        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].namespace, vec!["Metropolis".to_string()]);
        assert_eq!(decls[0].flat_name(), "MetropolisName");
        assert_eq!(decls[1].flat_name(), "MetropolisSuperman");
    }

    #[test]
    fn jsdoc_tags_and_lines_are_captured() {
        let decls = parse_declarations(
            r#"
            export interface Superman {
                /**
                 * @format email
                 **/
                email: string;
            }
            "#,
        )
        .unwrap();

        match &decls[0].kind {
            DeclKind::Object(object) => {
                let field = &object.fields[0];
                assert_eq!(field.docs, vec!["@format email".to_string()]);
                assert_eq!(
                    field.tags,
                    vec![JsDocTag {
                        name: "format".to_string(),
                        args: Some("email".to_string()),
                    }]
                );
            }
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn declaration_level_jsdoc_is_attached() {
        let decls = parse_declarations(
            r#"
            /**
             * Only this interface should be generated
             *
             * @zod
             */
            export interface Superman {
                name: string;
            }
            "#,
        )
        .unwrap();

        assert_eq!(
            decls[0].docs,
            vec![
                "Only this interface should be generated".to_string(),
                String::new(),
                "@zod".to_string(),
            ]
        );
        assert_eq!(decls[0].tags.len(), 1);
        assert_eq!(decls[0].tags[0].name, "zod");
    }

    #[test]
    fn generic_declarations_are_marked() {
        let decls = parse_declarations("export interface Box<T> { value: T; }").unwrap();
        assert!(decls[0].generic);
    }

    #[test]
    fn nullable_union_becomes_optional_value() {
        let decls = parse_declarations("interface Opt { value: string | null; }").unwrap();
        match &decls[0].kind {
            DeclKind::Object(object) => {
                assert!(object.fields[0].optional);
                assert_eq!(object.fields[0].shape, Shape::String);
            }
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn array_shorthand_and_generic_agree() {
        let decls = parse_declarations(
            r#"
            interface Lists {
                tags: string[];
                items: Array<number>;
            }
            "#,
        )
        .unwrap();

        match &decls[0].kind {
            DeclKind::Object(object) => {
                assert_eq!(object.fields[0].shape, Shape::array(Shape::String));
                assert_eq!(object.fields[1].shape, Shape::array(Shape::Number));
            }
            other => panic!("expected Object, got {:?}", other),
        }
    }

    #[test]
    fn non_type_statements_are_ignored() {
        let decls = parse_declarations(
            r#"
            const fly = () => console.log("I can fly!");
            export type Name = string;
            "#,
        )
        .unwrap();

        assert_eq!(decls.len(), 1);
        assert_eq!(decls[0].name, "Name");
    }
}
