//! Intermediate representation for extracted type declarations.
//!
//! The input parser normalizes TypeScript declarations to this IR before
//! dependency analysis and schema compilation. Declarations are immutable
//! once built; the rest of the pipeline only reads them.

use serde::{Deserialize, Serialize};

/// A named type declaration extracted from source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declaration name within its namespace (e.g., "Superman").
    pub name: String,
    /// Enclosing namespace path, outermost first. Empty for root declarations.
    pub namespace: Vec<String>,
    /// Whether the declaration carries an `export` modifier.
    pub exported: bool,
    /// Whether the declaration has type parameters. Generic declarations are
    /// skipped by the declaration table.
    pub generic: bool,
    /// JSDoc content lines (delimiters and leading asterisks stripped).
    pub docs: Vec<String>,
    /// JSDoc tags parsed out of `docs`.
    pub tags: Vec<JsDocTag>,
    /// The declaration's shape.
    pub kind: DeclKind,
}

/// The kind of declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeclKind {
    /// A type alias (e.g., `type Name = "a" | "b"`).
    Alias(Shape),
    /// An object shape (interface or object type literal alias).
    Object(ObjectShape),
    /// A runtime enumeration.
    Enum(EnumShape),
    /// A derived type (e.g., `Omit<Superman, "underKryptonite">`).
    Derived(DerivedShape),
}

/// An object shape with named fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectShape {
    pub fields: Vec<Field>,
}

/// A field in an object shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    /// Field name as written in source.
    pub name: String,
    /// Field shape.
    pub shape: Shape,
    /// Whether the field carries a `?` marker.
    pub optional: bool,
    /// JSDoc content lines attached to the field.
    pub docs: Vec<String>,
    /// JSDoc tags parsed out of `docs`.
    pub tags: Vec<JsDocTag>,
}

/// A runtime enumeration declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumShape {
    pub variants: Vec<EnumVariant>,
}

/// One enumeration member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumVariant {
    /// Member name (e.g., "Superman").
    pub name: String,
    /// Explicit initializer, if any. Members without one auto-increment.
    pub value: Option<EnumValue>,
}

/// An enumeration member initializer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EnumValue {
    Str(String),
    Int(i64),
}

/// A derived-type operator applied to a base declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DerivedShape {
    pub op: DerivedOp,
    /// Reference token naming the base declaration.
    pub base: String,
    /// The selected/removed field names.
    pub keys: Vec<String>,
}

/// Structural field selection operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivedOp {
    /// Shape of the base minus the named fields.
    Omit,
    /// Shape of the base limited to the named fields.
    Pick,
}

/// A recursive structural shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    // Primitives
    String,
    Number,
    Boolean,
    Null,

    /// A literal value type (e.g., `"superman"`, `42`, `true`).
    Literal(LiteralValue),

    /// A reference to another declaration by token. May be dotted
    /// (`Ns.Type`, `Enum.Member`); resolution happens later.
    Reference(String),

    Array(Box<Shape>),
    /// `T | null` / `T | undefined`.
    Optional(Box<Shape>),
    Union(Vec<Shape>),

    /// An inline derived operator (e.g., a field typed `Omit<X, "y">`).
    Derived(DerivedShape),

    /// Anything the parser cannot express structurally.
    Any,
}

/// A literal value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LiteralValue {
    Str(String),
    Int(i64),
    Bool(bool),
}

/// A JSDoc tag: name plus raw argument text (e.g., `@format email`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsDocTag {
    pub name: String,
    pub args: Option<String>,
}

impl Declaration {
    /// The declaration's flattened identifier: namespace segments concatenated
    /// with the name (`Metropolis.Superman` -> `MetropolisSuperman`).
    pub fn flat_name(&self) -> String {
        flatten(&self.namespace, &self.name)
    }

    pub fn alias(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
            exported: true,
            generic: false,
            docs: Vec::new(),
            tags: Vec::new(),
            kind: DeclKind::Alias(shape),
        }
    }

    pub fn object(name: impl Into<String>, fields: Vec<Field>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
            exported: true,
            generic: false,
            docs: Vec::new(),
            tags: Vec::new(),
            kind: DeclKind::Object(ObjectShape { fields }),
        }
    }

    pub fn string_enum(name: impl Into<String>, members: Vec<(&str, &str)>) -> Self {
        Self {
            name: name.into(),
            namespace: Vec::new(),
            exported: true,
            generic: false,
            docs: Vec::new(),
            tags: Vec::new(),
            kind: DeclKind::Enum(EnumShape {
                variants: members
                    .into_iter()
                    .map(|(name, value)| EnumVariant {
                        name: name.to_string(),
                        value: Some(EnumValue::Str(value.to_string())),
                    })
                    .collect(),
            }),
        }
    }

    pub fn in_namespace(mut self, namespace: &[&str]) -> Self {
        self.namespace = namespace.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn not_exported(mut self) -> Self {
        self.exported = false;
        self
    }
}

impl Field {
    pub fn required(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: false,
            docs: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn optional(name: impl Into<String>, shape: Shape) -> Self {
        Self {
            name: name.into(),
            shape,
            optional: true,
            docs: Vec::new(),
            tags: Vec::new(),
        }
    }

    pub fn with_tag(mut self, name: &str, args: Option<&str>) -> Self {
        self.tags.push(JsDocTag {
            name: name.to_string(),
            args: args.map(String::from),
        });
        self
    }
}

impl Shape {
    pub fn array(inner: Shape) -> Self {
        Shape::Array(Box::new(inner))
    }

    pub fn optional(inner: Shape) -> Self {
        Shape::Optional(Box::new(inner))
    }

    pub fn reference(token: impl Into<String>) -> Self {
        Shape::Reference(token.into())
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        Shape::Literal(LiteralValue::Str(value.into()))
    }
}

/// Flatten a namespace path and name into one global identifier.
pub fn flatten(namespace: &[String], name: &str) -> String {
    let mut flat = String::new();
    for segment in namespace {
        flat.push_str(segment);
    }
    flat.push_str(name);
    flat
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_declarations_programmatically() {
        let name = Declaration::alias(
            "Name",
            Shape::Union(vec![
                Shape::string_literal("superman"),
                Shape::string_literal("clark kent"),
            ]),
        );
        let superman = Declaration::object(
            "Superman",
            vec![
                Field::required("name", Shape::reference("Name")),
                Field::required("age", Shape::Number),
                Field::optional("underKryptonite", Shape::Boolean),
            ],
        );

        assert_eq!(name.flat_name(), "Name");
        assert!(matches!(superman.kind, DeclKind::Object(ref o) if o.fields.len() == 3));
    }

    #[test]
    fn flat_name_concatenates_namespace_segments() {
        let decl = Declaration::object("Superman", vec![]).in_namespace(&["Metropolis"]);
        assert_eq!(decl.flat_name(), "MetropolisSuperman");

        let nested = Declaration::object("Core", vec![]).in_namespace(&["Outer", "Inner"]);
        assert_eq!(nested.flat_name(), "OuterInnerCore");
    }
}
