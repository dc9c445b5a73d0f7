//! Validator expression tree.
//!
//! The shape compiler lowers each declaration to this tree; the output
//! renderers turn it into zod construction expressions. References to other
//! schemas stay symbolic (by generated identifier) so no cyclic object graph
//! is ever built; deferred records are wrapped in `z.lazy` at render time.

use crate::ir::LiteralValue;
use serde::{Deserialize, Serialize};

/// A validator construction expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SchemaExpr {
    /// `z.string()`, with chained refinement checks.
    String(Vec<Check>),
    /// `z.number()`, with chained refinement checks.
    Number(Vec<Check>),
    /// `z.boolean()`.
    Boolean,
    /// `z.null()`.
    Null,
    /// `z.any()`, the catch-all for unresolved or inexpressible types.
    Any,

    /// `z.literal(<value>)`.
    Literal(LiteralValue),
    /// `z.literal(Enum.Member)`: an enum member used as a literal type.
    EnumLiteral { enum_name: String, member: String },
    /// `z.nativeEnum(Enum)`: bound to the enum's runtime representation.
    NativeEnum(String),

    /// `z.union([..])`.
    Union(Vec<SchemaExpr>),
    /// `z.array(<inner>)`.
    Array(Box<SchemaExpr>),
    /// `<inner>.optional()`.
    Optional(Box<SchemaExpr>),
    /// `z.object({ .. })`.
    Object(Vec<Property>),

    /// A symbolic reference to another record's generated identifier.
    Ref(String),

    /// `<base>.omit({ "k": true, .. })`.
    Omit {
        base: Box<SchemaExpr>,
        keys: Vec<String>,
    },
    /// `<base>.pick({ "k": true, .. })`.
    Pick {
        base: Box<SchemaExpr>,
        keys: Vec<String>,
    },
}

/// A property of an object expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub expr: SchemaExpr,
    /// JSDoc content lines, re-emitted above the property when comment
    /// retention is enabled. Empty otherwise.
    pub docs: Vec<String>,
}

/// A refinement check chained onto a primitive validator, derived from
/// documentation tags (`@format email`, `@minLength 2`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Check {
    /// `.email()`
    Email,
    /// `.url()`
    Url,
    /// `.uuid()`
    Uuid,
    /// `.min(<arg>)` with the raw argument text from the tag.
    Min(String),
    /// `.max(<arg>)`
    Max(String),
}

impl SchemaExpr {
    pub fn string() -> Self {
        SchemaExpr::String(Vec::new())
    }

    pub fn number() -> Self {
        SchemaExpr::Number(Vec::new())
    }

    pub fn array(inner: SchemaExpr) -> Self {
        SchemaExpr::Array(Box::new(inner))
    }

    pub fn optional(inner: SchemaExpr) -> Self {
        SchemaExpr::Optional(Box::new(inner))
    }

    pub fn literal_str(value: impl Into<String>) -> Self {
        SchemaExpr::Literal(LiteralValue::Str(value.into()))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        SchemaExpr::Ref(name.into())
    }

    pub fn object(props: Vec<(&str, SchemaExpr)>) -> Self {
        SchemaExpr::Object(
            props
                .into_iter()
                .map(|(name, expr)| Property {
                    name: name.to_string(),
                    expr,
                    docs: Vec::new(),
                })
                .collect(),
        )
    }

    /// Collect, in first-use order, the enum identifiers this expression
    /// mentions (`z.nativeEnum(..)` / `z.literal(Enum.Member)`). These must be
    /// imported from the source module by the schema-file renderer.
    pub fn enum_names(&self, out: &mut Vec<String>) {
        match self {
            SchemaExpr::NativeEnum(name) => {
                if !out.contains(name) {
                    out.push(name.clone());
                }
            }
            SchemaExpr::EnumLiteral { enum_name, .. } => {
                if !out.contains(enum_name) {
                    out.push(enum_name.clone());
                }
            }
            SchemaExpr::Union(members) => {
                for m in members {
                    m.enum_names(out);
                }
            }
            SchemaExpr::Array(inner) | SchemaExpr::Optional(inner) => inner.enum_names(out),
            SchemaExpr::Object(props) => {
                for p in props {
                    p.expr.enum_names(out);
                }
            }
            SchemaExpr::Omit { base, .. } | SchemaExpr::Pick { base, .. } => base.enum_names(out),
            _ => {}
        }
    }
}
