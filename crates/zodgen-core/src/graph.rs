//! Dependency graph construction.
//!
//! Walks every declaration's shape and records one edge per (referencing,
//! referenced) declaration pair. A declaration referencing itself, directly or
//! through array/optional/union wrappers, yields a self-edge; self-edges are
//! the only cycles the emission engine can break. Enum-member literals
//! (`Enum.Member`) bind to the enum's runtime representation, not its schema,
//! and produce no edge.

use crate::ir::{DeclKind, DerivedShape, Shape};
use crate::resolve::{Resolution, resolve};
use crate::table::DeclarationTable;
use std::collections::BTreeSet;

/// Deduplicated dependency edges over declaration indices.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    edges: BTreeSet<(usize, usize)>,
}

impl DependencyGraph {
    /// Build the graph for every declaration in the table.
    pub fn build(table: &DeclarationTable) -> Self {
        let mut graph = Self::default();
        for (index, decl) in table.iter() {
            let mut walker = Walker {
                table,
                from: index,
                namespace: &decl.namespace,
                edges: &mut graph.edges,
            };
            match &decl.kind {
                DeclKind::Alias(shape) => walker.walk(shape),
                DeclKind::Object(object) => {
                    for field in &object.fields {
                        walker.walk(&field.shape);
                    }
                }
                DeclKind::Enum(_) => {}
                DeclKind::Derived(derived) => walker.walk_derived(derived),
            }
        }
        graph
    }

    /// Declarations `from` depends on, ascending.
    pub fn dependencies_of(&self, from: usize) -> impl Iterator<Item = usize> + '_ {
        self.edges
            .range((from, 0)..=(from, usize::MAX))
            .map(|&(_, to)| to)
    }

    pub fn has_edge(&self, from: usize, to: usize) -> bool {
        self.edges.contains(&(from, to))
    }

    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.edges.iter().copied()
    }

    /// Expand `requested` with every declaration reachable through dependency
    /// edges. Emitting a declaration requires all of its dependencies, so
    /// filtered-out declarations are pulled back in when something selected
    /// needs them.
    pub fn dependency_closure(&self, requested: &BTreeSet<usize>) -> BTreeSet<usize> {
        let mut selected = requested.clone();
        let mut frontier: Vec<usize> = requested.iter().copied().collect();
        while let Some(from) = frontier.pop() {
            for to in self.dependencies_of(from) {
                if selected.insert(to) {
                    frontier.push(to);
                }
            }
        }
        selected
    }
}

struct Walker<'a> {
    table: &'a DeclarationTable,
    from: usize,
    namespace: &'a [String],
    edges: &'a mut BTreeSet<(usize, usize)>,
}

impl Walker<'_> {
    fn walk(&mut self, shape: &Shape) {
        match shape {
            Shape::Reference(token) => {
                match resolve(self.table, token, self.namespace) {
                    Resolution::Decl(to) => {
                        self.edges.insert((self.from, to));
                    }
                    // Runtime enum access or opaque external type: no edge.
                    Resolution::EnumMember { .. } | Resolution::Opaque => {}
                }
            }
            Shape::Array(inner) | Shape::Optional(inner) => self.walk(inner),
            Shape::Union(members) => {
                for member in members {
                    self.walk(member);
                }
            }
            Shape::Derived(derived) => self.walk_derived(derived),
            Shape::String
            | Shape::Number
            | Shape::Boolean
            | Shape::Null
            | Shape::Literal(_)
            | Shape::Any => {}
        }
    }

    fn walk_derived(&mut self, derived: &DerivedShape) {
        if let Resolution::Decl(to) = resolve(self.table, &derived.base, self.namespace) {
            self.edges.insert((self.from, to));
        }
    }
}
