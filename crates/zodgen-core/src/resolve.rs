//! Name resolution: reference tokens to declaration indices.
//!
//! Resolution order: exact match in the referencing declaration's namespace,
//! then the root namespace, then unresolved. Unresolved references are not an
//! error; they degrade to the catch-all validator and produce no dependency
//! edge.

use crate::ir::DeclKind;
use crate::table::DeclarationTable;

/// Outcome of resolving one reference token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The token denotes a declaration in the table.
    Decl(usize),
    /// The token denotes a member of a runtime enum (`Superhero.Superman`).
    EnumMember { decl: usize, member: String },
    /// Nothing in the analyzed set matches; treated as an opaque type.
    Opaque,
}

/// Resolve `token` as seen from a declaration in `namespace`.
pub fn resolve(table: &DeclarationTable, token: &str, namespace: &[String]) -> Resolution {
    if let Some((head, member)) = token.split_once('.') {
        // `Enum.Member` takes priority: the head must resolve to an enum.
        if let Some(idx) = lookup(table, head, namespace) {
            if matches!(table.get(idx).kind, DeclKind::Enum(_)) && !member.contains('.') {
                return Resolution::EnumMember {
                    decl: idx,
                    member: member.to_string(),
                };
            }
        }
        // Otherwise treat the dots as namespace qualification and flatten.
        let flat: String = token.split('.').collect();
        if let Some(idx) = lookup(table, &flat, namespace) {
            return Resolution::Decl(idx);
        }
        return Resolution::Opaque;
    }

    match lookup(table, token, namespace) {
        Some(idx) => Resolution::Decl(idx),
        None => Resolution::Opaque,
    }
}

fn lookup(table: &DeclarationTable, name: &str, namespace: &[String]) -> Option<usize> {
    table
        .lookup_in(namespace, name)
        .or_else(|| table.lookup_flat(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{Declaration, Shape};

    fn table() -> DeclarationTable {
        DeclarationTable::build(vec![
            Declaration::alias("Name", Shape::String),
            Declaration::alias("Name", Shape::Number).in_namespace(&["Metropolis"]),
            Declaration::string_enum("Superhero", vec![("Superman", "superman")]),
        ])
    }

    #[test]
    fn same_namespace_wins_over_root() {
        let ns = vec!["Metropolis".to_string()];
        assert_eq!(resolve(&table(), "Name", &ns), Resolution::Decl(1));
    }

    #[test]
    fn falls_back_to_root_namespace() {
        let ns = vec!["Gotham".to_string()];
        assert_eq!(resolve(&table(), "Name", &ns), Resolution::Decl(0));
        assert_eq!(resolve(&table(), "Name", &[]), Resolution::Decl(0));
    }

    #[test]
    fn unknown_token_is_opaque() {
        assert_eq!(resolve(&table(), "Batman", &[]), Resolution::Opaque);
    }

    #[test]
    fn dotted_token_resolves_enum_member() {
        assert_eq!(
            resolve(&table(), "Superhero.Superman", &[]),
            Resolution::EnumMember {
                decl: 2,
                member: "Superman".to_string()
            }
        );
    }

    #[test]
    fn dotted_token_flattens_namespace_qualification() {
        assert_eq!(
            resolve(&table(), "Metropolis.Name", &[]),
            Resolution::Decl(1)
        );
    }
}
