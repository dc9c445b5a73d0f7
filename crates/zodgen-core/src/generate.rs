//! The `generate` entry point: declarations + configuration to ordered
//! emission records and diagnostics.
//!
//! Pure and synchronous; all intermediate state (table, graph, plan) is
//! rebuilt per invocation and dropped afterwards. Diagnostics are returned as
//! data; a problematic declaration never blocks unrelated ones.

use crate::compile::compile;
use crate::config::GenerateConfig;
use crate::expr::SchemaExpr;
use crate::graph::DependencyGraph;
use crate::ir::Declaration;
use crate::order;
use crate::table::DeclarationTable;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One emitted schema definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmissionRecord {
    /// Generated schema identifier (e.g., `supermanSchema`).
    pub schema_name: String,
    /// Flattened identifier of the original declaration (e.g.,
    /// `MetropolisSuperman`).
    pub type_name: String,
    /// Whether the original declaration was exported.
    pub exported: bool,
    /// Whether the schema must be wrapped in a deferred (lazy) reference
    /// because its own expression refers back to it.
    pub deferred: bool,
    /// JSDoc content lines (empty unless comment retention is on).
    pub docs: Vec<String>,
    /// The validator construction expression.
    pub expr: SchemaExpr,
}

/// A type-equivalence assertion between an original declaration and the
/// inferred shape of its generated validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeAssertion {
    pub type_name: String,
    pub schema_name: String,
}

/// Output of one `generate` invocation.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct GenerateResult {
    /// Emission records, ordered so every direct reference points backwards.
    pub records: Vec<EmissionRecord>,
    /// Assertion pairs for records whose original declaration is exported.
    pub assertions: Vec<TypeAssertion>,
    /// One diagnostic per unresolvable-cycle group, non-fatal.
    pub diagnostics: Vec<String>,
}

/// Convert a declaration set into ordered validator emission records.
pub fn generate(declarations: Vec<Declaration>, config: &GenerateConfig) -> GenerateResult {
    let table = DeclarationTable::build(declarations);
    let graph = DependencyGraph::build(&table);

    // Selection: requested by the filters, then closed over dependencies so
    // everything a requested schema references is also emitted.
    let requested: BTreeSet<usize> = table
        .iter()
        .filter(|(_, decl)| {
            config.name_requested(&decl.flat_name(), decl.exported)
                && config.tags_accepted(&decl.tags)
        })
        .map(|(index, _)| index)
        .collect();
    let selected: Vec<usize> = graph
        .dependency_closure(&requested)
        .into_iter()
        .collect();

    let plan = order::plan(&selected, &graph, config.max_run);

    let records: Vec<EmissionRecord> = plan
        .order
        .iter()
        .map(|&index| {
            let decl = table.get(index);
            let flat = decl.flat_name();
            EmissionRecord {
                schema_name: config.schema_name(&flat),
                type_name: flat,
                exported: decl.exported,
                deferred: plan.deferred.contains(&index),
                docs: if config.keep_comments {
                    decl.docs.clone()
                } else {
                    Vec::new()
                },
                expr: compile(&table, config, index),
            }
        })
        .collect();

    let assertions = records
        .iter()
        .filter(|record| record.exported)
        .map(|record| TypeAssertion {
            type_name: record.type_name.clone(),
            schema_name: record.schema_name.clone(),
        })
        .collect();

    let diagnostics = plan
        .unresolved
        .iter()
        .map(|group| {
            let mut names: Vec<String> = group
                .iter()
                .map(|&index| config.schema_name(&table.get(index).flat_name()))
                .collect();
            names.sort();
            names.dedup();
            format!(
                "Some schemas can't be generated due to circular dependencies:\n{}",
                names.join("\n")
            )
        })
        .collect();

    GenerateResult {
        records,
        assertions,
        diagnostics,
    }
}
