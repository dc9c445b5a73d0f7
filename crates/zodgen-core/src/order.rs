//! Emission ordering: cycle-aware topological passes over the dependency
//! graph.
//!
//! Each run performs Kahn passes (emit everything whose dependencies are
//! already emitted, discovery order as the tie-break) until no progress, then
//! breaks self-cycles: any remaining declaration blocked only by itself is
//! emitted with a deferred (lazy) marker. Runs repeat up to the configured
//! bound so chains of resolvable cycles unlock one another. Whatever is left
//! is an unresolvable cycle group: reported, never fatal, and the rest of the
//! graph still emits.

use crate::graph::DependencyGraph;
use std::collections::BTreeSet;

/// Result of planning the emission order for a selected declaration set.
#[derive(Debug, Default, Clone)]
pub struct EmissionPlan {
    /// Emittable declarations, in emission order.
    pub order: Vec<usize>,
    /// Declarations whose self-cycle was broken; rendered behind a deferred
    /// (lazy) reference.
    pub deferred: BTreeSet<usize>,
    /// Groups of declarations that could not be ordered within the retry
    /// bound. One group per connected cluster of leftover declarations.
    pub unresolved: Vec<BTreeSet<usize>>,
}

/// Compute the emission order for `selected` (ascending discovery order).
///
/// `selected` must be dependency-closed: every edge target of a selected
/// declaration is itself selected.
pub fn plan(selected: &[usize], graph: &DependencyGraph, max_run: u32) -> EmissionPlan {
    let mut plan = EmissionPlan::default();
    let mut emitted: BTreeSet<usize> = BTreeSet::new();
    let mut remaining: Vec<usize> = selected.to_vec();

    for _run in 0..max_run {
        // Kahn passes: emit every declaration whose dependencies are all
        // emitted. Scanning `remaining` in discovery order keeps ties stable.
        loop {
            let ready: Vec<usize> = remaining
                .iter()
                .copied()
                .filter(|&i| graph.dependencies_of(i).all(|d| emitted.contains(&d)))
                .collect();
            if ready.is_empty() {
                break;
            }
            for i in ready {
                emitted.insert(i);
                plan.order.push(i);
            }
            remaining.retain(|i| !emitted.contains(i));
        }

        if remaining.is_empty() {
            return plan;
        }

        // Cycle breaking: a declaration blocked only by its own self-edge is
        // emitted anyway, with self-references deferred to render time.
        let breakable: Vec<usize> = remaining
            .iter()
            .copied()
            .filter(|&i| {
                graph
                    .dependencies_of(i)
                    .all(|d| d == i || emitted.contains(&d))
            })
            .collect();
        if breakable.is_empty() {
            // Only mutual cycles left; further runs cannot make progress.
            break;
        }
        for i in breakable {
            emitted.insert(i);
            plan.deferred.insert(i);
            plan.order.push(i);
        }
        remaining.retain(|i| !emitted.contains(i));

        if remaining.is_empty() {
            return plan;
        }
    }

    plan.unresolved = group_leftovers(&remaining, graph);
    plan
}

/// Partition leftover declarations into connected groups (undirected
/// connectivity over the dependency edges restricted to the leftovers).
fn group_leftovers(remaining: &[usize], graph: &DependencyGraph) -> Vec<BTreeSet<usize>> {
    let leftover: BTreeSet<usize> = remaining.iter().copied().collect();
    let mut seen: BTreeSet<usize> = BTreeSet::new();
    let mut groups = Vec::new();

    for &start in remaining {
        if seen.contains(&start) {
            continue;
        }
        let mut group = BTreeSet::new();
        let mut frontier = vec![start];
        while let Some(i) = frontier.pop() {
            if !group.insert(i) {
                continue;
            }
            seen.insert(i);
            for (from, to) in graph.edges() {
                if from == i && leftover.contains(&to) && !group.contains(&to) {
                    frontier.push(to);
                }
                if to == i && leftover.contains(&from) && !group.contains(&from) {
                    frontier.push(from);
                }
            }
        }
        groups.push(group);
    }
    groups
}
