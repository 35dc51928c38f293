//! Relationship diagnostics run once after a store is built.
//!
//! Nothing here changes the store. Findings become [`LoadWarning`]s so that
//! `stemma check` can list them and the pipeline can log them.

use super::{LoadWarning, PersonStore};
use crate::domain::PersonId;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// A relation column of a person record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// `father_id`
    Father,
    /// `mother_id`
    Mother,
    /// `spouse_id`
    Spouse,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Father => "father",
            Self::Mother => "mother",
            Self::Spouse => "spouse",
        })
    }
}

pub(super) fn diagnose(store: &PersonStore) -> Vec<LoadWarning> {
    let mut warnings = Vec::new();

    for record in store.iter() {
        let relations = [
            (Relation::Father, &record.father),
            (Relation::Mother, &record.mother),
            (Relation::Spouse, &record.spouse),
        ];
        for (relation, target) in relations {
            if let Some(target) = target
                && !store.contains(target)
            {
                debug!(person = %record.id, %relation, %target, "Dangling reference");
                warnings.push(LoadWarning::DanglingReference {
                    id: record.id.clone(),
                    relation,
                    target: target.clone(),
                });
            }
        }

        if let Some(spouse) = store.spouse_of(&record.id) {
            let back = store.get(spouse).and_then(|s| s.spouse.clone());
            if back.as_ref() != Some(&record.id) {
                warnings.push(LoadWarning::NonReciprocalSpouse {
                    id: record.id.clone(),
                    spouse: spouse.clone(),
                    spouse_of_spouse: back,
                });
            }
        }
    }

    let cycles = cyclic_components(store.iter().map(|r| &r.id), |id| store.parents_of(id));
    for members in cycles {
        warn!(size = members.len(), ?members, "Ancestry cycle in data");
        warnings.push(LoadWarning::AncestryCycle { members });
    }

    warnings
}

/// Finds groups of people who are their own ancestors.
///
/// Builds a parent→child graph over `people` (parents outside `people` are
/// ignored) and returns its non-trivial strongly connected components, each
/// sorted, in sorted order. A component is non-trivial when it has more
/// than one member or a member is its own parent.
pub(crate) fn cyclic_components<'a, I, F>(people: I, parents: F) -> Vec<Vec<PersonId>>
where
    I: IntoIterator<Item = &'a PersonId>,
    F: Fn(&'a PersonId) -> Vec<&'a PersonId>,
{
    let mut graph: DiGraph<&'a PersonId, ()> = DiGraph::new();
    let mut nodes: HashMap<&'a PersonId, NodeIndex> = HashMap::new();
    let mut order = Vec::new();

    for id in people {
        if !nodes.contains_key(id) {
            nodes.insert(id, graph.add_node(id));
            order.push(id);
        }
    }
    for child in order {
        let child_node = nodes[child];
        for parent in parents(child) {
            if let Some(&parent_node) = nodes.get(parent) {
                graph.add_edge(parent_node, child_node, ());
            }
        }
    }

    let mut cycles: Vec<Vec<PersonId>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&n| graph.contains_edge(n, n))
        })
        .map(|component| {
            let mut members: Vec<PersonId> =
                component.iter().map(|&n| graph[n].clone()).collect();
            members.sort();
            members
        })
        .collect();
    cycles.sort();
    cycles
}
