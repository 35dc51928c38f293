//! Pairing spouses into unions and wiring children to them.

use super::{Edge, EdgeKind, FamilyGraph, Node, NodeRef, PersonNode, Union, UnionId};
use crate::domain::PersonId;
use crate::generation::GenerationMap;
use crate::resolve::Selection;
use crate::store::PersonStore;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Sorted member pair; the internal key of a union.
type Pair = (PersonId, PersonId);

fn pair(a: &PersonId, b: &PersonId) -> Pair {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}

/// Builds a [`FamilyGraph`] from a selection and its generations.
#[derive(Debug, Clone, Copy)]
pub struct UnionBuilder<'a> {
    store: &'a PersonStore,
}

/// A spouse pair waiting to become a union.
struct Candidate<'a> {
    primary: &'a PersonId,
    merged: &'a PersonId,
    reciprocal: bool,
}

impl<'a> UnionBuilder<'a> {
    /// Creates a builder over `store`.
    #[must_use]
    pub fn new(store: &'a PersonStore) -> Self {
        Self { store }
    }

    /// Produces nodes and edges covering every selected person exactly once.
    ///
    /// A pair becomes a union when both people are selected and at least one
    /// names the other as spouse. A person joins at most one union:
    /// reciprocal pairs are formed first, then one-sided ones, each group in
    /// ID order, and a pair is skipped if either member is already taken.
    #[must_use]
    pub fn build(&self, selection: &Selection, generations: &GenerationMap) -> FamilyGraph {
        let mut unions: HashMap<Pair, Union> = HashMap::new();
        let mut member_of: HashMap<PersonId, Pair> = HashMap::new();
        let mut placement: HashMap<PersonId, NodeRef> = HashMap::new();

        for candidate in self.spouse_candidates(selection) {
            if placement.contains_key(candidate.primary) || placement.contains_key(candidate.merged)
            {
                debug!(
                    primary = %candidate.primary,
                    merged = %candidate.merged,
                    "Spouse already in a union, pair left unmerged"
                );
                continue;
            }
            let primary = self.person_node(candidate.primary, generations);
            let merged = self.person_node(candidate.merged, generations);
            let id = UnionId::for_pair(&primary.id, &merged.id);
            let key = pair(&primary.id, &merged.id);
            let node = NodeRef::Union(id.clone());
            placement.insert(primary.id.clone(), node.clone());
            placement.insert(merged.id.clone(), node);
            member_of.insert(primary.id.clone(), key.clone());
            member_of.insert(merged.id.clone(), key.clone());
            unions.insert(
                key,
                Union {
                    id,
                    generation: primary.generation.max(merged.generation),
                    primary,
                    merged,
                    children: Vec::new(),
                },
            );
        }

        let mut child_edges = Vec::new();
        for child in selection {
            let mut parents: Vec<&PersonId> = self
                .store
                .parents_of(child)
                .into_iter()
                .filter(|p| selection.contains(p))
                .collect();
            parents.dedup();

            match parents.as_slice() {
                [] => {}
                [parent] => child_edges.push(Edge {
                    from: NodeRef::Person((*parent).clone()),
                    to: NodeRef::Person(child.clone()),
                    kind: EdgeKind::SingleParent,
                }),
                [father, mother, ..] => {
                    if let Some(union) = unions.get_mut(&pair(father, mother)) {
                        union.children.push(child.clone());
                        child_edges.push(Edge {
                            from: NodeRef::Union(union.id.clone()),
                            to: NodeRef::Person(child.clone()),
                            kind: EdgeKind::ParentChild,
                        });
                    } else {
                        for parent in [father, mother] {
                            child_edges.push(Edge {
                                from: NodeRef::Person((*parent).clone()),
                                to: NodeRef::Person(child.clone()),
                                kind: EdgeKind::ParentChild,
                            });
                        }
                    }
                }
            }
        }

        let mut nodes = Vec::with_capacity(selection.len());
        let mut edges = Vec::new();
        for person in selection {
            match member_of.get(person) {
                Some(key) => {
                    if let Some(union) = unions.remove(key) {
                        for member in union.members() {
                            edges.push(Edge {
                                from: NodeRef::Union(union.id.clone()),
                                to: NodeRef::Person(member.clone()),
                                kind: EdgeKind::Spouse,
                            });
                        }
                        nodes.push(Node::Union(union));
                    }
                }
                None => {
                    placement.insert(person.clone(), NodeRef::Person(person.clone()));
                    nodes.push(Node::Person(self.person_node(person, generations)));
                }
            }
        }
        edges.append(&mut child_edges);

        debug!(
            nodes = nodes.len(),
            edges = edges.len(),
            people = selection.len(),
            "Built family graph"
        );
        FamilyGraph::new(nodes, edges, placement)
    }

    /// Selected spouse pairs, reciprocal ones first, each pair once.
    fn spouse_candidates<'s>(&self, selection: &'s Selection) -> Vec<Candidate<'s>>
    where
        'a: 's,
    {
        let mut candidates: Vec<Candidate<'s>> = Vec::new();
        let mut seen: HashSet<(&PersonId, &PersonId)> = HashSet::new();
        for person in selection {
            let Some(spouse) = self.store.spouse_of(person) else {
                continue;
            };
            if spouse == person || !selection.contains(spouse) {
                continue;
            }
            let (primary, merged) = if person < spouse {
                (person, spouse)
            } else {
                (spouse, person)
            };
            if !seen.insert((primary, merged)) {
                continue;
            }
            let reciprocal = self.store.spouse_of(spouse) == Some(person);
            candidates.push(Candidate {
                primary,
                merged,
                reciprocal,
            });
        }
        candidates.sort_by(|a, b| {
            b.reciprocal
                .cmp(&a.reciprocal)
                .then_with(|| a.primary.cmp(b.primary))
                .then_with(|| a.merged.cmp(b.merged))
        });
        candidates
    }

    fn person_node(&self, id: &PersonId, generations: &GenerationMap) -> PersonNode {
        let (label, living) = match self.store.get(id) {
            Some(record) => (record.label_lines(), record.living),
            None => (vec![self.store.name_of(id)], None),
        };
        PersonNode {
            id: id.clone(),
            label,
            living,
            generation: generations.get(id).unwrap_or(0),
        }
    }
}
