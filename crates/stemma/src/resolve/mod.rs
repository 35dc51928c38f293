//! Selecting the people that belong in one view.
//!
//! [`RelationshipResolver`] turns a root query plus generation limits into a
//! [`Selection`]. With a root it walks a bounded number of generations up
//! and down; without a root and with no limits it selects the complete tree.
//!
//! Problems with the request itself (an unknown root, an ambiguous name) are
//! reported as [`Condition`]s on the [`Resolution`] and never fail the call.

mod complete;
pub mod name;

use crate::domain::PersonId;
use crate::store::PersonStore;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use tracing::{debug, warn};

pub use name::{match_name, NameMatches};

/// How the caller names the root person.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootQuery {
    /// Exact person ID.
    Id(PersonId),
    /// Display name, matched case-insensitively.
    Name(String),
}

impl fmt::Display for RootQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "id {id}"),
            Self::Name(name) => write!(f, "name '{name}'"),
        }
    }
}

/// The set of people included in one view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Selection(BTreeSet<PersonId>);

impl Selection {
    /// Returns `true` if the person is included.
    #[must_use]
    pub fn contains(&self, id: &PersonId) -> bool {
        self.0.contains(id)
    }

    /// Number of people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for an empty selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Included IDs in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &PersonId> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, id: PersonId) -> bool {
        self.0.insert(id)
    }
}

impl FromIterator<PersonId> for Selection {
    fn from_iter<T: IntoIterator<Item = PersonId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a PersonId;
    type IntoIter = std::collections::btree_set::Iter<'a, PersonId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A recoverable problem with a view request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Condition {
    /// The root did not match anyone. The selection is empty.
    PersonNotFound {
        /// The query as given
        query: String,
    },

    /// Several people matched the root name. The first was used.
    AmbiguousName {
        /// The query as given
        query: String,
        /// The person used as root
        chosen: PersonId,
        /// Every candidate in the matching tier, in store order
        candidates: Vec<PersonId>,
    },

    /// Complete-tree mode found no root ancestors and started from the first
    /// person in the store instead.
    NoRootAncestors {
        /// The fallback starting person
        fallback: PersonId,
    },

    /// Generation limits were given without a root. The selection is empty.
    LimitsWithoutRoot {
        /// Requested generations back
        generations_back: u32,
        /// Requested generations forward
        generations_forward: u32,
    },
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PersonNotFound { query } => write!(f, "no person matches {query}"),
            Self::AmbiguousName {
                query,
                chosen,
                candidates,
            } => write!(
                f,
                "name '{query}' matches {} people; using {chosen}",
                candidates.len()
            ),
            Self::NoRootAncestors { fallback } => {
                write!(f, "no root ancestors found; starting from {fallback}")
            }
            Self::LimitsWithoutRoot {
                generations_back,
                generations_forward,
            } => write!(
                f,
                "generation limits (back {generations_back}, forward {generations_forward}) need a root person"
            ),
        }
    }
}

/// Outcome of resolving one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// People included in the view
    pub selection: Selection,
    /// The resolved root, in bounded mode
    pub root: Option<PersonId>,
    /// Starting people of complete-tree mode, one per family unit
    pub root_ancestors: Vec<PersonId>,
    /// People complete-tree mode could not reach from any root ancestor
    pub unconnected: Vec<PersonId>,
    /// Recoverable problems with the request
    pub conditions: Vec<Condition>,
}

/// Computes selections against a borrowed store.
///
/// All traversal state is local to each call.
#[derive(Debug, Clone, Copy)]
pub struct RelationshipResolver<'a> {
    store: &'a PersonStore,
}

impl<'a> RelationshipResolver<'a> {
    /// Creates a resolver over `store`.
    #[must_use]
    pub fn new(store: &'a PersonStore) -> Self {
        Self { store }
    }

    /// Resolves a view request.
    ///
    /// - With a root: the root, its spouse, up to `generations_back` levels of
    ///   ancestors and up to `generations_forward` levels of descendants.
    /// - Without a root and with both limits zero: everyone, via the
    ///   complete-tree walk.
    /// - Without a root but with a limit: an empty selection and
    ///   [`Condition::LimitsWithoutRoot`].
    #[must_use]
    pub fn resolve(
        &self,
        root: Option<&RootQuery>,
        generations_back: u32,
        generations_forward: u32,
    ) -> Resolution {
        match root {
            Some(query) => self.resolve_bounded(query, generations_back, generations_forward),
            None if generations_back == 0 && generations_forward == 0 => self.complete_tree(),
            None => {
                warn!(
                    generations_back,
                    generations_forward, "Generation limits given without a root person"
                );
                Resolution {
                    conditions: vec![Condition::LimitsWithoutRoot {
                        generations_back,
                        generations_forward,
                    }],
                    ..Resolution::default()
                }
            }
        }
    }

    /// Resolves a root query to a person, recording any condition.
    pub fn find_root(&self, query: &RootQuery, conditions: &mut Vec<Condition>) -> Option<PersonId> {
        match query {
            RootQuery::Id(id) if self.store.contains(id) => Some(id.clone()),
            RootQuery::Id(id) => {
                debug!(person = %id, "Root id not in store");
                conditions.push(Condition::PersonNotFound {
                    query: id.to_string(),
                });
                None
            }
            RootQuery::Name(name) => {
                let matches = match_name(self.store, name);
                let tier = matches.best_tier();
                let Some(chosen) = tier.first() else {
                    debug!(query = %name, "Root name matched nobody");
                    conditions.push(Condition::PersonNotFound {
                        query: name.clone(),
                    });
                    return None;
                };
                if tier.len() > 1 {
                    warn!(
                        query = %name,
                        candidates = tier.len(),
                        chosen = %chosen,
                        "Ambiguous root name, using first match"
                    );
                    conditions.push(Condition::AmbiguousName {
                        query: name.clone(),
                        chosen: chosen.clone(),
                        candidates: tier.to_vec(),
                    });
                }
                Some(chosen.clone())
            }
        }
    }

    fn resolve_bounded(&self, query: &RootQuery, back: u32, forward: u32) -> Resolution {
        let mut conditions = Vec::new();
        let Some(root) = self.find_root(query, &mut conditions) else {
            return Resolution {
                conditions,
                ..Resolution::default()
            };
        };

        let mut selection = Selection::default();
        selection.insert(root.clone());
        if let Some(spouse) = self.store.spouse_of(&root) {
            selection.insert(spouse.clone());
        }

        let store = self.store;
        walk(&root, back, &mut selection, |id| store.parents_of(id));
        walk(&root, forward, &mut selection, |id| {
            store.children_of(id).iter().collect()
        });

        debug!(
            root = %root,
            generations_back = back,
            generations_forward = forward,
            people = selection.len(),
            "Resolved bounded view"
        );
        Resolution {
            selection,
            root: Some(root),
            conditions,
            ..Resolution::default()
        }
    }

    /// Starting people of the complete-tree walk, in store order.
    ///
    /// A root ancestor has no resolvable parent and is not married to anyone
    /// who has one. Spouse pairs contribute only their first member.
    #[must_use]
    pub fn root_ancestors(&self) -> Vec<PersonId> {
        complete::root_ancestors(self.store)
    }

    fn complete_tree(&self) -> Resolution {
        complete::resolve(self.store)
    }
}

/// Adds everyone within `levels` steps of `start` along `next`.
///
/// A person is expanded again only when reached with more levels left
/// than before, which keeps the walk finite on cyclic data while still
/// finding the shortest route to every person.
fn walk<'s, F>(start: &PersonId, levels: u32, selection: &mut Selection, next: F)
where
    F: Fn(&PersonId) -> Vec<&'s PersonId>,
{
    let mut best: HashMap<PersonId, u32> = HashMap::new();
    let mut stack = vec![(start.clone(), levels)];

    while let Some((person, remaining)) = stack.pop() {
        if remaining == 0 {
            continue;
        }
        if best.get(&person).is_some_and(|&seen| seen >= remaining) {
            continue;
        }
        best.insert(person.clone(), remaining);

        for relative in next(&person) {
            selection.insert(relative.clone());
            stack.push((relative.clone(), remaining - 1));
        }
    }
}
