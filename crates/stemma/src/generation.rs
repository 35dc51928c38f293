//! Generation numbers for a selection.
//!
//! A person with no resolvable parent is generation 0; anyone else is one
//! more than their highest parent. Numbers are then shifted so the oldest
//! selected person is 0.
//!
//! Real data is messy, so the recursion is guarded three ways:
//!
//! - people on an ancestry cycle (a strongly connected component of the
//!   parent graph) are pinned to 0 before the walk starts, so every member
//!   of a loop gets the same value regardless of where the walk enters it;
//! - reaching a person already on the current path yields 0;
//! - an ancestor more than [`GenerationOptions::max_depth`] levels above the
//!   person being assigned yields 0 and is recorded as depth limited.

use crate::domain::PersonId;
use crate::resolve::Selection;
use crate::store::{cyclic_components, PersonStore};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

/// Default recursion depth guard.
pub const DEFAULT_MAX_DEPTH: u32 = 20;

/// Where parents are looked up when computing generations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentScope {
    /// Any parent in the store counts, even one outside the selection.
    #[default]
    Store,
    /// Only parents inside the selection count.
    Selection,
}

/// Tuning for [`GenerationAssigner`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOptions {
    /// Ancestor levels followed above each person; the level past this
    /// counts as 0
    pub max_depth: u32,
    /// Parent lookup scope
    pub parent_scope: ParentScope,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            parent_scope: ParentScope::Store,
        }
    }
}

/// Normalized generation per selected person.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationMap {
    generations: BTreeMap<PersonId, u32>,
    /// Selected people pinned to 0 because they sit on an ancestry cycle
    cyclic: BTreeSet<PersonId>,
    /// People whose walk hit the depth guard
    depth_limited: BTreeSet<PersonId>,
}

impl GenerationMap {
    /// Generation of a selected person.
    #[must_use]
    pub fn get(&self, id: &PersonId) -> Option<u32> {
        self.generations.get(id).copied()
    }

    /// `(person, generation)` pairs in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (&PersonId, u32)> {
        self.generations.iter().map(|(id, &g)| (id, g))
    }

    /// Number of people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.generations.len()
    }

    /// Returns `true` when no one was assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generations.is_empty()
    }

    /// Highest generation present.
    #[must_use]
    pub fn max_generation(&self) -> Option<u32> {
        self.generations.values().copied().max()
    }

    /// Selected people found on ancestry cycles.
    #[must_use]
    pub fn cyclic(&self) -> &BTreeSet<PersonId> {
        &self.cyclic
    }

    /// People whose ancestry was cut off by the depth guard.
    #[must_use]
    pub fn depth_limited(&self) -> &BTreeSet<PersonId> {
        &self.depth_limited
    }

}

/// Computes a [`GenerationMap`] for a selection.
#[derive(Debug, Clone, Copy)]
pub struct GenerationAssigner<'a> {
    store: &'a PersonStore,
    options: GenerationOptions,
}

/// Per-call walk state.
struct Walk<'s> {
    /// Set in [`ParentScope::Selection`] mode
    scope: Option<&'s Selection>,
    memo: HashMap<PersonId, u32>,
    path: HashSet<PersonId>,
    depth_limited: BTreeSet<PersonId>,
}

impl<'a> GenerationAssigner<'a> {
    /// Creates an assigner over `store`.
    #[must_use]
    pub fn new(store: &'a PersonStore, options: GenerationOptions) -> Self {
        Self { store, options }
    }

    /// Assigns normalized generations to every selected person.
    #[must_use]
    pub fn assign(&self, selection: &Selection) -> GenerationMap {
        let scope = match self.options.parent_scope {
            ParentScope::Store => None,
            ParentScope::Selection => Some(selection),
        };
        let mut walk = Walk {
            scope,
            memo: HashMap::new(),
            path: HashSet::new(),
            depth_limited: BTreeSet::new(),
        };

        let pinned = self.cycle_members(selection, scope);
        for id in &pinned {
            walk.memo.insert(id.clone(), 0);
        }
        if !pinned.is_empty() {
            warn!(people = pinned.len(), "Ancestry cycle, generation pinned to 0");
        }

        let raw: Vec<(PersonId, u32)> = selection
            .iter()
            .map(|id| (id.clone(), self.generation_of(id, 0, &mut walk)))
            .collect();

        let floor = raw.iter().map(|&(_, g)| g).min().unwrap_or(0);
        let generations: BTreeMap<PersonId, u32> =
            raw.into_iter().map(|(id, g)| (id, g - floor)).collect();

        if !walk.depth_limited.is_empty() {
            warn!(
                people = walk.depth_limited.len(),
                max_depth = self.options.max_depth,
                "Ancestry deeper than depth guard, generations truncated"
            );
        }
        debug!(
            people = generations.len(),
            offset = floor,
            "Assigned generations"
        );

        GenerationMap {
            generations,
            cyclic: pinned
                .into_iter()
                .filter(|id| selection.contains(id))
                .collect(),
            depth_limited: walk.depth_limited,
        }
    }

    /// Raw (unnormalized) generation of one person.
    fn generation_of(&self, id: &PersonId, depth: u32, walk: &mut Walk<'_>) -> u32 {
        if let Some(&known) = walk.memo.get(id) {
            return known;
        }
        if walk.path.contains(id) {
            return 0;
        }
        // depth counts ancestor levels, the assigned person is level 0
        if depth > self.options.max_depth {
            walk.depth_limited.insert(id.clone());
            return 0;
        }

        let parents = self.parents(id, walk.scope);
        if parents.is_empty() {
            walk.memo.insert(id.clone(), 0);
            return 0;
        }

        walk.path.insert(id.clone());
        let highest = parents
            .into_iter()
            .map(|parent| self.generation_of(parent, depth + 1, walk))
            .max()
            .unwrap_or(0);
        walk.path.remove(id);

        let generation = highest + 1;
        walk.memo.insert(id.clone(), generation);
        generation
    }

    fn parents(&self, id: &PersonId, scope: Option<&Selection>) -> Vec<&'a PersonId> {
        let parents = self.store.parents_of(id);
        match scope {
            Some(selection) => parents
                .into_iter()
                .filter(|p| selection.contains(p))
                .collect(),
            None => parents,
        }
    }

    /// Members of non-trivial strongly connected components of the scoped
    /// parent graph, taken over the selection and everything it can reach
    /// upwards.
    fn cycle_members(&self, selection: &Selection, scope: Option<&Selection>) -> BTreeSet<PersonId> {
        let reach = self.ancestor_closure(selection, scope);
        cyclic_components(reach, |id| self.parents(id, scope))
            .into_iter()
            .flatten()
            .collect()
    }

    /// Selected people known to the store plus all their scoped ancestors.
    fn ancestor_closure(&self, selection: &Selection, scope: Option<&Selection>) -> Vec<&'a PersonId> {
        let mut seen: HashSet<&'a PersonId> = HashSet::new();
        let mut stack: Vec<&'a PersonId> = selection
            .iter()
            .filter_map(|id| self.store.get(id).map(|r| &r.id))
            .collect();
        let mut order = Vec::new();

        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.parents(id, scope));
        }
        order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::{id, store};
    use rstest::rstest;

    fn everyone(s: &PersonStore) -> Selection {
        s.iter().map(|r| r.id.clone()).collect()
    }

    fn pick(ids: &[&str]) -> Selection {
        ids.iter().map(|&i| id(i)).collect()
    }

    fn assign(s: &PersonStore, selection: &Selection, options: GenerationOptions) -> GenerationMap {
        GenerationAssigner::new(s, options).assign(selection)
    }

    fn generation(map: &GenerationMap, who: &str) -> Option<u32> {
        map.get(&id(who))
    }

    // =========================================================================
    // Acyclic data
    // =========================================================================

    mod acyclic_tests {
        use super::*;

        #[test]
        fn child_is_one_below_highest_parent() {
            // m's line is one generation shorter than f's
            let s = store(&[
                ("gf", "", "", ""),
                ("f", "gf", "", "m"),
                ("m", "", "", "f"),
                ("c", "f", "m", ""),
            ]);
            let map = assign(&s, &everyone(&s), GenerationOptions::default());

            assert_eq!(generation(&map, "gf"), Some(0));
            assert_eq!(generation(&map, "f"), Some(1));
            assert_eq!(generation(&map, "m"), Some(0));
            assert_eq!(generation(&map, "c"), Some(2));
            assert!(map.cyclic().is_empty());
        }

        #[test]
        fn normalizes_so_oldest_selected_is_zero() {
            let s = store(&[
                ("a", "", "", ""),
                ("b", "a", "", ""),
                ("c", "b", "", ""),
                ("d", "c", "", ""),
            ]);
            let map = assign(&s, &pick(&["c", "d"]), GenerationOptions::default());

            assert_eq!(generation(&map, "c"), Some(0));
            assert_eq!(generation(&map, "d"), Some(1));
            assert_eq!(generation(&map, "a"), None);
            assert_eq!(map.len(), 2);
        }

        #[rstest]
        #[case::store_scope(ParentScope::Store, Some(0), Some(1))]
        #[case::selection_scope(ParentScope::Selection, Some(0), Some(0))]
        fn parent_scope_decides_which_parents_count(
            #[case] parent_scope: ParentScope,
            #[case] root_generation: Option<u32>,
            #[case] in_law_generation: Option<u32>,
        ) {
            // "inlaw" has a parent outside the selection
            let s = store(&[
                ("root", "", "", ""),
                ("outside", "", "", ""),
                ("inlaw", "outside", "", ""),
            ]);
            let options = GenerationOptions {
                parent_scope,
                ..GenerationOptions::default()
            };
            let map = assign(&s, &pick(&["root", "inlaw"]), options);

            assert_eq!(generation(&map, "root"), root_generation);
            assert_eq!(generation(&map, "inlaw"), in_law_generation);
        }

        #[test]
        fn empty_selection_gives_empty_map() {
            let s = store(&[("a", "", "", "")]);
            let map = assign(&s, &Selection::default(), GenerationOptions::default());
            assert!(map.is_empty());
            assert_eq!(map.max_generation(), None);
        }
    }

    // =========================================================================
    // Guards
    // =========================================================================

    mod guard_tests {
        use super::*;

        #[test]
        fn two_person_cycle_is_pinned_to_zero() {
            let s = store(&[("x", "y", "", ""), ("y", "x", "", "")]);
            let map = assign(&s, &everyone(&s), GenerationOptions::default());

            assert_eq!(generation(&map, "x"), Some(0));
            assert_eq!(generation(&map, "y"), Some(0));
            assert_eq!(map.cyclic().len(), 2);
        }

        #[test]
        fn descendants_of_a_cycle_still_count_down() {
            let s = store(&[("x", "y", "", ""), ("y", "x", "", ""), ("k", "x", "", "")]);
            let map = assign(&s, &everyone(&s), GenerationOptions::default());

            assert_eq!(generation(&map, "k"), Some(1));
        }

        #[test]
        fn cycle_outside_selection_still_pins_in_store_scope() {
            let s = store(&[("x", "y", "", ""), ("y", "x", "", ""), ("k", "x", "", "")]);
            let map = assign(&s, &pick(&["k"]), GenerationOptions::default());

            assert_eq!(generation(&map, "k"), Some(0));
            assert!(map.cyclic().is_empty());
        }

        #[test]
        fn depth_guard_truncates_long_lines() {
            let rows: Vec<(String, String)> = (0..10)
                .map(|i| {
                    let parent = if i == 0 { String::new() } else { format!("p{}", i - 1) };
                    (format!("p{i}"), parent)
                })
                .collect();
            let table: Vec<(&str, &str, &str, &str)> = rows
                .iter()
                .map(|(id, father)| (id.as_str(), father.as_str(), "", ""))
                .collect();
            let s = store(&table);
            let options = GenerationOptions {
                max_depth: 3,
                ..GenerationOptions::default()
            };

            let map = assign(&s, &pick(&["p9"]), options);

            assert_eq!(generation(&map, "p9"), Some(0));
            assert!(!map.depth_limited().is_empty());
        }

        #[rstest]
        #[case::whole_line_fits(3, vec![])]
        #[case::oldest_cut_off(2, vec!["p0"])]
        #[case::one_level(1, vec!["p1"])]
        fn depth_guard_follows_max_depth_levels(#[case] max_depth: u32, #[case] cut: Vec<&str>) {
            let s = store(&[
                ("p0", "", "", ""),
                ("p1", "p0", "", ""),
                ("p2", "p1", "", ""),
                ("p3", "p2", "", ""),
            ]);
            let options = GenerationOptions {
                max_depth,
                ..GenerationOptions::default()
            };

            let map = assign(&s, &pick(&["p3"]), options);

            let limited: Vec<&str> = map.depth_limited().iter().map(PersonId::as_str).collect();
            assert_eq!(limited, cut);
            assert_eq!(generation(&map, "p3"), Some(0));
        }

        #[test]
        fn assignment_is_deterministic() {
            let s = store(&[
                ("x", "y", "", ""),
                ("y", "x", "", ""),
                ("a", "", "", "b"),
                ("b", "", "", "a"),
                ("c", "a", "b", ""),
            ]);
            let first = assign(&s, &everyone(&s), GenerationOptions::default());
            let second = assign(&s, &everyone(&s), GenerationOptions::default());
            assert_eq!(first, second);
        }
    }
}
