//! Complete-tree mode: everyone, reached family by family.

use super::{Condition, Resolution, Selection};
use crate::domain::PersonId;
use crate::store::PersonStore;
use std::collections::HashSet;
use tracing::{debug, warn};

pub(super) fn root_ancestors(store: &PersonStore) -> Vec<PersonId> {
    let has_parent: HashSet<&PersonId> = store
        .iter()
        .map(|r| &r.id)
        .filter(|id| store.has_parent(id))
        .collect();

    let mut units: HashSet<(PersonId, Option<PersonId>)> = HashSet::new();
    let mut roots = Vec::new();

    for record in store.iter() {
        if has_parent.contains(&record.id) {
            continue;
        }
        if store
            .spouse_of(&record.id)
            .is_some_and(|spouse| has_parent.contains(spouse))
        {
            continue;
        }

        let unit = match &record.spouse {
            Some(spouse) if *spouse < record.id => (spouse.clone(), Some(record.id.clone())),
            Some(spouse) => (record.id.clone(), Some(spouse.clone())),
            None => (record.id.clone(), None),
        };
        if units.insert(unit) {
            roots.push(record.id.clone());
        }
    }
    roots
}

pub(super) fn resolve(store: &PersonStore) -> Resolution {
    let mut conditions = Vec::new();
    let mut roots = root_ancestors(store);

    if roots.is_empty()
        && let Some(first) = store.iter().next()
    {
        warn!(fallback = %first.id, "No root ancestors, starting from first person");
        conditions.push(Condition::NoRootAncestors {
            fallback: first.id.clone(),
        });
        roots.push(first.id.clone());
    }

    let mut processed: HashSet<PersonId> = HashSet::new();
    for root in &roots {
        expand_from(store, root, &mut processed);
    }

    let unconnected: Vec<PersonId> = store
        .iter()
        .filter(|r| !processed.contains(&r.id))
        .map(|r| r.id.clone())
        .collect();
    let selection: Selection = store.iter().map(|r| r.id.clone()).collect();

    debug!(
        people = selection.len(),
        root_ancestors = roots.len(),
        unconnected = unconnected.len(),
        "Resolved complete tree"
    );
    Resolution {
        selection,
        root: None,
        root_ancestors: roots,
        unconnected,
        conditions,
    }
}

/// Depth-first expansion from one root ancestor.
///
/// Expanding a person marks them and their spouse, then visits their
/// children in store order and finally their father and mother. A spouse is
/// marked but not expanded. Each candidate is checked against `processed`
/// when its turn comes, so the reach matches a recursive walk exactly while
/// using an explicit stack.
fn expand_from(store: &PersonStore, root: &PersonId, processed: &mut HashSet<PersonId>) {
    let mut frames: Vec<Vec<&PersonId>> = vec![vec![root]];

    while let Some(frame) = frames.last_mut() {
        let Some(person) = frame.pop() else {
            frames.pop();
            continue;
        };
        if !processed.insert(person.clone()) {
            continue;
        }
        if let Some(spouse) = store.spouse_of(person) {
            processed.insert(spouse.clone());
        }

        let mut next: Vec<&PersonId> = store.children_of(person).iter().collect();
        next.extend(store.parents_of(person));
        next.reverse();
        frames.push(next);
    }
}
