//! Case-insensitive person lookup by name.

use crate::domain::PersonId;
use crate::store::PersonStore;
use serde::Serialize;

/// People whose display name matches a query, in store order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NameMatches {
    /// Names equal to the query, ignoring case
    pub exact: Vec<PersonId>,
    /// Names containing the query but not equal to it
    pub partial: Vec<PersonId>,
}

impl NameMatches {
    /// The tier a lookup should pick from: exact matches when there are
    /// any, otherwise substring matches.
    #[must_use]
    pub fn best_tier(&self) -> &[PersonId] {
        if self.exact.is_empty() {
            &self.partial
        } else {
            &self.exact
        }
    }

    /// Returns `true` when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exact.is_empty() && self.partial.is_empty()
    }
}

/// Matches `query` against every named person.
///
/// People without a name never match; their `Unknown (<id>)` fallback is
/// not searchable. A blank query matches nobody.
#[must_use]
pub fn match_name(store: &PersonStore, query: &str) -> NameMatches {
    let needle = query.trim().to_lowercase();
    let mut matches = NameMatches::default();
    if needle.is_empty() {
        return matches;
    }

    for record in store.iter() {
        let Some(name) = &record.name else {
            continue;
        };
        let name = name.to_lowercase();
        if name == needle {
            matches.exact.push(record.id.clone());
        } else if name.contains(&needle) {
            matches.partial.push(record.id.clone());
        }
    }
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PersonRow;
    use rstest::rstest;

    fn named_store(people: &[(&str, &str)]) -> PersonStore {
        let rows = people.iter().map(|&(id, name)| PersonRow {
            name: Some(name.to_string()),
            ..PersonRow::with_id(id)
        });
        PersonStore::load(rows).0
    }

    fn ids(list: &[PersonId]) -> Vec<&str> {
        list.iter().map(PersonId::as_str).collect()
    }

    #[rstest]
    #[case::exact_ignores_case("ANNA SMITH", vec!["1"], vec![])]
    #[case::substring("smith", vec![], vec!["1", "3"])]
    #[case::exact_and_partial("anna", vec!["2"], vec!["1"])]
    #[case::surrounding_whitespace("  anna  ", vec!["2"], vec!["1"])]
    #[case::no_match("zed", vec![], vec![])]
    #[case::blank("   ", vec![], vec![])]
    fn tiers(#[case] query: &str, #[case] exact: Vec<&str>, #[case] partial: Vec<&str>) {
        let store = named_store(&[("1", "Anna Smith"), ("2", "Anna"), ("3", "Bo Smith")]);
        let matches = match_name(&store, query);

        assert_eq!(ids(&matches.exact), exact);
        assert_eq!(ids(&matches.partial), partial);
    }

    #[test]
    fn best_tier_prefers_exact() {
        let store = named_store(&[("1", "Anna Smith"), ("2", "Anna")]);
        assert_eq!(ids(match_name(&store, "anna").best_tier()), vec!["2"]);
        assert_eq!(ids(match_name(&store, "smi").best_tier()), vec!["1"]);
    }

    #[test]
    fn unnamed_people_are_not_searchable() {
        let (store, _) = PersonStore::load(vec![PersonRow::with_id("7")]);
        assert!(match_name(&store, "unknown").is_empty());
    }
}
