//! In-memory person store.
//!
//! The store is built once from a table of [`PersonRow`]s and is read-only
//! afterwards. Records live in a `Vec` in input order; lookups go through an
//! ID index, and a parent→children index is derived at load time so that
//! descendant walks never scan the whole table.
//!
//! Loading never fails. Rows that cannot become records, and relationships
//! that do not resolve, are reported as [`LoadWarning`]s next to the store.

mod diagnostics;
mod jsonl;

pub(crate) use diagnostics::cyclic_components;
pub use diagnostics::Relation;
pub use jsonl::load_from_jsonl;

use crate::domain::{clean_text, PersonId, PersonRecord, PersonRow};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

/// Timestamp suffixes that spreadsheet date cells pick up on export.
const TIME_ARTIFACTS: &[&str] = &[" 00:00:00", "T00:00:00"];

/// A non-fatal data quality finding from loading.
///
/// Each variant states its effect on the loaded store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoadWarning {
    /// A line of the data file could not be parsed. No record was created.
    MalformedRow {
        /// 1-based line in the data file
        line_number: usize,
        /// Parser message
        error: String,
    },

    /// A row had no usable `id`. The row was skipped.
    MissingId {
        /// 1-based position of the row in the input table
        row: usize,
    },

    /// A later row reused an ID. The first row wins; this one was skipped.
    DuplicateId {
        /// The repeated ID
        id: PersonId,
        /// 1-based position of the skipped row
        row: usize,
    },

    /// A date cell held no recognizable date. The date is stored as absent.
    MalformedDate {
        /// Person the date belongs to
        id: PersonId,
        /// Column name
        field: &'static str,
        /// Raw cell text
        value: String,
    },

    /// A relation points at an ID that is not in the store. Traversals treat
    /// the relation as absent.
    DanglingReference {
        /// Person holding the reference
        id: PersonId,
        /// Which relation
        relation: Relation,
        /// The unresolved target
        target: PersonId,
    },

    /// A person named themself as a relation. The reference was dropped.
    SelfReference {
        /// The person
        id: PersonId,
        /// Which relation
        relation: Relation,
    },

    /// A spouse reference is not returned by the spouse. Both people still
    /// form one union when included together.
    NonReciprocalSpouse {
        /// Person holding the reference
        id: PersonId,
        /// The referenced spouse
        spouse: PersonId,
        /// Whom the spouse points at instead, if anyone
        spouse_of_spouse: Option<PersonId>,
    },

    /// These people are (transitively) their own ancestors. They receive
    /// generation 0 when assigned.
    AncestryCycle {
        /// Members of the cycle, sorted
        members: Vec<PersonId>,
    },
}

impl LoadWarning {
    /// Stable identifier for grouping and filtering.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedRow { .. } => "malformed_row",
            Self::MissingId { .. } => "missing_id",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::MalformedDate { .. } => "malformed_date",
            Self::DanglingReference { .. } => "dangling_reference",
            Self::SelfReference { .. } => "self_reference",
            Self::NonReciprocalSpouse { .. } => "non_reciprocal_spouse",
            Self::AncestryCycle { .. } => "ancestry_cycle",
        }
    }
}

impl fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRow { line_number, error } => {
                write!(f, "line {line_number}: malformed row skipped: {error}")
            }
            Self::MissingId { row } => write!(f, "row {row}: no id, row skipped"),
            Self::DuplicateId { id, row } => {
                write!(f, "row {row}: duplicate id {id}, first row kept")
            }
            Self::MalformedDate { id, field, value } => {
                write!(f, "{id}: unrecognized {field} '{value}' ignored")
            }
            Self::DanglingReference {
                id,
                relation,
                target,
            } => write!(f, "{id}: {relation} {target} does not exist"),
            Self::SelfReference { id, relation } => {
                write!(f, "{id}: listed as own {relation}, reference dropped")
            }
            Self::NonReciprocalSpouse {
                id,
                spouse,
                spouse_of_spouse,
            } => match spouse_of_spouse {
                Some(other) => write!(f, "{id}: spouse {spouse} lists {other} as spouse"),
                None => write!(f, "{id}: spouse {spouse} lists no spouse"),
            },
            Self::AncestryCycle { members } => {
                let ids: Vec<&str> = members.iter().map(PersonId::as_str).collect();
                write!(f, "ancestry cycle among {}", ids.join(", "))
            }
        }
    }
}

/// Read-only person store.
#[derive(Debug, Default)]
pub struct PersonStore {
    /// Records in input order
    records: Vec<PersonRecord>,

    /// ID → position in `records`
    index: HashMap<PersonId, usize>,

    /// ID → display name
    names: HashMap<PersonId, String>,

    /// Resolvable parent → children, in store order
    children: HashMap<PersonId, Vec<PersonId>>,
}

impl PersonStore {
    /// Builds a store from raw rows.
    ///
    /// Returns every data quality finding alongside the store; none of them
    /// prevent loading.
    pub fn load<I>(rows: I) -> (Self, Vec<LoadWarning>)
    where
        I: IntoIterator<Item = PersonRow>,
    {
        let mut warnings = Vec::new();
        let records: Vec<(usize, PersonRecord)> = rows
            .into_iter()
            .enumerate()
            .filter_map(|(i, row)| {
                let position = i + 1;
                record_from_row(position, row, &mut warnings).map(|r| (position, r))
            })
            .collect();

        let (store, mut more) = Self::from_positioned(records);
        warnings.append(&mut more);
        (store, warnings)
    }

    /// Builds a store from already cleaned records.
    ///
    /// Relationship diagnostics still run; duplicate IDs keep the first
    /// record.
    #[cfg(test)]
    pub(crate) fn from_records<I>(records: I) -> (Self, Vec<LoadWarning>)
    where
        I: IntoIterator<Item = PersonRecord>,
    {
        Self::from_positioned(records.into_iter().enumerate().map(|(i, r)| (i + 1, r)))
    }

    fn from_positioned<I>(records: I) -> (Self, Vec<LoadWarning>)
    where
        I: IntoIterator<Item = (usize, PersonRecord)>,
    {
        let mut warnings = Vec::new();
        let mut store = Self::default();

        for (row, record) in records {
            if store.index.contains_key(&record.id) {
                warnings.push(LoadWarning::DuplicateId {
                    id: record.id,
                    row,
                });
                continue;
            }
            store.index.insert(record.id.clone(), store.records.len());
            store
                .names
                .insert(record.id.clone(), record.display_name());
            store.records.push(record);
        }

        let mut links: Vec<(PersonId, PersonId)> = Vec::new();
        for record in &store.records {
            let mut parents: Vec<&PersonId> = store.resolved_parents(record).collect();
            parents.dedup();
            links.extend(parents.into_iter().map(|p| (p.clone(), record.id.clone())));
        }
        for (parent, child) in links {
            store.children.entry(parent).or_default().push(child);
        }

        warnings.extend(diagnostics::diagnose(&store));
        info!(
            people = store.records.len(),
            warnings = warnings.len(),
            "Loaded person store"
        );
        (store, warnings)
    }

    /// Looks up a person.
    #[must_use]
    pub fn get(&self, id: &PersonId) -> Option<&PersonRecord> {
        self.index.get(id).map(|&i| &self.records[i])
    }

    /// Returns `true` if the ID resolves to a record.
    #[must_use]
    pub fn contains(&self, id: &PersonId) -> bool {
        self.index.contains_key(id)
    }

    /// All records in store order.
    #[must_use]
    pub fn all(&self) -> &[PersonRecord] {
        &self.records
    }

    /// Iterates records in store order.
    pub fn iter(&self) -> impl Iterator<Item = &PersonRecord> {
        self.records.iter()
    }

    /// Number of people.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` for an empty store.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Display name for an ID. Unknown IDs and unnamed people render as
    /// `Unknown (<id>)`.
    #[must_use]
    pub fn name_of(&self, id: &PersonId) -> String {
        self.names
            .get(id)
            .cloned()
            .unwrap_or_else(|| format!("Unknown ({id})"))
    }

    /// Father then mother, skipping references that do not resolve.
    pub fn resolved_parents<'a>(
        &'a self,
        record: &'a PersonRecord,
    ) -> impl Iterator<Item = &'a PersonId> + 'a {
        record.parent_refs().filter(|id| self.contains(id))
    }

    /// Parents of `id` that exist in the store.
    #[must_use]
    pub fn parents_of(&self, id: &PersonId) -> Vec<&PersonId> {
        self.get(id)
            .map(|record| self.resolved_parents(record).collect())
            .unwrap_or_default()
    }

    /// Returns `true` if the person has at least one resolvable parent.
    #[must_use]
    pub fn has_parent(&self, id: &PersonId) -> bool {
        !self.parents_of(id).is_empty()
    }

    /// The person's spouse, if the reference resolves.
    #[must_use]
    pub fn spouse_of(&self, id: &PersonId) -> Option<&PersonId> {
        self.get(id)
            .and_then(|record| record.spouse.as_ref())
            .filter(|spouse| self.contains(spouse))
    }

    /// Children naming `id` as father or mother, in store order.
    #[must_use]
    pub fn children_of(&self, id: &PersonId) -> &[PersonId] {
        self.children.get(id).map_or(&[], Vec::as_slice)
    }
}

/// Turns one row into a record, or `None` when the row has no ID.
fn record_from_row(
    position: usize,
    row: PersonRow,
    warnings: &mut Vec<LoadWarning>,
) -> Option<PersonRecord> {
    let Some(id) = row.id.as_deref().and_then(clean_text) else {
        debug!(row = position, "Skipping row without id");
        warnings.push(LoadWarning::MissingId { row: position });
        return None;
    };
    let id = PersonId::from(id);

    let mut date = |field: &'static str, value: Option<String>| {
        let value = value?;
        let parsed = normalize_date(&value);
        if parsed.is_none() {
            warnings.push(LoadWarning::MalformedDate {
                id: id.clone(),
                field,
                value,
            });
        }
        parsed
    };

    let birth = date("birthday", row.birthday);
    let marriage = date("marriage_date", row.marriage_date);
    let explicit_death = date("date_of_death", row.date_of_death);

    let (death, living) = match (explicit_death, row.died) {
        (Some(death), _) => (Some(death), Some(false)),
        (None, Some(marker)) if marker.eq_ignore_ascii_case("l") => (None, Some(true)),
        (None, Some(marker)) if marker.chars().any(|c| c.is_ascii_digit()) => {
            (date("died", Some(marker)), Some(false))
        }
        (None, Some(_)) => (None, Some(false)),
        (None, None) => (None, None),
    };

    let name = match (row.name, row.middle_name) {
        (Some(name), Some(middle)) => Some(format!("{name} {middle}")),
        (name, middle) => name.or(middle),
    };

    let mut relation = |relation: Relation, value: Option<String>| {
        let target = PersonId::from(value?);
        if target == id {
            warnings.push(LoadWarning::SelfReference {
                id: id.clone(),
                relation,
            });
            return None;
        }
        Some(target)
    };
    let father = relation(Relation::Father, row.father_id);
    let mother = relation(Relation::Mother, row.mother_id);
    let spouse = relation(Relation::Spouse, row.spouse_id);

    Some(PersonRecord {
        id,
        name,
        birth,
        birth_place: row.birth_place,
        death,
        marriage,
        father,
        mother,
        spouse,
        living,
    })
}

/// Accepts free-form date text that contains at least one digit.
///
/// Spreadsheet timestamp suffixes are removed. Text with no digit at all
/// (`"unknown"`, `"?"`) is not a date.
fn normalize_date(text: &str) -> Option<String> {
    let mut text = text.trim();
    for suffix in TIME_ARTIFACTS {
        if let Some(stripped) = text.strip_suffix(suffix) {
            text = stripped;
        }
    }
    text.chars()
        .any(|c| c.is_ascii_digit())
        .then(|| text.to_string())
}
