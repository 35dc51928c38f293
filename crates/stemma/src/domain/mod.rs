//! Domain types for family records.
//!
//! [`PersonRow`] is the loosely typed shape of one spreadsheet row as it
//! arrives from an export. [`PersonRecord`] is the cleaned, immutable record
//! the store hands out after loading.

use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Cell values that spreadsheet exports write for empty cells.
const NULL_ARTIFACTS: &[&str] = &["", "nan", "NaN", "NaT", "None", "null"];

/// Unique identifier for a person.
///
/// Ordering is lexicographic on the underlying string. Union identifiers and
/// deterministic iteration both rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonId(String);

impl PersonId {
    /// Create a new person ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for PersonId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PersonId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One row of person data as exported from a spreadsheet.
///
/// Every column is optional at this stage; the store decides what a usable
/// record is. Numeric cells are accepted wherever text is expected, so an
/// `id` of `12` and `"12"` are the same person, and float artifacts such as
/// `12.0` are read as `12`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PersonRow {
    /// Person identifier. Rows without one are skipped.
    #[serde(default, deserialize_with = "cell")]
    pub id: Option<String>,

    /// Given name, or the full name when no middle name column exists.
    #[serde(default, deserialize_with = "cell")]
    pub name: Option<String>,

    /// Appended to `name` in the display name.
    #[serde(default, deserialize_with = "cell")]
    pub middle_name: Option<String>,

    /// Free-form birth date.
    #[serde(default, alias = "birth_date", deserialize_with = "cell")]
    pub birthday: Option<String>,

    /// Free-form birth place.
    #[serde(default, deserialize_with = "cell")]
    pub birth_place: Option<String>,

    /// Living/death marker: `L` for living, a date, or any other text for
    /// deceased without a known date.
    #[serde(default, deserialize_with = "cell")]
    pub died: Option<String>,

    /// Free-form death date.
    #[serde(
        default,
        alias = "death_date",
        alias = "death",
        deserialize_with = "cell"
    )]
    pub date_of_death: Option<String>,

    /// Free-form marriage date.
    #[serde(default, alias = "marriage", deserialize_with = "cell")]
    pub marriage_date: Option<String>,

    /// Spouse reference.
    #[serde(default, deserialize_with = "cell")]
    pub spouse_id: Option<String>,

    /// Father reference.
    #[serde(default, deserialize_with = "cell")]
    pub father_id: Option<String>,

    /// Mother reference.
    #[serde(default, deserialize_with = "cell")]
    pub mother_id: Option<String>,
}

impl PersonRow {
    /// Row with only an ID set, handy for building tables in code.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }
}

/// Deserializes a spreadsheet cell into trimmed text, mapping null artifacts
/// to `None`.
fn cell<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(cell_text))
}

fn cell_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(s),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Trims the text and drops it when it is a null artifact.
#[must_use]
pub fn clean_text(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if NULL_ARTIFACTS.contains(&trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn number_text(n: &serde_json::Number) -> String {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64())
        && f.is_finite()
        && f.fract() == 0.0
    {
        return format!("{f:.0}");
    }
    n.to_string()
}

/// An immutable person record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRecord {
    /// Unique identifier
    pub id: PersonId,

    /// Display name (`name` and `middle_name` joined), if any
    pub name: Option<String>,

    /// Birth date text
    pub birth: Option<String>,

    /// Birth place text
    pub birth_place: Option<String>,

    /// Death date text
    pub death: Option<String>,

    /// Marriage date text
    pub marriage: Option<String>,

    /// Father reference; may be dangling
    pub father: Option<PersonId>,

    /// Mother reference; may be dangling
    pub mother: Option<PersonId>,

    /// Spouse reference; need not be reciprocal
    pub spouse: Option<PersonId>,

    /// `Some(true)` living, `Some(false)` deceased, `None` unknown
    pub living: Option<bool>,
}

impl PersonRecord {
    /// Bare record with no names, dates or relations.
    pub fn new(id: impl Into<PersonId>) -> Self {
        Self {
            id: id.into(),
            name: None,
            birth: None,
            birth_place: None,
            death: None,
            marriage: None,
            father: None,
            mother: None,
            spouse: None,
            living: None,
        }
    }

    /// Declared parent references, father first. Unresolved references
    /// are included; callers check them against the store.
    pub fn parent_refs(&self) -> impl Iterator<Item = &PersonId> {
        self.father.iter().chain(self.mother.iter())
    }

    /// Name for display, with the `Unknown (<id>)` fallback.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Unknown ({})", self.id))
    }

    /// Text lines for a person box: name, birth, marriage, then death.
    ///
    /// A deceased person without a death date gets a bare `deceased` line.
    #[must_use]
    pub fn label_lines(&self) -> Vec<String> {
        let mut lines = vec![self.display_name()];
        if let Some(birth) = &self.birth {
            lines.push(format!("b. {birth}"));
        }
        if let Some(marriage) = &self.marriage {
            lines.push(format!("m. {marriage}"));
        }
        match (&self.death, self.living) {
            (Some(death), _) => lines.push(format!("d. {death}")),
            (None, Some(false)) => lines.push("deceased".to_string()),
            _ => {}
        }
        lines
    }
}
