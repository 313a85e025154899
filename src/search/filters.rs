//! Filter normalization: from the loosely-typed caller filter object to
//! a canonical query plan.

use serde::{Deserialize, Deserializer, Serialize};

use crate::model::{DocumentType, FileType, Unit};
use crate::store::Predicate;

/// Caller-supplied query shape. Every field is optional; an absent field
/// means "no constraint", never "match empty string". `year`, `semester`
/// and `unit` accept either JSON numbers or strings, matching the
/// loosely-typed form data the web client sends.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub query: Option<String>,
    pub regulation: Option<String>,
    pub branch: Option<String>,
    pub subject: Option<String>,
    #[serde(deserialize_with = "stringish")]
    pub unit: Option<String>,
    pub document_type: Option<String>,
    pub file_type: Option<String>,
    #[serde(deserialize_with = "stringish")]
    pub year: Option<String>,
    #[serde(deserialize_with = "stringish")]
    pub semester: Option<String>,
}

/// Accept a JSON string or number, normalizing to a string.
fn stringish<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

/// The canonical query plan: one exact-match predicate per populated
/// non-text field, plus an optional trimmed, lower-cased free-text term.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterPlan {
    pub predicates: Vec<Predicate>,
    pub term: Option<String>,
}

impl FilterPlan {
    /// Stable fingerprint of this plan, used to detect filter changes in
    /// the client-side accumulator and to key caches.
    pub fn cache_key(&self) -> String {
        let mut parts: Vec<String> = self
            .predicates
            .iter()
            .map(|p| format!("{}={:?}", p.field().name(), p))
            .collect();
        parts.sort_unstable();
        if let Some(term) = &self.term {
            parts.push(format!("q={}", term));
        }
        parts.join("&")
    }
}

/// Normalize a filter object into a [`FilterPlan`].
///
/// Policy (never errors):
/// - empty string and absent are identical — the field is unset;
/// - numeric fields are parsed from strings, non-numeric input is
///   dropped;
/// - enum-valued fields with unrecognized values are dropped;
/// - the free-text term is trimmed and lower-cased, and dropped when
///   shorter than `min_term_len` (the rest of the plan survives).
pub fn normalize(filters: &SearchFilters, min_term_len: usize) -> FilterPlan {
    let mut predicates = Vec::new();

    if let Some(branch) = cleaned(&filters.branch) {
        predicates.push(Predicate::Branch(branch));
    }
    if let Some(regulation) = cleaned(&filters.regulation) {
        predicates.push(Predicate::Regulation(regulation));
    }
    if let Some(subject) = cleaned(&filters.subject) {
        predicates.push(Predicate::Subject(subject));
    }
    if let Some(raw) = cleaned(&filters.unit) {
        match raw.parse::<Unit>() {
            Ok(unit) => predicates.push(Predicate::Unit(unit)),
            Err(_) => tracing::debug!("Dropping unparsable unit filter {:?}", raw),
        }
    }
    if let Some(raw) = cleaned(&filters.document_type) {
        match raw.parse::<DocumentType>() {
            Ok(dt) => predicates.push(Predicate::DocumentType(dt)),
            Err(_) => tracing::debug!("Dropping unknown document type filter {:?}", raw),
        }
    }
    if let Some(raw) = cleaned(&filters.file_type) {
        match raw.parse::<FileType>() {
            Ok(ft) => predicates.push(Predicate::FileType(ft)),
            Err(_) => tracing::debug!("Dropping unknown file type filter {:?}", raw),
        }
    }
    if let Some(year) = parse_numeric(&filters.year, "year") {
        predicates.push(Predicate::Year(year));
    }
    if let Some(semester) = parse_numeric(&filters.semester, "semester") {
        predicates.push(Predicate::Semester(semester));
    }

    let term = cleaned(&filters.query).and_then(|q| {
        let lowered = q.to_lowercase();
        if lowered.chars().count() < min_term_len {
            tracing::debug!("Free-text term {:?} below minimum length, ignored", lowered);
            None
        } else {
            Some(lowered)
        }
    });

    FilterPlan { predicates, term }
}

/// Trim a field; empty or absent both mean unset.
fn cleaned(field: &Option<String>) -> Option<String> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn parse_numeric(field: &Option<String>, name: &str) -> Option<u8> {
    let raw = cleaned(field)?;
    match raw.parse::<u8>() {
        Ok(n) => Some(n),
        Err(_) => {
            tracing::debug!("Dropping non-numeric {} filter {:?}", name, raw);
            None
        }
    }
}
