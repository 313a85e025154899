//! Text relevance matching over a bounded candidate set.
//!
//! The record store has no native full-text search, so free-text queries
//! are answered by substring matching over a candidate window fetched
//! with the exact-match predicates. This is deliberately substring and
//! prefix matching, not tokenized ranking: the catalog is small and the
//! simple behavior is predictable for its users.

use ahash::AHashSet;

use crate::model::Resource;

/// Narrow candidates to those whose searchable surface contains `term`,
/// case-insensitively.
///
/// Ordering: resources whose title starts with the term come first, then
/// the remaining matches; within each group the incoming order (the
/// store's sort) is preserved.
pub fn narrow(term: &str, candidates: Vec<Resource>) -> Vec<Resource> {
    let term = term.to_lowercase();
    if term.is_empty() {
        return candidates;
    }

    let mut prefix_hits = Vec::new();
    let mut other_hits = Vec::new();

    for resource in candidates {
        if resource.title.to_lowercase().starts_with(&term) {
            prefix_hits.push(resource);
        } else if surface(&resource).contains(&term) {
            other_hits.push(resource);
        }
    }

    prefix_hits.extend(other_hits);
    prefix_hits
}

/// Autocomplete lookup: up to `limit` distinct titles and subject codes
/// matching the partial term, title-prefix matches first.
pub fn suggest(term: &str, candidates: &[Resource], limit: usize) -> Vec<String> {
    let term = term.to_lowercase();
    if term.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut seen: AHashSet<String> = AHashSet::default();
    let mut prefix_hits = Vec::new();
    let mut other_hits = Vec::new();

    let mut consider = |value: &str, prefix_hits: &mut Vec<String>, other_hits: &mut Vec<String>| {
        let lowered = value.to_lowercase();
        if !seen.insert(lowered.clone()) {
            return;
        }
        if lowered.starts_with(&term) {
            prefix_hits.push(value.to_string());
        } else if lowered.contains(&term) {
            other_hits.push(value.to_string());
        }
    };

    for resource in candidates {
        consider(&resource.title, &mut prefix_hits, &mut other_hits);
        consider(&resource.subject_code, &mut prefix_hits, &mut other_hits);
    }

    prefix_hits.extend(other_hits);
    prefix_hits.truncate(limit);
    prefix_hits
}

/// The searchable surface of a resource: title, description, subject
/// code and tags, concatenated and lower-cased.
fn surface(resource: &Resource) -> String {
    let mut surface = String::with_capacity(
        resource.title.len()
            + resource.description.len()
            + resource.subject_code.len()
            + resource.tags.iter().map(|t| t.len() + 1).sum::<usize>()
            + 3,
    );
    surface.push_str(&resource.title);
    surface.push(' ');
    surface.push_str(&resource.description);
    surface.push(' ');
    surface.push_str(&resource.subject_code);
    for tag in &resource.tags {
        surface.push(' ');
        surface.push_str(tag);
    }
    surface.to_lowercase()
}
