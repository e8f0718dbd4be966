//! Workspace filtering predicates.
//!
//! The entries table is filtered entirely in memory: every predicate
//! category is ANDed, a category with no active input is vacuously true,
//! and the source order is preserved (stable filter, no resort). The
//! filtered view is re-derived from scratch whenever any input changes.

use std::collections::HashSet;

use crate::entry::Entry;
use crate::status::matches_status_filter;

/// The active predicate set over the entry collection.
#[derive(Debug, Clone, Default)]
pub struct EntryFilter {
    /// Case-insensitive substring over given, family, or full name.
    pub name_query: String,
    /// Case-insensitive substring over the short description, with
    /// single-quote characters treated as insignificant.
    pub description_query: String,
    /// Selected review statuses; empty means "any".
    pub statuses: HashSet<String>,
    /// Selected editor profile ids; empty means "any".
    pub editors: HashSet<String>,
}

impl EntryFilter {
    /// True when no predicate category is active.
    pub fn is_empty(&self) -> bool {
        self.name_query.trim().is_empty()
            && self.description_query.trim().is_empty()
            && self.statuses.is_empty()
            && self.editors.is_empty()
    }
}

/// Case-insensitive substring match over given name, family name, or the
/// space-joined full name (so a query spanning both parts still matches).
pub fn name_matches(given_names: &str, family_name: &str, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    given_names.to_lowercase().contains(&query)
        || family_name.to_lowercase().contains(&query)
        || format!("{} {}", given_names, family_name)
            .to_lowercase()
            .contains(&query)
}

/// Strip quote punctuation and case before comparing descriptions.
fn normalize_description(text: &str) -> String {
    text.replace('\'', "").trim().to_lowercase()
}

/// Case-insensitive substring match over the short description, ignoring
/// single quotes on both sides. An entry without a description never
/// matches an active query.
pub fn description_matches(description: Option<&str>, query: &str) -> bool {
    let query = normalize_description(query);
    if query.is_empty() {
        return true;
    }
    match description {
        Some(text) => normalize_description(text).contains(&query),
        None => false,
    }
}

/// Whether a single entry satisfies every active predicate category.
pub fn entry_matches(entry: &Entry, filter: &EntryFilter) -> bool {
    if !name_matches(&entry.given_names, &entry.family_name, &filter.name_query) {
        return false;
    }
    if !description_matches(entry.short_description.as_deref(), &filter.description_query) {
        return false;
    }
    if !filter.editors.is_empty() {
        match entry.assigned_id.as_deref() {
            Some(id) if filter.editors.contains(id) => {}
            _ => return false,
        }
    }
    matches_status_filter(entry.status.as_deref(), &filter.statuses)
}

/// The ordered subsequence of entries satisfying the filter.
pub fn filter_entries<'a>(entries: &'a [Entry], filter: &EntryFilter) -> Vec<&'a Entry> {
    entries.iter().filter(|e| entry_matches(e, filter)).collect()
}
