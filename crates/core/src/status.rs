//! Editorial review-status vocabulary and helpers.
//!
//! An entry's status is one of four fixed values; an entry whose status
//! column is NULL or blank is treated as "Not Indicated" everywhere it is
//! displayed, filtered, or counted.

use std::collections::HashSet;

/// The entry needs no further revision.
pub const STATUS_NO_REVISION: &str = "No Revision";

/// The entry needs a minor revision.
pub const STATUS_MINOR_REVISION: &str = "Minor Revision";

/// The entry needs a major revision.
pub const STATUS_MAJOR_REVISION: &str = "Major Revision";

/// No review state has been recorded for the entry.
pub const STATUS_NOT_INDICATED: &str = "Not Indicated";

/// All valid status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_NO_REVISION,
    STATUS_MINOR_REVISION,
    STATUS_MAJOR_REVISION,
    STATUS_NOT_INDICATED,
];

/// Validate that a status string is one of the accepted values.
pub fn validate_status(status: &str) -> Result<(), String> {
    if VALID_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Invalid status '{status}'. Must be one of: {}",
            VALID_STATUSES.join(", ")
        ))
    }
}

/// Collapse a stored status to its meaningful form: NULL and blank strings
/// both mean "no status recorded".
pub fn normalize_status(status: Option<&str>) -> Option<&str> {
    match status {
        Some(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// The label shown for a status, with absent statuses rendered as
/// "Not Indicated".
pub fn status_label(status: Option<&str>) -> &str {
    normalize_status(status).unwrap_or(STATUS_NOT_INDICATED)
}

/// Whether an entry with the given status passes the selected status set.
///
/// An empty selection is vacuously true. An entry with no recorded status
/// matches if and only if "Not Indicated" is among the selected values.
pub fn matches_status_filter(status: Option<&str>, selected: &HashSet<String>) -> bool {
    if selected.is_empty() {
        return true;
    }
    match normalize_status(status) {
        Some(s) => selected.contains(s),
        None => selected.contains(STATUS_NOT_INDICATED),
    }
}

/// Per-status entry tallies for the workspace statistics card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub no_revision: usize,
    pub minor_revision: usize,
    pub major_revision: usize,
    pub not_indicated: usize,
}

/// Tally statuses across a collection of entries.
pub fn count_statuses<'a, I>(statuses: I) -> StatusCounts
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut counts = StatusCounts::default();
    for status in statuses {
        match status_label(status) {
            STATUS_NO_REVISION => counts.no_revision += 1,
            STATUS_MINOR_REVISION => counts.minor_revision += 1,
            STATUS_MAJOR_REVISION => counts.major_revision += 1,
            _ => counts.not_indicated += 1,
        }
    }
    counts
}
