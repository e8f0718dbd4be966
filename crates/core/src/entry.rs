//! Biographical entry domain type.

use serde::{Deserialize, Serialize};

use crate::types::DbId;

/// One biographical record under editorial review.
///
/// `assigned_to` (display name) and `assigned_id` (profile id) are always
/// set or cleared together; only the assign/unassign operations touch them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: DbId,
    pub given_names: String,
    pub family_name: String,
    /// Birth year or free-form text (e.g. "c. 1850").
    pub birth: Option<String>,
    /// Death year or free-form text.
    pub death: Option<String>,
    pub short_description: Option<String>,
    /// Link to the published page for this entry.
    pub link: Option<String>,
    /// One of the four review statuses; `None` means "Not Indicated".
    pub status: Option<String>,
    pub assigned_to: Option<String>,
    pub assigned_id: Option<String>,
}

impl Entry {
    /// The entry's full display name, space-joined.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.given_names, self.family_name)
    }
}
