//! Entry DTOs.

use serde::Deserialize;

use biograph_core::types::DbId;

/// DTO for inserting a new biographical entry.
#[derive(Debug, Deserialize)]
pub struct CreateEntry {
    pub given_names: String,
    pub family_name: String,
    pub birth: Option<String>,
    pub death: Option<String>,
    pub short_description: Option<String>,
    pub link: Option<String>,
    pub status: Option<String>,
}

/// DTO for the batch assignment operation.
///
/// Both assignment fields are written together; the repository never sets
/// one without the other.
#[derive(Debug, Deserialize)]
pub struct AssignEntries {
    /// Profile id of the editor taking the entries.
    pub assigned_id: String,
    /// Display name of the editor taking the entries.
    pub assigned_to: String,
    pub entry_ids: Vec<DbId>,
}

/// DTO for the batch unassignment operation.
#[derive(Debug, Deserialize)]
pub struct UnassignEntries {
    pub entry_ids: Vec<DbId>,
}

/// DTO for a single-entry status change.
#[derive(Debug, Deserialize)]
pub struct UpdateEntryStatus {
    pub status: String,
}
