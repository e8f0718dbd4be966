//! Comment DTOs.

use serde::Deserialize;

use biograph_core::types::DbId;

/// DTO for inserting a new comment.
///
/// `posted_at` arrives pre-formatted from the client and is stored
/// verbatim; the server does not re-stamp it.
#[derive(Debug, Deserialize)]
pub struct CreateComment {
    pub entry_id: DbId,
    pub body: String,
    pub commenter: String,
    pub commenter_id: String,
    pub posted_at: String,
}
