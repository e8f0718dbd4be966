//! Explicit session values.
//!
//! A [`Session`] is handed to the workspace and the profile screens at
//! construction time; nothing in this crate reads ambient authentication
//! state.

use biograph_core::types::ProfileId;

/// An authenticated session issued by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// The signed-in user's opaque profile id.
    pub user_id: ProfileId,
    /// The email the session was established with.
    pub email: String,
}
