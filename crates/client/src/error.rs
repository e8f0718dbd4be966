//! Error types for the client library.

use biograph_core::types::ProfileId;

/// Failure talking to the entry/comment store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The request never produced a decodable response.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with an error envelope.
    #[error("API error ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    /// The response body did not match the expected envelope.
    #[error("Unexpected response shape: {0}")]
    Decode(String),
}

/// Failure against the profile document store.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("Profile not found: {0}")]
    NotFound(ProfileId),

    #[error("Directory error: {0}")]
    Internal(String),
}

/// Failure against the identity provider's auth primitives.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// Wrong email/password combination.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// An account already exists for the email.
    #[error("An account already exists for {0}")]
    EmailTaken(String),

    /// The provider wants a fresh sign-in before a sensitive change.
    #[error("Recent login required")]
    RequiresRecentLogin,

    #[error("Identity provider error: {0}")]
    Internal(String),
}

/// Failure of a workspace operation.
///
/// The precondition variants reject an action before any store call is
/// made; `Store` wraps a call that reached the server and failed.
#[derive(Debug, thiserror::Error)]
pub enum WorkspaceError {
    /// Assign/unassign was requested with nothing selected.
    #[error("No entries selected")]
    NoSelection,

    /// The acting user's name cannot be resolved before the profile list
    /// has loaded.
    #[error("User directory has not loaded yet")]
    ProfilesNotLoaded,

    /// The acting user has no profile document in the loaded directory.
    #[error("No profile found for acting user {0}")]
    UnknownActor(ProfileId),

    /// A comment was submitted without an entry selected.
    #[error("No entry selected for commenting")]
    NoCommentTarget,

    /// The draft comment failed validation (e.g. empty body).
    #[error("{0}")]
    InvalidComment(String),

    /// The status value is not part of the review vocabulary.
    #[error("{0}")]
    InvalidStatus(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}
