//! User profile documents from the external directory.

use serde::{Deserialize, Serialize};

use crate::types::ProfileId;

/// Avatar assigned to freshly created accounts.
pub const DEFAULT_AVATAR_URL: &str = "https://i.pravatar.cc/300";

/// One profile document, keyed by the identity provider's opaque id.
///
/// New accounts are created with empty role and contact fields; an
/// administrator assigns the role later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub given_name: String,
    pub family_name: String,
    pub email: String,
    /// One of the editorial roles, or empty while unassigned.
    pub role: String,
    pub phone_number: String,
    pub gender: String,
    pub avatar_url: String,
}

impl Profile {
    /// A profile document with empty role/contact fields and the default
    /// avatar, as seeded at account creation.
    pub fn new_account(id: ProfileId, given_name: &str, family_name: &str, email: &str) -> Self {
        Profile {
            id,
            given_name: given_name.to_string(),
            family_name: family_name.to_string(),
            email: email.to_string(),
            role: String::new(),
            phone_number: String::new(),
            gender: String::new(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
        }
    }

    /// The profile's display name, space-joined.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.given_name, self.family_name)
    }
}

/// Resolve the display name for a profile id against a loaded profile list.
///
/// Returns `None` when the id is absent; callers must treat that as an
/// error rather than fabricating a placeholder name.
pub fn display_name_for(profiles: &[Profile], id: &str) -> Option<String> {
    profiles
        .iter()
        .find(|p| p.id == id)
        .map(Profile::display_name)
}
