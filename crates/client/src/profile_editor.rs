//! Profile read/edit flow.
//!
//! Editing is gated behind a fresh password check. Saving validates the
//! email confirmation, pushes an email change to the identity provider
//! when the address changed, then writes the document fields.

use std::sync::Arc;

use biograph_core::profile::Profile;

use crate::error::{DirectoryError, IdentityError};
use crate::profiles::{IdentityStore, ProfileStore, ProfileUpdate};
use crate::session::Session;

/// An in-progress profile edit: the document fields plus the typed email
/// confirmation.
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub profile: Profile,
    pub confirm_email: String,
}

/// Failure of the profile edit flow.
#[derive(Debug, thiserror::Error)]
pub enum EditError {
    /// The password check before editing failed.
    #[error("Incorrect password")]
    IncorrectPassword,

    /// Email and confirmation email differ.
    #[error("Emails do not match")]
    EmailMismatch,

    /// The provider wants a fresh sign-in before changing the email; the
    /// caller should send the user back to the login screen.
    #[error("Re-login required to change email")]
    ReloginRequired,

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Read/edit operations over the signed-in user's own profile document.
pub struct ProfileEditor {
    identity: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl ProfileEditor {
    pub fn new(identity: Arc<dyn IdentityStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        ProfileEditor { identity, profiles }
    }

    /// Fetch the session's profile document, creating an empty one if the
    /// account has none yet.
    pub async fn load(&self, session: &Session) -> Result<Profile, DirectoryError> {
        match self.profiles.get_profile(&session.user_id).await {
            Ok(profile) => Ok(profile),
            Err(DirectoryError::NotFound(_)) => {
                let profile =
                    Profile::new_account(session.user_id.clone(), "", "", &session.email);
                self.profiles.create_profile(&profile).await?;
                tracing::info!(user_id = %session.user_id, "created missing profile document");
                Ok(profile)
            }
            Err(err) => Err(err),
        }
    }

    /// Re-authenticate and open an edit draft.
    pub async fn begin_edit(
        &self,
        session: &Session,
        password: &str,
    ) -> Result<ProfileDraft, EditError> {
        self.identity
            .sign_in(&session.email, password)
            .await
            .map_err(|err| match err {
                IdentityError::InvalidCredentials => EditError::IncorrectPassword,
                other => EditError::Identity(other),
            })?;

        let profile = self.load(session).await?;
        Ok(ProfileDraft {
            confirm_email: profile.email.clone(),
            profile,
        })
    }

    /// Persist an edit draft.
    ///
    /// The email and its confirmation must match; a changed email goes to
    /// the identity provider first, and only then are the document fields
    /// written.
    pub async fn save(
        &self,
        session: &Session,
        draft: &ProfileDraft,
    ) -> Result<Profile, EditError> {
        if draft.profile.email != draft.confirm_email {
            return Err(EditError::EmailMismatch);
        }

        if draft.profile.email != session.email {
            self.identity
                .update_email(session, &draft.profile.email)
                .await
                .map_err(|err| match err {
                    IdentityError::RequiresRecentLogin => EditError::ReloginRequired,
                    other => EditError::Identity(other),
                })?;
        }

        let update = ProfileUpdate {
            given_name: Some(draft.profile.given_name.clone()),
            family_name: Some(draft.profile.family_name.clone()),
            email: Some(draft.profile.email.clone()),
            role: None,
            phone_number: Some(draft.profile.phone_number.clone()),
            gender: Some(draft.profile.gender.clone()),
            avatar_url: Some(draft.profile.avatar_url.clone()),
        };
        let saved = self
            .profiles
            .update_profile(&session.user_id, &update)
            .await?;

        tracing::info!(user_id = %session.user_id, "profile updated");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use crate::profiles::InMemoryDirectory;

    fn directory_with_jane() -> Arc<InMemoryDirectory> {
        let directory = InMemoryDirectory::new();
        directory.add_user(
            "hunter2",
            Profile::new_account("u-1".into(), "Jane", "Smith", "jane@example.org"),
        );
        Arc::new(directory)
    }

    fn jane_session() -> Session {
        Session {
            user_id: "u-1".into(),
            email: "jane@example.org".into(),
        }
    }

    fn editor_over(directory: &Arc<InMemoryDirectory>) -> ProfileEditor {
        ProfileEditor::new(directory.clone(), directory.clone())
    }

    #[tokio::test]
    async fn begin_edit_rejects_a_wrong_password() {
        let directory = directory_with_jane();
        let editor = editor_over(&directory);
        assert_matches!(
            editor.begin_edit(&jane_session(), "wrong").await,
            Err(EditError::IncorrectPassword)
        );
    }

    #[tokio::test]
    async fn begin_edit_opens_a_draft_with_confirmation_prefilled() {
        let directory = directory_with_jane();
        let editor = editor_over(&directory);
        let draft = editor.begin_edit(&jane_session(), "hunter2").await.unwrap();
        assert_eq!(draft.profile.display_name(), "Jane Smith");
        assert_eq!(draft.confirm_email, "jane@example.org");
    }

    #[tokio::test]
    async fn save_rejects_mismatched_email_confirmation() {
        let directory = directory_with_jane();
        let editor = editor_over(&directory);
        let mut draft = editor.begin_edit(&jane_session(), "hunter2").await.unwrap();
        draft.profile.email = "new@example.org".into();
        assert_matches!(
            editor.save(&jane_session(), &draft).await,
            Err(EditError::EmailMismatch)
        );
    }

    #[tokio::test]
    async fn save_writes_document_fields() {
        let directory = directory_with_jane();
        let editor = editor_over(&directory);
        let mut draft = editor.begin_edit(&jane_session(), "hunter2").await.unwrap();
        draft.profile.phone_number = "0400 000 000".into();

        let saved = editor.save(&jane_session(), &draft).await.unwrap();
        assert_eq!(saved.phone_number, "0400 000 000");

        let reloaded = editor.load(&jane_session()).await.unwrap();
        assert_eq!(reloaded.phone_number, "0400 000 000");
    }

    #[tokio::test]
    async fn stale_session_email_change_demands_relogin() {
        let directory = directory_with_jane();
        let editor = editor_over(&directory);
        let mut draft = editor.begin_edit(&jane_session(), "hunter2").await.unwrap();
        draft.profile.email = "fresh@example.org".into();
        draft.confirm_email = "fresh@example.org".into();

        directory.set_require_recent_login(true);
        assert_matches!(
            editor.save(&jane_session(), &draft).await,
            Err(EditError::ReloginRequired)
        );
    }

    #[tokio::test]
    async fn load_creates_a_missing_document() {
        let directory = Arc::new(InMemoryDirectory::new());
        let editor = editor_over(&directory);
        let session = Session {
            user_id: "u-7".into(),
            email: "late@example.org".into(),
        };

        let profile = editor.load(&session).await.unwrap();
        assert_eq!(profile.email, "late@example.org");
        assert_eq!(profile.given_name, "");

        // Second load finds the document it just created.
        let again = editor.load(&session).await.unwrap();
        assert_eq!(again, profile);
    }
}
