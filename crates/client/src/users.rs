//! User management (Head Director only).
//!
//! Thin glue over the identity/profile stores: list accounts, create an
//! account with its seed profile document, change roles, and remove
//! profile documents. Removing a document does not delete the underlying
//! auth account; that remains a manual provider-console step, and the
//! deletion result says so.

use std::sync::Arc;

use biograph_core::profile::Profile;
use biograph_core::roles::{can_manage_users, validate_role};

use crate::error::{DirectoryError, IdentityError};
use crate::profiles::{IdentityStore, ProfileStore, ProfileUpdate};

/// Returned from [`UserAdmin::delete_user`] so the caller can surface the
/// manual-deletion reminder.
pub const ACCOUNT_DELETION_NOTICE: &str =
    "Profile document removed. For complete deletion, remove the auth account \
     in the identity provider console.";

/// Input for creating a new user account.
#[derive(Debug, Clone)]
pub struct NewUserAccount {
    pub email: String,
    pub password: String,
    pub given_name: String,
    pub family_name: String,
}

/// Failure of a user-management operation.
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    /// The acting user is not a Head Director.
    #[error("User management requires the Head Director role")]
    Forbidden,

    /// The requested role is not in the role vocabulary.
    #[error("{0}")]
    InvalidRole(String),

    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Administrative operations over the user directory.
pub struct UserAdmin {
    identity: Arc<dyn IdentityStore>,
    profiles: Arc<dyn ProfileStore>,
}

impl UserAdmin {
    pub fn new(identity: Arc<dyn IdentityStore>, profiles: Arc<dyn ProfileStore>) -> Self {
        UserAdmin { identity, profiles }
    }

    fn authorize(acting: &Profile) -> Result<(), AdminError> {
        if can_manage_users(&acting.role) {
            Ok(())
        } else {
            Err(AdminError::Forbidden)
        }
    }

    /// List every profile document.
    pub async fn list_users(&self, acting: &Profile) -> Result<Vec<Profile>, AdminError> {
        Self::authorize(acting)?;
        Ok(self.profiles.list_profiles().await?)
    }

    /// Create an auth account and seed its profile document with empty
    /// role/contact fields.
    pub async fn create_user(
        &self,
        acting: &Profile,
        account: &NewUserAccount,
    ) -> Result<Profile, AdminError> {
        Self::authorize(acting)?;
        let id = self
            .identity
            .create_account(&account.email, &account.password)
            .await?;
        let profile = Profile::new_account(
            id,
            &account.given_name,
            &account.family_name,
            &account.email,
        );
        self.profiles.create_profile(&profile).await?;

        tracing::info!(user_id = %profile.id, "user account created");
        Ok(profile)
    }

    /// Assign a role to a user.
    pub async fn change_role(
        &self,
        acting: &Profile,
        user_id: &str,
        role: &str,
    ) -> Result<Profile, AdminError> {
        Self::authorize(acting)?;
        validate_role(role).map_err(AdminError::InvalidRole)?;
        let updated = self
            .profiles
            .update_profile(
                user_id,
                &ProfileUpdate {
                    role: Some(role.to_string()),
                    ..Default::default()
                },
            )
            .await?;

        tracing::info!(user_id, role, "user role changed");
        Ok(updated)
    }

    /// Remove a user's profile document.
    ///
    /// Returns [`ACCOUNT_DELETION_NOTICE`]: the auth account itself is not
    /// deleted here.
    pub async fn delete_user(
        &self,
        acting: &Profile,
        user_id: &str,
    ) -> Result<&'static str, AdminError> {
        Self::authorize(acting)?;
        self.profiles.delete_profile(user_id).await?;

        tracing::info!(user_id, "user profile document removed");
        Ok(ACCOUNT_DELETION_NOTICE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    use biograph_core::roles::{ROLE_EDITOR, ROLE_HEAD_DIRECTOR};

    use crate::profiles::InMemoryDirectory;

    fn head_director() -> Profile {
        let mut profile =
            Profile::new_account("hd-1".into(), "Alex", "Director", "alex@example.org");
        profile.role = ROLE_HEAD_DIRECTOR.to_string();
        profile
    }

    fn editor() -> Profile {
        let mut profile = Profile::new_account("ed-1".into(), "Erin", "Editor", "erin@example.org");
        profile.role = ROLE_EDITOR.to_string();
        profile
    }

    fn admin_over(directory: &Arc<InMemoryDirectory>) -> UserAdmin {
        UserAdmin::new(directory.clone(), directory.clone())
    }

    #[tokio::test]
    async fn non_head_director_is_forbidden() {
        let directory = Arc::new(InMemoryDirectory::new());
        let admin = admin_over(&directory);
        assert_matches!(
            admin.list_users(&editor()).await,
            Err(AdminError::Forbidden)
        );
        assert_matches!(
            admin.delete_user(&editor(), "someone").await,
            Err(AdminError::Forbidden)
        );
    }

    #[tokio::test]
    async fn created_user_has_empty_role_and_can_sign_in() {
        let directory = Arc::new(InMemoryDirectory::new());
        let admin = admin_over(&directory);

        let profile = admin
            .create_user(
                &head_director(),
                &NewUserAccount {
                    email: "new@example.org".into(),
                    password: "changeme1".into(),
                    given_name: "Nina".into(),
                    family_name: "New".into(),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.role, "");
        assert_eq!(profile.display_name(), "Nina New");

        let (session, fetched) =
            crate::profiles::login(&*directory, &*directory, "new@example.org", "changeme1")
                .await
                .unwrap();
        assert_eq!(session.user_id, profile.id);
        assert_eq!(fetched, profile);
    }

    #[tokio::test]
    async fn change_role_validates_the_vocabulary() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_user("pw", editor());
        let admin = admin_over(&directory);

        assert_matches!(
            admin.change_role(&head_director(), "ed-1", "Owner").await,
            Err(AdminError::InvalidRole(_))
        );

        let updated = admin
            .change_role(&head_director(), "ed-1", ROLE_HEAD_DIRECTOR)
            .await
            .unwrap();
        assert_eq!(updated.role, ROLE_HEAD_DIRECTOR);
    }

    #[tokio::test]
    async fn delete_user_removes_only_the_document() {
        let directory = Arc::new(InMemoryDirectory::new());
        directory.add_user("pw", editor());
        let admin = admin_over(&directory);

        let notice = admin
            .delete_user(&head_director(), "ed-1")
            .await
            .unwrap();
        assert!(notice.contains("identity provider console"));

        // The document is gone but the auth account still answers.
        assert!(admin.list_users(&head_director()).await.unwrap().is_empty());
        let err = crate::profiles::login(&*directory, &*directory, "erin@example.org", "pw")
            .await
            .unwrap_err();
        assert_matches!(err, crate::profiles::LoginError::ProfileMissing);
    }
}
