//! The identity/profile store boundary.
//!
//! The platform does not own user identity: accounts and profile documents
//! live in an external provider, consumed here through [`IdentityStore`]
//! (auth primitives) and [`ProfileStore`] (document CRUD).
//! [`InMemoryDirectory`] implements both for tests and offline development.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use biograph_core::profile::Profile;
use biograph_core::types::ProfileId;

use crate::error::{DirectoryError, IdentityError};
use crate::session::Session;

/// Field-level update of a profile document. `None` fields are untouched.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub phone_number: Option<String>,
    pub gender: Option<String>,
    pub avatar_url: Option<String>,
}

/// Async interface to the profile document collection.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Fetch one profile document by id.
    async fn get_profile(&self, id: &str) -> Result<Profile, DirectoryError>;

    /// List every profile document.
    async fn list_profiles(&self) -> Result<Vec<Profile>, DirectoryError>;

    /// Create a profile document (used right after account creation, and
    /// to backfill a missing document on first edit).
    async fn create_profile(&self, profile: &Profile) -> Result<(), DirectoryError>;

    /// Apply a field-level update, returning the updated document.
    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, DirectoryError>;

    /// Remove a profile document. The underlying auth account is NOT
    /// touched; deleting it is a manual provider-console operation.
    async fn delete_profile(&self, id: &str) -> Result<(), DirectoryError>;
}

/// Async interface to the identity provider's session primitives.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    /// Create an auth account, returning the new opaque user id.
    async fn create_account(&self, email: &str, password: &str)
        -> Result<ProfileId, IdentityError>;

    /// Establish a session from credentials.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// End a session.
    async fn sign_out(&self, session: &Session) -> Result<(), IdentityError>;

    /// Send a password-reset email.
    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError>;

    /// Change the email on the auth account. May fail with
    /// [`IdentityError::RequiresRecentLogin`] if the session is stale.
    async fn update_email(&self, session: &Session, new_email: &str)
        -> Result<(), IdentityError>;
}

/// Failure of the login flow.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    /// Authentication succeeded but no profile document exists for the
    /// account.
    #[error("User not found")]
    ProfileMissing,
}

/// Sign in and resolve the session's profile document.
///
/// A session whose account has no profile document is rejected rather than
/// admitted with a blank identity.
pub async fn login(
    identity: &dyn IdentityStore,
    profiles: &dyn ProfileStore,
    email: &str,
    password: &str,
) -> Result<(Session, Profile), LoginError> {
    let session = identity.sign_in(email, password).await?;
    let profile = profiles
        .get_profile(&session.user_id)
        .await
        .map_err(|_| LoginError::ProfileMissing)?;
    Ok((session, profile))
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

struct Account {
    id: ProfileId,
    password: String,
}

struct DirectoryInner {
    accounts: HashMap<String, Account>,
    profiles: HashMap<ProfileId, Profile>,
    reset_emails: Vec<String>,
    require_recent_login: bool,
}

/// In-process identity provider and profile collection.
pub struct InMemoryDirectory {
    inner: Mutex<DirectoryInner>,
}

impl Default for InMemoryDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        InMemoryDirectory {
            inner: Mutex::new(DirectoryInner {
                accounts: HashMap::new(),
                profiles: HashMap::new(),
                reset_emails: Vec::new(),
                require_recent_login: false,
            }),
        }
    }

    /// Seed an account and its profile document in one step.
    pub fn add_user(&self, password: &str, profile: Profile) {
        let mut inner = self.lock();
        inner.accounts.insert(
            profile.email.clone(),
            Account {
                id: profile.id.clone(),
                password: password.to_string(),
            },
        );
        inner.profiles.insert(profile.id.clone(), profile);
    }

    /// Addresses password-reset emails were sent to, in order.
    pub fn reset_emails(&self) -> Vec<String> {
        self.lock().reset_emails.clone()
    }

    /// Make subsequent email changes demand a fresh sign-in, the way the
    /// real provider does once a session ages.
    pub fn set_require_recent_login(&self, value: bool) {
        self.lock().require_recent_login = value;
    }

    fn lock(&self) -> MutexGuard<'_, DirectoryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl ProfileStore for InMemoryDirectory {
    async fn get_profile(&self, id: &str) -> Result<Profile, DirectoryError> {
        self.lock()
            .profiles
            .get(id)
            .cloned()
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, DirectoryError> {
        let mut profiles: Vec<Profile> = self.lock().profiles.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    async fn create_profile(&self, profile: &Profile) -> Result<(), DirectoryError> {
        self.lock()
            .profiles
            .insert(profile.id.clone(), profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Profile, DirectoryError> {
        let mut inner = self.lock();
        let profile = inner
            .profiles
            .get_mut(id)
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))?;

        if let Some(v) = &update.given_name {
            profile.given_name = v.clone();
        }
        if let Some(v) = &update.family_name {
            profile.family_name = v.clone();
        }
        if let Some(v) = &update.email {
            profile.email = v.clone();
        }
        if let Some(v) = &update.role {
            profile.role = v.clone();
        }
        if let Some(v) = &update.phone_number {
            profile.phone_number = v.clone();
        }
        if let Some(v) = &update.gender {
            profile.gender = v.clone();
        }
        if let Some(v) = &update.avatar_url {
            profile.avatar_url = v.clone();
        }
        Ok(profile.clone())
    }

    async fn delete_profile(&self, id: &str) -> Result<(), DirectoryError> {
        self.lock()
            .profiles
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DirectoryError::NotFound(id.to_string()))
    }
}

#[async_trait]
impl IdentityStore for InMemoryDirectory {
    async fn create_account(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProfileId, IdentityError> {
        let mut inner = self.lock();
        if inner.accounts.contains_key(email) {
            return Err(IdentityError::EmailTaken(email.to_string()));
        }
        let id = uuid::Uuid::new_v4().to_string();
        inner.accounts.insert(
            email.to_string(),
            Account {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        Ok(id)
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let inner = self.lock();
        let account = inner
            .accounts
            .get(email)
            .ok_or(IdentityError::InvalidCredentials)?;
        if account.password != password {
            return Err(IdentityError::InvalidCredentials);
        }
        Ok(Session {
            user_id: account.id.clone(),
            email: email.to_string(),
        })
    }

    async fn sign_out(&self, _session: &Session) -> Result<(), IdentityError> {
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), IdentityError> {
        let mut inner = self.lock();
        if !inner.accounts.contains_key(email) {
            return Err(IdentityError::Internal(format!(
                "no account for {email}"
            )));
        }
        inner.reset_emails.push(email.to_string());
        Ok(())
    }

    async fn update_email(
        &self,
        session: &Session,
        new_email: &str,
    ) -> Result<(), IdentityError> {
        let mut inner = self.lock();
        if inner.require_recent_login {
            return Err(IdentityError::RequiresRecentLogin);
        }
        let account = inner
            .accounts
            .remove(&session.email)
            .ok_or(IdentityError::InvalidCredentials)?;
        inner.accounts.insert(new_email.to_string(), account);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn directory_with_jane() -> InMemoryDirectory {
        let directory = InMemoryDirectory::new();
        directory.add_user(
            "hunter2",
            Profile::new_account("u-1".into(), "Jane", "Smith", "jane@example.org"),
        );
        directory
    }

    #[tokio::test]
    async fn login_resolves_session_and_profile() {
        let directory = directory_with_jane();
        let (session, profile) = login(&directory, &directory, "jane@example.org", "hunter2")
            .await
            .unwrap();
        assert_eq!(session.user_id, "u-1");
        assert_eq!(profile.display_name(), "Jane Smith");

        directory.sign_out(&session).await.unwrap();
    }

    #[tokio::test]
    async fn login_with_wrong_password_is_rejected() {
        let directory = directory_with_jane();
        let err = login(&directory, &directory, "jane@example.org", "nope")
            .await
            .unwrap_err();
        assert_matches!(err, LoginError::Identity(IdentityError::InvalidCredentials));
    }

    #[tokio::test]
    async fn login_without_profile_document_is_rejected() {
        let directory = InMemoryDirectory::new();
        let id = directory
            .create_account("ghost@example.org", "pw")
            .await
            .unwrap();
        assert!(!id.is_empty());

        let err = login(&directory, &directory, "ghost@example.org", "pw")
            .await
            .unwrap_err();
        assert_matches!(err, LoginError::ProfileMissing);
    }

    #[tokio::test]
    async fn duplicate_account_creation_is_rejected() {
        let directory = directory_with_jane();
        let err = directory
            .create_account("jane@example.org", "pw")
            .await
            .unwrap_err();
        assert_matches!(err, IdentityError::EmailTaken(_));
    }

    #[tokio::test]
    async fn password_reset_records_recipient() {
        let directory = directory_with_jane();
        directory
            .send_password_reset("jane@example.org")
            .await
            .unwrap();
        assert_eq!(directory.reset_emails(), vec!["jane@example.org"]);
    }

    #[tokio::test]
    async fn update_profile_touches_only_given_fields() {
        let directory = directory_with_jane();
        let updated = directory
            .update_profile(
                "u-1",
                &ProfileUpdate {
                    phone_number: Some("0400 000 000".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.phone_number, "0400 000 000");
        assert_eq!(updated.given_name, "Jane");
    }

    #[tokio::test]
    async fn stale_session_email_change_requires_recent_login() {
        let directory = directory_with_jane();
        directory.set_require_recent_login(true);
        let session = Session {
            user_id: "u-1".into(),
            email: "jane@example.org".into(),
        };
        let err = directory
            .update_email(&session, "new@example.org")
            .await
            .unwrap_err();
        assert_matches!(err, IdentityError::RequiresRecentLogin);
    }
}
