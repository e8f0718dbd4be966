//! The entry/comment store boundary.
//!
//! [`EntryStore`] is the client's view of the remote relational store. The
//! production implementation is [`crate::http::HttpEntryStore`];
//! [`InMemoryEntryStore`] backs tests and offline development with the
//! same observable semantics (batch assignment writes both fields
//! together, idempotent updates, append-only comments).

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;

use biograph_core::comment::Comment;
use biograph_core::entry::Entry;
use biograph_core::types::DbId;

use crate::error::StoreError;

/// Body of the batch assignment call.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRequest {
    pub assigned_id: String,
    pub assigned_to: String,
    pub entry_ids: Vec<DbId>,
}

/// Body of the comment creation call.
///
/// `posted_at` is stamped by the caller; the store keeps it verbatim.
#[derive(Debug, Clone, Serialize)]
pub struct NewComment {
    pub entry_id: DbId,
    pub body: String,
    pub commenter: String,
    pub commenter_id: String,
    pub posted_at: String,
}

/// Async interface to the remote entry/comment store.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Fetch the whole entry table.
    async fn list_entries(&self) -> Result<Vec<Entry>, StoreError>;

    /// Set both assignment fields on every listed entry. Returns the
    /// number of rows updated.
    async fn assign(&self, request: &AssignmentRequest) -> Result<u64, StoreError>;

    /// Clear both assignment fields on every listed entry. Returns the
    /// number of rows updated.
    async fn unassign(&self, entry_ids: &[DbId]) -> Result<u64, StoreError>;

    /// Change one entry's review status, returning the updated entry.
    async fn update_status(&self, entry_id: DbId, status: &str) -> Result<Entry, StoreError>;

    /// Fetch the whole comment table.
    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError>;

    /// Insert a comment, returning the created row.
    async fn add_comment(&self, request: &NewComment) -> Result<Comment, StoreError>;
}

// ---------------------------------------------------------------------------
// In-memory implementation
// ---------------------------------------------------------------------------

struct StoreInner {
    entries: Vec<Entry>,
    comments: Vec<Comment>,
    next_comment_id: DbId,
    fail_next: bool,
    assign_calls: usize,
    unassign_calls: usize,
    list_calls: usize,
}

/// An [`EntryStore`] held entirely in memory.
pub struct InMemoryEntryStore {
    inner: Mutex<StoreInner>,
}

impl InMemoryEntryStore {
    pub fn new(entries: Vec<Entry>) -> Self {
        InMemoryEntryStore {
            inner: Mutex::new(StoreInner {
                entries,
                comments: Vec::new(),
                next_comment_id: 1,
                fail_next: false,
                assign_calls: 0,
                unassign_calls: 0,
                list_calls: 0,
            }),
        }
    }

    /// Seed the comment table, assigning sequential ids.
    pub fn with_comments(self, comments: Vec<Comment>) -> Self {
        {
            let mut inner = self.lock();
            inner.next_comment_id = comments.iter().map(|c| c.id).max().unwrap_or(0) + 1;
            inner.comments = comments;
        }
        self
    }

    /// Make the next store call fail with a synthetic server error.
    pub fn fail_next_call(&self) {
        self.lock().fail_next = true;
    }

    /// How many batch assign calls have been issued.
    pub fn assign_calls(&self) -> usize {
        self.lock().assign_calls
    }

    /// How many batch unassign calls have been issued.
    pub fn unassign_calls(&self) -> usize {
        self.lock().unassign_calls
    }

    /// How many whole-table entry reads have been issued.
    pub fn list_calls(&self) -> usize {
        self.lock().list_calls
    }

    /// Snapshot of the current entry table, for assertions.
    pub fn entries_snapshot(&self) -> Vec<Entry> {
        self.lock().entries.clone()
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check_failure(inner: &mut StoreInner) -> Result<(), StoreError> {
        if inner.fail_next {
            inner.fail_next = false;
            return Err(StoreError::Api {
                status: 500,
                code: "INTERNAL_ERROR".into(),
                message: "An internal error occurred".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl EntryStore for InMemoryEntryStore {
    async fn list_entries(&self) -> Result<Vec<Entry>, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        inner.list_calls += 1;
        Ok(inner.entries.clone())
    }

    async fn assign(&self, request: &AssignmentRequest) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        inner.assign_calls += 1;
        let mut updated = 0;
        for entry in &mut inner.entries {
            if request.entry_ids.contains(&entry.id) {
                entry.assigned_to = Some(request.assigned_to.clone());
                entry.assigned_id = Some(request.assigned_id.clone());
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn unassign(&self, entry_ids: &[DbId]) -> Result<u64, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        inner.unassign_calls += 1;
        let mut updated = 0;
        for entry in &mut inner.entries {
            if entry_ids.contains(&entry.id) {
                entry.assigned_to = None;
                entry.assigned_id = None;
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn update_status(&self, entry_id: DbId, status: &str) -> Result<Entry, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        let entry = inner
            .entries
            .iter_mut()
            .find(|e| e.id == entry_id)
            .ok_or_else(|| StoreError::Api {
                status: 404,
                code: "NOT_FOUND".into(),
                message: format!("Entry with id {entry_id} not found"),
            })?;
        entry.status = Some(status.to_string());
        Ok(entry.clone())
    }

    async fn list_comments(&self) -> Result<Vec<Comment>, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        Ok(inner.comments.clone())
    }

    async fn add_comment(&self, request: &NewComment) -> Result<Comment, StoreError> {
        let mut inner = self.lock();
        Self::check_failure(&mut inner)?;
        let comment = Comment {
            id: inner.next_comment_id,
            entry_id: request.entry_id,
            body: request.body.clone(),
            commenter: request.commenter.clone(),
            commenter_id: request.commenter_id.clone(),
            posted_at: request.posted_at.clone(),
        };
        inner.next_comment_id += 1;
        inner.comments.push(comment.clone());
        Ok(comment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn entry(id: DbId) -> Entry {
        Entry {
            id,
            given_names: "John".into(),
            family_name: "Doe".into(),
            birth: None,
            death: None,
            short_description: None,
            link: None,
            status: None,
            assigned_to: None,
            assigned_id: None,
        }
    }

    #[tokio::test]
    async fn assign_then_unassign_restores_both_fields() {
        let store = InMemoryEntryStore::new(vec![entry(1), entry(2)]);

        let updated = store
            .assign(&AssignmentRequest {
                assigned_id: "u-1".into(),
                assigned_to: "Jane Smith".into(),
                entry_ids: vec![1, 2],
            })
            .await
            .unwrap();
        assert_eq!(updated, 2);
        for e in store.entries_snapshot() {
            assert_eq!(e.assigned_to.as_deref(), Some("Jane Smith"));
            assert_eq!(e.assigned_id.as_deref(), Some("u-1"));
        }

        store.unassign(&[1, 2]).await.unwrap();
        for e in store.entries_snapshot() {
            assert_eq!(e.assigned_to, None);
            assert_eq!(e.assigned_id, None);
        }
    }

    #[tokio::test]
    async fn unassign_of_unassigned_entries_is_idempotent() {
        let store = InMemoryEntryStore::new(vec![entry(1)]);
        let first = store.unassign(&[1]).await.unwrap();
        let second = store.unassign(&[1]).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(store.entries_snapshot()[0].assigned_to, None);
    }

    #[tokio::test]
    async fn update_status_of_unknown_entry_is_not_found() {
        let store = InMemoryEntryStore::new(vec![entry(1)]);
        let err = store.update_status(99, "No Revision").await.unwrap_err();
        assert_matches!(err, StoreError::Api { status: 404, .. });
    }

    #[tokio::test]
    async fn fail_next_call_fails_exactly_once() {
        let store = InMemoryEntryStore::new(vec![entry(1)]);
        store.fail_next_call();
        assert!(store.list_entries().await.is_err());
        assert!(store.list_entries().await.is_ok());
    }
}
