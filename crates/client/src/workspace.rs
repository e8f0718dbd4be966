//! The entry workspace state machine.
//!
//! Holds the merged entry/comment/profile collections plus the view state
//! of the entries screen (searches, filter sets, page, selection, comment
//! modal), and issues mutations back to the stores.
//!
//! Reconciliation is uniform across mutations: apply an optimistic local
//! patch, issue the store call, then re-fetch the entry collection so
//! local state converges to server truth. A failed call reverts the patch
//! before re-fetching. Every fetch races the workspace's cancellation
//! token; a cancelled workspace discards late responses instead of
//! overwriting newer state.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use biograph_core::comment::{format_posted_at, group_by_entry, validate_comment_body, Comment};
use biograph_core::entry::Entry;
use biograph_core::filter::{filter_entries, EntryFilter};
use biograph_core::paging::{page_count, page_slice};
use biograph_core::profile::{display_name_for, Profile};
use biograph_core::status::{count_statuses, validate_status, StatusCounts};
use biograph_core::types::DbId;

use crate::error::WorkspaceError;
use crate::profiles::ProfileStore;
use crate::session::Session;
use crate::stores::{AssignmentRequest, EntryStore, NewComment};

/// UI-facing view state: everything the entries screen derives its
/// rendering from besides the collections themselves.
#[derive(Debug, Default)]
struct ViewState {
    /// Current 1-based page.
    page: usize,
    name_query: String,
    description_query: String,
    status_filter: HashSet<String>,
    editor_filter: HashSet<String>,
    /// Entry ids selected for batch assign/unassign.
    selected: BTreeSet<DbId>,
    /// Entry whose comment modal is open, if any.
    comment_target: Option<DbId>,
    draft_comment: String,
}

/// In-memory workspace over the full entry collection.
pub struct Workspace {
    entry_store: Arc<dyn EntryStore>,
    profile_store: Arc<dyn ProfileStore>,
    session: Session,
    cancel: CancellationToken,

    entries: Vec<Entry>,
    comments: HashMap<DbId, Vec<Comment>>,
    profiles: Vec<Profile>,
    profiles_loaded: bool,

    view: ViewState,
}

impl Workspace {
    /// Create a workspace for an authenticated session.
    ///
    /// Nothing is fetched yet; call [`Workspace::load`].
    pub fn new(
        entry_store: Arc<dyn EntryStore>,
        profile_store: Arc<dyn ProfileStore>,
        session: Session,
    ) -> Self {
        Workspace {
            entry_store,
            profile_store,
            session,
            cancel: CancellationToken::new(),
            entries: Vec::new(),
            comments: HashMap::new(),
            profiles: Vec::new(),
            profiles_loaded: false,
            view: ViewState {
                page: 1,
                ..Default::default()
            },
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Cancel in-flight fetches (e.g. when the screen is torn down).
    /// Results arriving after cancellation are discarded.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    // -----------------------------------------------------------------------
    // Loading
    // -----------------------------------------------------------------------

    /// Fetch entries, comments, and the user directory.
    ///
    /// Comments are grouped by entry id; the page resets to 1 when the
    /// entry collection goes from empty to non-empty.
    pub async fn load(&mut self) -> Result<(), WorkspaceError> {
        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.list_entries()).await? {
            Some(entries) => self.apply_entries(entries),
            None => return Ok(()),
        }

        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.list_comments()).await? {
            Some(comments) => self.comments = group_by_entry(comments),
            None => return Ok(()),
        }

        let directory = Arc::clone(&self.profile_store);
        if let Some(profiles) = self.run_cancellable(directory.list_profiles()).await? {
            self.profiles = profiles;
            self.profiles_loaded = true;
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Derived views
    // -----------------------------------------------------------------------

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// The ordered entries passing every active predicate.
    pub fn filtered(&self) -> Vec<&Entry> {
        let filter = EntryFilter {
            name_query: self.view.name_query.clone(),
            description_query: self.view.description_query.clone(),
            statuses: self.view.status_filter.clone(),
            editors: self.view.editor_filter.clone(),
        };
        filter_entries(&self.entries, &filter)
    }

    /// The current page of the filtered view.
    pub fn page_entries(&self) -> Vec<&Entry> {
        let filtered = self.filtered();
        page_slice(&filtered, self.view.page).to_vec()
    }

    /// Total pages in the filtered view.
    pub fn pages(&self) -> usize {
        page_count(self.filtered().len())
    }

    pub fn page(&self) -> usize {
        self.view.page
    }

    /// Per-status tallies over the full (unfiltered) collection, for the
    /// statistics card.
    pub fn status_counts(&self) -> StatusCounts {
        count_statuses(self.entries.iter().map(|e| e.status.as_deref()))
    }

    /// Comments for one entry, oldest first.
    pub fn comments_for(&self, entry_id: DbId) -> &[Comment] {
        self.comments.get(&entry_id).map(Vec::as_slice).unwrap_or(&[])
    }

    // -----------------------------------------------------------------------
    // View mutation
    // -----------------------------------------------------------------------

    pub fn set_page(&mut self, page: usize) {
        self.view.page = page;
    }

    /// Update the name search. A non-empty query snaps back to page 1.
    pub fn set_name_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if !query.is_empty() {
            self.view.page = 1;
        }
        self.view.name_query = query;
    }

    /// Update the description search. A non-empty query snaps back to page 1.
    pub fn set_description_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if !query.is_empty() {
            self.view.page = 1;
        }
        self.view.description_query = query;
    }

    pub fn set_status_filter(&mut self, statuses: HashSet<String>) {
        self.view.status_filter = statuses;
    }

    pub fn set_editor_filter(&mut self, editors: HashSet<String>) {
        self.view.editor_filter = editors;
    }

    pub fn selected(&self) -> &BTreeSet<DbId> {
        &self.view.selected
    }

    pub fn toggle_selected(&mut self, entry_id: DbId) {
        if !self.view.selected.remove(&entry_id) {
            self.view.selected.insert(entry_id);
        }
    }

    pub fn clear_selection(&mut self) {
        self.view.selected.clear();
    }

    /// Open the comment modal for an entry.
    pub fn open_comments(&mut self, entry_id: DbId) {
        self.view.comment_target = Some(entry_id);
    }

    /// Close the comment modal, keeping any draft text.
    pub fn close_comments(&mut self) {
        self.view.comment_target = None;
    }

    pub fn comment_target(&self) -> Option<DbId> {
        self.view.comment_target
    }

    pub fn set_draft_comment(&mut self, text: impl Into<String>) {
        self.view.draft_comment = text.into();
    }

    pub fn draft_comment(&self) -> &str {
        &self.view.draft_comment
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Assign every selected entry to the acting user.
    ///
    /// Preconditions: a non-empty selection, a loaded directory, and a
    /// profile document for the acting user (the assignee display name is
    /// resolved from it, never fabricated).
    pub async fn assign_selected(&mut self) -> Result<(), WorkspaceError> {
        if self.view.selected.is_empty() {
            return Err(WorkspaceError::NoSelection);
        }
        let assigned_to = self.resolve_actor()?;
        let assigned_id = self.session.user_id.clone();
        let entry_ids: Vec<DbId> = self.view.selected.iter().copied().collect();

        let snapshot = self.entries.clone();
        for entry in &mut self.entries {
            if self.view.selected.contains(&entry.id) {
                entry.assigned_to = Some(assigned_to.clone());
                entry.assigned_id = Some(assigned_id.clone());
            }
        }

        let request = AssignmentRequest {
            assigned_id,
            assigned_to,
            entry_ids,
        };
        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.assign(&request)).await {
            Ok(Some(updated)) => {
                tracing::info!(updated, "entries assigned");
                self.reconcile_entries().await;
                Ok(())
            }
            Ok(None) => {
                self.entries = snapshot;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "assignment failed, reverting local patch");
                self.entries = snapshot;
                self.reconcile_entries().await;
                Err(err.into())
            }
        }
    }

    /// Clear the assignment of every selected entry.
    pub async fn unassign_selected(&mut self) -> Result<(), WorkspaceError> {
        if self.view.selected.is_empty() {
            return Err(WorkspaceError::NoSelection);
        }
        let entry_ids: Vec<DbId> = self.view.selected.iter().copied().collect();

        let snapshot = self.entries.clone();
        for entry in &mut self.entries {
            if self.view.selected.contains(&entry.id) {
                entry.assigned_to = None;
                entry.assigned_id = None;
            }
        }

        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.unassign(&entry_ids)).await {
            Ok(Some(updated)) => {
                tracing::info!(updated, "entries unassigned");
                self.reconcile_entries().await;
                Ok(())
            }
            Ok(None) => {
                self.entries = snapshot;
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "unassignment failed, reverting local patch");
                self.entries = snapshot;
                self.reconcile_entries().await;
                Err(err.into())
            }
        }
    }

    /// Change one entry's review status.
    pub async fn change_status(
        &mut self,
        entry_id: DbId,
        status: &str,
    ) -> Result<(), WorkspaceError> {
        validate_status(status).map_err(WorkspaceError::InvalidStatus)?;

        let previous = self
            .entries
            .iter()
            .find(|e| e.id == entry_id)
            .map(|e| e.status.clone());
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == entry_id) {
            entry.status = Some(status.to_string());
        }

        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.update_status(entry_id, status)).await {
            Ok(Some(_)) => {
                tracing::info!(entry_id, status, "entry status updated");
                self.reconcile_entries().await;
                Ok(())
            }
            Ok(None) => {
                self.revert_status(entry_id, previous);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, entry_id, "status update failed, reverting local patch");
                self.revert_status(entry_id, previous);
                self.reconcile_entries().await;
                Err(err.into())
            }
        }
    }

    /// Add the draft comment to the entry whose modal is open.
    ///
    /// Preconditions: an open comment target and a non-empty draft. On
    /// success the created comment is appended locally and the draft
    /// cleared; on failure the draft is retained so the user can retry.
    pub async fn add_comment(&mut self) -> Result<(), WorkspaceError> {
        let entry_id = self
            .view
            .comment_target
            .ok_or(WorkspaceError::NoCommentTarget)?;
        validate_comment_body(&self.view.draft_comment)
            .map_err(WorkspaceError::InvalidComment)?;
        let commenter = self.resolve_actor()?;

        let request = NewComment {
            entry_id,
            body: self.view.draft_comment.clone(),
            commenter,
            commenter_id: self.session.user_id.clone(),
            posted_at: format_posted_at(chrono::Utc::now()),
        };
        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.add_comment(&request)).await {
            Ok(Some(comment)) => {
                tracing::info!(entry_id, "comment added");
                self.comments.entry(entry_id).or_default().push(comment);
                self.view.draft_comment.clear();
                Ok(())
            }
            Ok(None) => Ok(()),
            Err(err) => {
                tracing::warn!(error = %err, entry_id, "comment creation failed, draft retained");
                Err(err.into())
            }
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// The acting user's display name, resolved from the loaded directory.
    fn resolve_actor(&self) -> Result<String, WorkspaceError> {
        if !self.profiles_loaded {
            return Err(WorkspaceError::ProfilesNotLoaded);
        }
        display_name_for(&self.profiles, &self.session.user_id)
            .ok_or_else(|| WorkspaceError::UnknownActor(self.session.user_id.clone()))
    }

    /// Replace the entry collection, resetting to page 1 on the
    /// empty-to-non-empty transition (and only then).
    fn apply_entries(&mut self, fresh: Vec<Entry>) {
        let was_empty = self.entries.is_empty();
        self.entries = fresh;
        if was_empty && !self.entries.is_empty() {
            self.view.page = 1;
        }
    }

    fn revert_status(&mut self, entry_id: DbId, previous: Option<Option<String>>) {
        if let (Some(previous), Some(entry)) = (
            previous,
            self.entries.iter_mut().find(|e| e.id == entry_id),
        ) {
            entry.status = previous;
        }
    }

    /// Re-fetch the entry collection after a mutation. A failure here is
    /// logged and local state kept; the next load converges.
    async fn reconcile_entries(&mut self) {
        let store = Arc::clone(&self.entry_store);
        match self.run_cancellable(store.list_entries()).await {
            Ok(Some(fresh)) => self.apply_entries(fresh),
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(error = %err, "reconciliation fetch failed, keeping local state");
            }
        }
    }

    /// Race an operation against the cancellation token. `Ok(None)` means
    /// the workspace was cancelled and the result must be discarded.
    ///
    /// `biased` so an already-cancelled workspace never issues the call.
    async fn run_cancellable<T, E>(
        &self,
        operation: impl Future<Output = Result<T, E>>,
    ) -> Result<Option<T>, E> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Ok(None),
            result = operation => result.map(Some),
        }
    }
}
