//! The directory store: single owner of all client-side user state.
//!
//! Presentation code triggers actions (fetch, add, update, delete, search)
//! and reads value-copy snapshots back; it never holds a reference into the
//! store's containers. Create, update and delete apply locally first, with
//! snapshot rollback when the server rejects the call.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rdx_api::DirectoryApi;

use crate::error::{StoreError, summarize_fields};
use crate::model::{DEFAULT_AVATAR_URL, LOCAL_ID_BASE, UserDraft, UserRecord};
use crate::persist::CachedDirectory;
use crate::search;
use crate::validation;

/// Everything the presentation layer can observe, as one value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryState {
    /// Fetched records, partitioned by page number
    pub pages: BTreeMap<u32, Vec<UserRecord>>,
    /// Page the user is looking at; 0 until the first fetch commits
    pub current_page: u32,
    /// Total pages reported by the last successful fetch
    pub total_pages: u32,
    /// Total users reported by the last successful fetch
    pub total_users: u32,
    /// Current search term; filtering is recomputed on read
    pub search_term: String,
    /// Record selected for detail view, held by value
    pub selected_user: Option<UserRecord>,
    /// True while a fetch is in flight
    pub is_loading: bool,
    /// Message from the most recent failed action, cleared by the next one
    pub error: Option<String>,
}

struct Inner {
    state: DirectoryState,
    /// Sequence number of the newest fetch issued per page. A response
    /// whose sequence is no longer the newest for its page is discarded.
    latest_fetch: HashMap<u32, u64>,
}

/// Single-writer state container for the user directory.
///
/// Interior state lives behind a mutex that is only held across synchronous
/// state transitions, never across a network await, so actions interleave at
/// request boundaries exactly and each commits (or rolls back) atomically.
pub struct DirectoryStore {
    api: Arc<dyn DirectoryApi>,
    per_page: u32,
    inner: Mutex<Inner>,
    next_local_id: AtomicU32,
    next_fetch_seq: AtomicU64,
}

impl fmt::Debug for DirectoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectoryStore")
            .field("per_page", &self.per_page)
            .field("state", &self.lock().state)
            .finish()
    }
}

impl DirectoryStore {
    /// Create an empty store backed by the given remote service.
    pub fn new(api: Arc<dyn DirectoryApi>, per_page: u32) -> Self {
        Self {
            api,
            per_page,
            inner: Mutex::new(Inner {
                state: DirectoryState::default(),
                latest_fetch: HashMap::new(),
            }),
            next_local_id: AtomicU32::new(LOCAL_ID_BASE),
            next_fetch_seq: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// A value copy of the full directory state.
    pub fn snapshot(&self) -> DirectoryState {
        self.lock().state.clone()
    }

    /// The current page's records filtered by the search term.
    ///
    /// Pure recomputation over state; the filter result is never stored.
    pub fn visible_users(&self) -> Vec<UserRecord> {
        let inner = self.lock();
        let records = inner
            .state
            .pages
            .get(&inner.state.current_page)
            .map(Vec::as_slice)
            .unwrap_or_default();
        search::filter_users(records, &inner.state.search_term)
    }

    /// Set the search term used by [`Self::visible_users`].
    pub fn set_search_term(&self, term: &str) {
        self.lock().state.search_term = term.to_string();
    }

    /// Select a record for detail view (a value copy), or clear the selection.
    pub fn set_selected_user(&self, user: Option<UserRecord>) {
        self.lock().state.selected_user = user;
    }

    /// Drop all directory state and start over empty.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.state = DirectoryState::default();
        inner.latest_fetch.clear();
        tracing::debug!("directory state reset");
    }

    /// Seed the store from a persisted cache.
    ///
    /// Cache data is never trusted ahead of a fetch: records that fail
    /// validation are dropped, and the call is a no-op once any page has
    /// been fetched.
    pub fn restore(&self, cached: CachedDirectory) {
        let mut inner = self.lock();
        if !inner.state.pages.is_empty() {
            tracing::debug!("ignoring cache restore over fetched state");
            return;
        }

        let mut pages = BTreeMap::new();
        for (page, records) in cached.pages {
            let mut kept = Vec::with_capacity(records.len());
            for record in records {
                match validation::validate_record(&record) {
                    Ok(()) => kept.push(record),
                    Err(fields) => {
                        tracing::warn!(id = record.id, ?fields, "dropping invalid cached record");
                    }
                }
            }
            if !kept.is_empty() {
                pages.insert(page, kept);
            }
        }

        inner.state.pages = pages;
        inner.state.current_page = cached.current_page;
        inner.state.total_pages = cached.total_pages;
        inner.state.total_users = cached.total_users;
    }

    /// Fetch one page from the remote service and commit it into state.
    ///
    /// Page numbers start at 1; 0 is treated as 1. On failure the error
    /// message lands in state and previously fetched pages are untouched.
    /// A response that has been superseded by a newer fetch for the same
    /// page is discarded.
    pub async fn fetch_page(&self, page: u32) -> Result<(), StoreError> {
        let page = page.max(1);
        let seq = self.next_fetch_seq.fetch_add(1, Ordering::Relaxed);
        {
            let mut inner = self.lock();
            inner.state.is_loading = true;
            inner.state.error = None;
            inner.latest_fetch.insert(page, seq);
        }

        let outcome = self.api.fetch_users(page, self.per_page).await;

        let mut inner = self.lock();
        if inner.latest_fetch.get(&page) != Some(&seq) {
            tracing::debug!(page, seq, "discarding stale fetch response");
            return Ok(());
        }

        let response = match outcome {
            Ok(response) => response,
            Err(e) => {
                let err = StoreError::from(e);
                inner.state.error = Some(err.to_string());
                inner.state.is_loading = false;
                tracing::warn!(page, error = %err, "fetch failed");
                return Err(err);
            }
        };

        let mut fetched = Vec::with_capacity(response.data.len());
        for raw in response.data {
            let record = UserRecord::from_raw(raw);
            if let Err(fields) = validation::validate_record(&record) {
                let err = StoreError::BadRecord {
                    reason: format!("user {}: {}", record.id, summarize_fields(&fields)),
                };
                inner.state.error = Some(err.to_string());
                inner.state.is_loading = false;
                tracing::warn!(page, id = record.id, "rejected invalid server record");
                return Err(err);
            }
            fetched.push(record);
        }

        let existing = inner.state.pages.get(&page).cloned().unwrap_or_default();
        let merged = merge_page(&existing, fetched);
        inner.state.pages.insert(page, merged);
        inner.state.current_page = page;
        inner.state.total_pages = response.total_pages;
        inner.state.total_users = response.total;
        inner.state.is_loading = false;
        tracing::debug!(page, total_pages = response.total_pages, "page committed");
        Ok(())
    }

    /// Validate a draft, append it optimistically to the active page, then
    /// create it on the server.
    ///
    /// The record carries a temporary local id until the server echoes the
    /// real one. On server failure the page is restored to its pre-call
    /// content and the error lands in state.
    pub async fn add_user(&self, draft: UserDraft) -> Result<UserRecord, StoreError> {
        validation::validate_draft(&draft).map_err(StoreError::Validation)?;

        let avatar = match draft.avatar {
            Some(avatar) if !avatar.trim().is_empty() => avatar,
            _ => DEFAULT_AVATAR_URL.to_string(),
        };
        let local_id = self.next_local_id.fetch_add(1, Ordering::Relaxed);
        let record = UserRecord {
            id: local_id,
            name: draft.name.trim().to_string(),
            email: draft.email.trim().to_string(),
            role: draft.role,
            avatar,
            locally_modified: true,
        };

        let (page, previous) = {
            let mut inner = self.lock();
            let page = inner.state.current_page.max(1);
            let previous = inner.state.pages.get(&page).cloned();
            inner.state.error = None;
            inner.state.pages.entry(page).or_default().push(record.clone());
            (page, previous)
        };

        match self.api.create_user(&record.payload()).await {
            Ok(created) => {
                let mut inner = self.lock();
                if let Some(slot) = inner
                    .state
                    .pages
                    .get_mut(&page)
                    .and_then(|records| records.iter_mut().find(|r| r.id == local_id))
                {
                    if let Some(server_id) = created.id {
                        slot.id = server_id;
                    }
                    slot.locally_modified = false;
                    tracing::debug!(id = slot.id, "create confirmed");
                    Ok(slot.clone())
                } else {
                    // Page content was replaced while the call was in flight.
                    let mut confirmed = record;
                    if let Some(server_id) = created.id {
                        confirmed.id = server_id;
                    }
                    confirmed.locally_modified = false;
                    Ok(confirmed)
                }
            }
            Err(e) => {
                let mut inner = self.lock();
                restore_page(&mut inner.state.pages, page, previous);
                let err = StoreError::from(e);
                inner.state.error = Some(err.to_string());
                tracing::warn!(error = %err, "create rolled back");
                Err(err)
            }
        }
    }

    /// Validate a full record, replace it in the active page (or append it
    /// when absent), then update it on the server.
    ///
    /// A record missing from local state is not an error: it may have been
    /// fetched under a different page partition.
    pub async fn update_user(&self, record: UserRecord) -> Result<UserRecord, StoreError> {
        validation::validate_record(&record).map_err(StoreError::Validation)?;

        let id = record.id;
        let (page, previous) = {
            let mut inner = self.lock();
            let page = inner.state.current_page.max(1);
            let previous = inner.state.pages.get(&page).cloned();
            inner.state.error = None;

            let mut staged = record.clone();
            staged.locally_modified = true;
            let records = inner.state.pages.entry(page).or_default();
            match records.iter_mut().find(|r| r.id == id) {
                Some(slot) => *slot = staged,
                None => {
                    tracing::debug!(id, "record absent from current page; appending");
                    records.push(staged);
                }
            }
            (page, previous)
        };

        match self.api.update_user(id, &record.payload()).await {
            Ok(_echo) => {
                let mut inner = self.lock();
                if let Some(slot) = inner
                    .state
                    .pages
                    .get_mut(&page)
                    .and_then(|records| records.iter_mut().find(|r| r.id == id))
                {
                    slot.locally_modified = false;
                    tracing::debug!(id, "update confirmed");
                    Ok(slot.clone())
                } else {
                    let mut confirmed = record;
                    confirmed.locally_modified = false;
                    Ok(confirmed)
                }
            }
            Err(e) => {
                let mut inner = self.lock();
                restore_page(&mut inner.state.pages, page, previous);
                let err = StoreError::from(e);
                inner.state.error = Some(err.to_string());
                tracing::warn!(id, error = %err, "update rolled back");
                Err(err)
            }
        }
    }

    /// Remove the record from the active page immediately, then delete it on
    /// the server. On failure the record reappears in its original position.
    pub async fn delete_user(&self, id: u32) -> Result<(), StoreError> {
        let (page, previous, was_present) = {
            let mut inner = self.lock();
            let page = inner.state.current_page.max(1);
            let previous = inner.state.pages.get(&page).cloned();
            inner.state.error = None;

            let records = inner.state.pages.entry(page).or_default();
            let before = records.len();
            records.retain(|r| r.id != id);
            (page, previous, records.len() != before)
        };
        if !was_present {
            tracing::debug!(id, "record absent from current page; issuing delete anyway");
        }

        match self.api.delete_user(id).await {
            Ok(()) => {
                tracing::debug!(id, "delete confirmed");
                Ok(())
            }
            Err(e) => {
                let mut inner = self.lock();
                restore_page(&mut inner.state.pages, page, previous);
                let err = StoreError::from(e);
                inner.state.error = Some(err.to_string());
                tracing::warn!(id, error = %err, "delete rolled back");
                Err(err)
            }
        }
    }
}

/// Put a page back exactly as it was before an optimistic mutation.
fn restore_page(
    pages: &mut BTreeMap<u32, Vec<UserRecord>>,
    page: u32,
    previous: Option<Vec<UserRecord>>,
) {
    match previous {
        Some(records) => {
            pages.insert(page, records);
        }
        None => {
            pages.remove(&page);
        }
    }
}

/// Combine a freshly fetched page with what was already held locally.
///
/// Server data wins, except that records flagged `locally_modified` are kept
/// wholesale, and flagged records missing from the server page (optimistic
/// creates, cross-page strays) are re-appended in local order.
fn merge_page(existing: &[UserRecord], fetched: Vec<UserRecord>) -> Vec<UserRecord> {
    let mut merged: Vec<UserRecord> = fetched
        .into_iter()
        .map(|server| {
            existing
                .iter()
                .find(|local| local.id == server.id && local.locally_modified)
                .cloned()
                .unwrap_or(server)
        })
        .collect();

    for local in existing {
        if local.locally_modified && !merged.iter().any(|r| r.id == local.id) {
            merged.push(local.clone());
        }
    }

    merged
}
