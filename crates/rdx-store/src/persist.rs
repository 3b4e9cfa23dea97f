//! Optional on-disk cache of the directory state.
//!
//! A cache layer only: restored data is re-validated and any successful
//! fetch supersedes it. Failures to read or write the cache are reported to
//! the caller, who logs and moves on.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::UserRecord;
use crate::store::DirectoryState;

/// Namespace written into every cache file; a mismatch rejects the file.
pub const CACHE_NAMESPACE: &str = "rolodex.directory.v1";

/// The persisted subset of the directory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedDirectory {
    /// Fixed namespace, checked on load
    pub namespace: String,
    /// When the cache was written
    pub saved_at: DateTime<Utc>,
    /// Fetched records by page
    pub pages: BTreeMap<u32, Vec<UserRecord>>,
    /// Page the user was looking at
    pub current_page: u32,
    /// Total pages as of the last fetch
    pub total_pages: u32,
    /// Total users as of the last fetch
    pub total_users: u32,
}

impl CachedDirectory {
    /// Capture the persistable subset of `state`.
    pub fn from_state(state: &DirectoryState) -> Self {
        Self {
            namespace: CACHE_NAMESPACE.to_string(),
            saved_at: Utc::now(),
            pages: state.pages.clone(),
            current_page: state.current_page,
            total_pages: state.total_pages,
            total_users: state.total_users,
        }
    }
}

/// Write the cacheable subset of `state` to `path` as JSON.
pub fn save(path: &Path, state: &DirectoryState) -> anyhow::Result<()> {
    let cached = CachedDirectory::from_state(state);
    let json = serde_json::to_string_pretty(&cached)?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating cache directory {}", parent.display()))?;
    }
    fs::write(path, json).with_context(|| format!("writing cache to {}", path.display()))?;

    tracing::debug!(path = %path.display(), "directory cache saved");
    Ok(())
}

/// Read a cache file written by [`save`].
pub fn load(path: &Path) -> anyhow::Result<CachedDirectory> {
    let bytes =
        fs::read(path).with_context(|| format!("reading cache from {}", path.display()))?;
    let cached: CachedDirectory = serde_json::from_slice(&bytes)
        .with_context(|| format!("parsing cache file {}", path.display()))?;

    anyhow::ensure!(
        cached.namespace == CACHE_NAMESPACE,
        "unexpected cache namespace '{}'",
        cached.namespace
    );

    Ok(cached)
}
