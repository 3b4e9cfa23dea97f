//! Directory store for the rolodex user-management client.
//!
//! Owns the client-side directory state: page-partitioned user records,
//! schema validation, search, optimistic create/update/delete with snapshot
//! rollback, and the optional persisted cache.

pub mod config;
pub mod error;
pub mod model;
pub mod persist;
pub mod search;
pub mod store;
pub mod tracing;
pub mod validation;

pub use config::{DirectoryConfig, Environment};
pub use error::StoreError;
pub use model::{Role, UserDraft, UserRecord};
pub use store::{DirectoryState, DirectoryStore};
