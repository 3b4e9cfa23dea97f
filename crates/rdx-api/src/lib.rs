//! Remote-service layer for the rolodex user directory.
//!
//! Wire types for the reqres-style user API, the [`DirectoryApi`] seam the
//! store is written against, and the production [`HttpDirectoryApi`] backed
//! by reqwest.

pub mod client;
pub mod error;
pub mod types;

pub use client::{DirectoryApi, HttpDirectoryApi};
pub use error::ApiError;
pub use types::{CreatedUser, RawUser, UpdatedUser, UserEnvelope, UserPayload, UsersPage};
