use serde::{Deserialize, Serialize};

/// A user record as the remote service stores it.
///
/// The service splits names into `first_name`/`last_name` and has no notion
/// of a role; the store normalizes this shape into its own record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawUser {
    /// Server-assigned identifier
    pub id: u32,
    /// User's email address
    pub email: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Avatar URL; may be missing or empty
    #[serde(default)]
    pub avatar: String,
}

/// One page of the `/users` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsersPage {
    /// Page number this response covers
    #[serde(default)]
    pub page: u32,
    /// Page size the server applied
    #[serde(default)]
    pub per_page: u32,
    /// Total number of users across all pages
    #[serde(default)]
    pub total: u32,
    /// Total number of pages at this page size
    #[serde(default)]
    pub total_pages: u32,
    /// The records on this page, in server order
    #[serde(default)]
    pub data: Vec<RawUser>,
}

/// Wrapper the service puts around single-record responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    /// The wrapped record
    pub data: RawUser,
}

/// Outbound body for create and update calls.
///
/// Sent in the store's normalized shape; the service echoes back whatever
/// subset it accepted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPayload {
    /// Full display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role name (`User`, `Admin` or `Manager`)
    pub role: String,
    /// Avatar URL
    pub avatar: String,
}

/// Response to `POST /users`.
///
/// The service may omit any field it did not persist; the client synthesizes
/// the missing ones from its outbound payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreatedUser {
    /// Server-assigned identifier, when echoed
    #[serde(default)]
    pub id: Option<u32>,
    /// Echoed display name
    #[serde(default)]
    pub name: Option<String>,
    /// Echoed email address
    #[serde(default)]
    pub email: Option<String>,
    /// Server-side creation timestamp, when provided
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<String>,
}

/// Response to `PUT /users/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatedUser {
    /// Echoed display name
    #[serde(default)]
    pub name: Option<String>,
    /// Echoed email address
    #[serde(default)]
    pub email: Option<String>,
    /// Echoed role name
    #[serde(default)]
    pub role: Option<String>,
    /// Echoed avatar URL
    #[serde(default)]
    pub avatar: Option<String>,
    /// Server-side update timestamp, when provided
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
}
