use std::fmt;
use std::str::FromStr;

use rdx_api::{RawUser, UserPayload};
use serde::{Deserialize, Serialize};

use crate::validation;

/// Avatar shown for records without a usable avatar URL.
pub const DEFAULT_AVATAR_URL: &str = "https://via.placeholder.com/50";

/// First id handed out to locally created records.
///
/// Server ids are small integers, so ids at or above this base do not collide
/// with them in the common case. They are NOT unique across sessions; a
/// record keeps its temporary id only until the server confirms the create.
pub const LOCAL_ID_BASE: u32 = 1 << 30;

/// Access level of a directory user.
///
/// The remote service has no role field; fetched records default to `User`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Regular directory member
    #[default]
    User,
    /// Full administrative access
    Admin,
    /// Can manage users but not admins
    Manager,
}

impl Role {
    /// The canonical spelling used on the wire and in search.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
            Self::Manager => "Manager",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            other => Err(format!(
                "unknown role '{other}' (expected User, Admin or Manager)"
            )),
        }
    }
}

/// A user record in the client's normalized shape.
///
/// Invariant: every record held in directory state passes
/// [`validation::validate_record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// Server-assigned id, or a temporary local id for optimistic creates
    pub id: u32,
    /// Full display name, at least two characters
    pub name: String,
    /// Email address
    pub email: String,
    /// Role, defaulted to `User` for fetched records
    #[serde(default)]
    pub role: Role,
    /// Avatar URL, always valid (falls back to [`DEFAULT_AVATAR_URL`])
    #[serde(default = "default_avatar")]
    pub avatar: String,
    /// Set while the record has local changes the server has not confirmed.
    /// Flagged records survive a refetch of their page.
    #[serde(default)]
    pub locally_modified: bool,
}

fn default_avatar() -> String {
    DEFAULT_AVATAR_URL.to_string()
}

impl UserRecord {
    /// Normalize a raw server record into the client shape.
    ///
    /// Joins `first_name`/`last_name` into one name, defaults the role, and
    /// replaces a missing or malformed avatar URL with the placeholder.
    pub fn from_raw(raw: RawUser) -> Self {
        let name = format!("{} {}", raw.first_name.trim(), raw.last_name.trim())
            .trim()
            .to_string();
        let avatar = if validation::is_valid_url(&raw.avatar) {
            raw.avatar
        } else {
            DEFAULT_AVATAR_URL.to_string()
        };

        Self {
            id: raw.id,
            name,
            email: raw.email,
            role: Role::default(),
            avatar,
            locally_modified: false,
        }
    }

    /// The outbound wire payload for this record.
    pub fn payload(&self) -> UserPayload {
        UserPayload {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role.to_string(),
            avatar: self.avatar.clone(),
        }
    }

    /// Whether this record still carries a temporary local id.
    pub const fn has_local_id(&self) -> bool {
        self.id >= LOCAL_ID_BASE
    }
}

/// Input for creating a user: a record without a server id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDraft {
    /// Full display name
    pub name: String,
    /// Email address
    pub email: String,
    /// Role, defaults to `User`
    #[serde(default)]
    pub role: Role,
    /// Avatar URL; `None` or empty falls back to the placeholder
    #[serde(default)]
    pub avatar: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(first: &str, last: &str, avatar: &str) -> RawUser {
        RawUser {
            id: 7,
            email: "michael.lawson@reqres.in".to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            avatar: avatar.to_string(),
        }
    }

    #[test]
    fn test_from_raw_joins_names_and_defaults_role() {
        let record = UserRecord::from_raw(raw("Michael", "Lawson", "https://reqres.in/img/faces/7-image.jpg"));
        assert_eq!(record.name, "Michael Lawson");
        assert_eq!(record.role, Role::User);
        assert_eq!(record.avatar, "https://reqres.in/img/faces/7-image.jpg");
        assert!(!record.locally_modified);
    }

    #[test]
    fn test_from_raw_defaults_missing_or_bad_avatar() {
        assert_eq!(UserRecord::from_raw(raw("A", "B", "")).avatar, DEFAULT_AVATAR_URL);
        assert_eq!(
            UserRecord::from_raw(raw("A", "B", "not a url")).avatar,
            DEFAULT_AVATAR_URL
        );
    }

    #[test]
    fn test_role_round_trips_through_strings() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert_eq!("Manager".parse::<Role>(), Ok(Role::Manager));
        assert_eq!(Role::User.to_string(), "User");
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_local_id_detection() {
        let mut record = UserRecord::from_raw(raw("A", "B", ""));
        assert!(!record.has_local_id());
        record.id = LOCAL_ID_BASE;
        assert!(record.has_local_id());
    }
}
