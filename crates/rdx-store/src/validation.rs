use std::collections::BTreeMap;

use validator::{ValidateEmail, ValidateUrl};

use crate::model::{UserDraft, UserRecord};

/// Field name mapped to a human-readable message, in stable field order.
pub type FieldErrors = BTreeMap<String, String>;

/// Minimum accepted name length, in characters.
pub const NAME_MIN_CHARS: usize = 2;
/// Maximum accepted name length, in characters.
pub const NAME_MAX_CHARS: usize = 100;

/// Validate a display name.
pub fn validate_name(name: &str) -> Result<(), String> {
    let trimmed = name.trim();

    if trimmed.chars().count() < NAME_MIN_CHARS {
        return Err(format!(
            "Name must be at least {NAME_MIN_CHARS} characters long"
        ));
    }

    if trimmed.chars().count() > NAME_MAX_CHARS {
        return Err(format!(
            "Name must be at most {NAME_MAX_CHARS} characters long"
        ));
    }

    Ok(())
}

/// Validate email format using the validator crate.
pub fn validate_email(email: &str) -> Result<(), String> {
    if email.trim().is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    if !email.validate_email() {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate an avatar URL.
pub fn validate_avatar_url(url: &str) -> Result<(), String> {
    if !url.validate_url() {
        return Err("Avatar must be a valid URL".to_string());
    }

    Ok(())
}

/// Whether `url` is non-empty and parses as a URL.
///
/// Used on the fetch path, where a bad avatar is defaulted rather than
/// rejected.
pub fn is_valid_url(url: &str) -> bool {
    !url.is_empty() && url.validate_url()
}

/// Validate a create draft, collecting one message per offending field.
///
/// A failed draft must not reach state or the network.
pub fn validate_draft(draft: &UserDraft) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Err(message) = validate_name(&draft.name) {
        errors.insert("name".to_string(), message);
    }
    if let Err(message) = validate_email(&draft.email) {
        errors.insert("email".to_string(), message);
    }
    if let Some(avatar) = draft.avatar.as_deref()
        && !avatar.trim().is_empty()
        && let Err(message) = validate_avatar_url(avatar)
    {
        errors.insert("avatar".to_string(), message);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Validate a full record against the schema every stored record satisfies.
pub fn validate_record(record: &UserRecord) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Err(message) = validate_name(&record.name) {
        errors.insert("name".to_string(), message);
    }
    if let Err(message) = validate_email(&record.email) {
        errors.insert("email".to_string(), message);
    }
    if let Err(message) = validate_avatar_url(&record.avatar) {
        errors.insert("avatar".to_string(), message);
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Ann Lee").is_ok());
        assert!(validate_name("Bo").is_ok());
        assert!(validate_name("  Bo  ").is_ok());

        assert!(validate_name("A").is_err());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"x".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("user@example.com").is_ok());
        assert!(validate_email("user+tag@example.co.uk").is_ok());

        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn test_validate_avatar_url() {
        assert!(validate_avatar_url("https://example.com/a.png").is_ok());
        assert!(validate_avatar_url("http://example.com/a.png").is_ok());

        assert!(validate_avatar_url("").is_err());
        assert!(validate_avatar_url("not a url").is_err());
    }

    #[test]
    fn test_validate_draft_collects_field_errors() {
        let draft = UserDraft {
            name: "A".to_string(),
            email: "not-an-email".to_string(),
            role: Role::User,
            avatar: Some("nope".to_string()),
        };

        let errors = validate_draft(&draft).expect_err("draft should be invalid");
        assert_eq!(errors.len(), 3);
        assert!(errors.contains_key("name"));
        assert!(errors.contains_key("email"));
        assert!(errors.contains_key("avatar"));
    }

    #[test]
    fn test_validate_draft_accepts_missing_avatar() {
        let draft = UserDraft {
            name: "Ann Lee".to_string(),
            email: "ann@x.com".to_string(),
            role: Role::Admin,
            avatar: None,
        };

        assert!(validate_draft(&draft).is_ok());
    }
}
