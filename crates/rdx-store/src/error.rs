use rdx_api::ApiError;
use thiserror::Error;

use crate::validation::FieldErrors;

/// Errors returned by directory store actions.
///
/// Every variant is recoverable by retrying the action; nothing here is
/// fatal to the process.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Input failed schema validation. Carries one message per offending
    /// field; state was not touched and no request was made.
    #[error("validation failed: {}", summarize_fields(.0))]
    Validation(FieldErrors),

    /// The remote call failed. For optimistic mutations the pre-mutation
    /// snapshot has been restored.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// A fetched server record did not satisfy the schema.
    #[error("invalid record in server response: {reason}")]
    BadRecord {
        /// What failed validation, field by field.
        reason: String,
    },
}

impl StoreError {
    /// The per-field messages when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Join field errors as `field: message; field: message`.
pub(crate) fn summarize_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("{field}: {message}"))
        .collect::<Vec<_>>()
        .join("; ")
}
