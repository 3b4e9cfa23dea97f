use thiserror::Error;

/// Errors produced by the remote-service layer.
///
/// Every variant is a network-class failure from the store's point of view:
/// recoverable by retrying the action, never fatal to the process.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport or body-decode failure from reqwest.
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered with a non-2xx status code.
    #[error("server responded with HTTP {status}")]
    Status {
        /// HTTP status code returned by the server.
        status: u16,
    },
    /// A well-formed endpoint URL could not be built from the base URL.
    #[error("invalid endpoint URL: {0}")]
    Url(String),
}
