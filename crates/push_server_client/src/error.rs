//! Error type returned by the send-endpoint client.

use thiserror::Error;

#[derive(Debug, Error)]
/// Failures surfaced by [`crate::NotificationServerClient`].
pub enum DispatchError {
    /// The server answered with a non-success status or `success: false`.
    ///
    /// Displays as the server's message alone, or the operation's fallback text.
    #[error("{0}")]
    Rejected(String),
    /// The request could not be sent or the response body could not be read.
    #[error("push server request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// A success response whose body is not the expected JSON envelope.
    #[error("push server returned an unreadable response: {0}")]
    Decode(#[from] serde_json::Error),
    /// The configured base URL is not an absolute URL.
    #[error("invalid push server base URL `{url}`: {reason}")]
    InvalidBaseUrl {
        /// The rejected value.
        url: String,
        /// Parser error.
        reason: String,
    },
    /// A required configuration value is missing.
    #[error("missing push server configuration: {0}")]
    MissingConfig(&'static str),
}
