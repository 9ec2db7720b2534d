//! Error types for the Assisted Installer API operations

use std::path::PathBuf;

/// Errors from the two API operations.
///
/// Auth and transport failures are wrapped via `#[from]` so a caller matches
/// one enum across the whole token-then-call sequence.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid request input; raised before any network call.
    #[error("invalid request: {0}")]
    Config(String),

    /// Credential validation or token exchange failed.
    #[error(transparent)]
    Auth(#[from] assisted_auth::Error),

    /// Connection-level failure past the retry budget during the API call.
    #[error(transparent)]
    Transport(#[from] common::TransportError),

    /// The API indicated failure; carries the raw response body.
    #[error("API request failed: {body}")]
    Api { body: String },

    /// Reading the response body failed mid-stream.
    #[error("reading API response: {0}")]
    Body(#[source] reqwest::Error),

    /// Local read/write failure at the download destination.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Re-encoding the install-config overrides failed.
    #[error("encoding install-config overrides: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result alias for API operations.
pub type Result<T> = std::result::Result<T, Error>;
