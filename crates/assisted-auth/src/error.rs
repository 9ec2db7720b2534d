//! Error types for credential validation and token exchange

/// Errors from building credentials or exchanging them for access tokens.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid or ambiguous credential input; raised before any network call.
    #[error("invalid credentials: {0}")]
    Config(String),

    /// The token endpoint refused the exchange.
    #[error("token endpoint returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The token endpoint answered 200 with an unusable body.
    #[error("malformed token response: {0}")]
    MalformedResponse(String),

    /// Connection-level failure past the transport's retry budget.
    #[error(transparent)]
    Transport(#[from] common::TransportError),
}

/// Result alias for auth operations.
pub type Result<T> = std::result::Result<T, Error>;
