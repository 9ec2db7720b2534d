//! Red Hat SSO constants
//!
//! Public OAuth client configuration for console.redhat.com. These values
//! are not secrets — the secrets are the tokens themselves, which callers
//! pass in wrapped in `common::Secret`.

/// Token endpoint on Red Hat single sign-on.
pub const TOKEN_ENDPOINT: &str =
    "https://sso.redhat.com/auth/realms/redhat-external/protocol/openid-connect/token";

/// Public client id used when exchanging an offline token.
/// Service-account exchanges use the caller's own client id instead.
pub const OFFLINE_TOKEN_CLIENT_ID: &str = "cloud-services";
