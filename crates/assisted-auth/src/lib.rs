//! Red Hat SSO authentication for the Assisted Installer API
//!
//! Converts one of two long-lived credential shapes — an offline refresh
//! token from console.redhat.com, or a service-account client-id/secret
//! pair — into a short-lived bearer access token. Tokens are fetched fresh
//! for every operation and never cached or persisted.
//!
//! This crate is a standalone leaf: the API client depends on it, never the
//! other way around.

pub mod constants;
pub mod credentials;
pub mod error;
pub mod token;

pub use constants::*;
pub use credentials::Credential;
pub use error::{Error, Result};
pub use token::{AccessToken, fetch_access_token};
