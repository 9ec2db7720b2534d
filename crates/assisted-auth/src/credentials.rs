//! Credential model for the two supported OAuth2 grants
//!
//! Exactly one shape is valid per request: an offline refresh token, or a
//! service-account client-id/client-secret pair. Constructors reject empty
//! or ambiguous input, so a `Credential` that exists is always usable for a
//! token exchange — the both-present and neither-present cases fail here,
//! before any network activity.

use common::Secret;

use crate::constants::OFFLINE_TOKEN_CLIENT_ID;
use crate::error::{Error, Result};

/// A long-lived credential exchangeable for a short-lived access token.
#[derive(Debug, Clone)]
pub enum Credential {
    /// Offline refresh token from console.redhat.com (`grant_type=refresh_token`).
    OfflineToken(Secret),
    /// Service-account pair (`grant_type=client_credentials`).
    ClientCredentials {
        client_id: String,
        client_secret: Secret,
    },
}

impl Credential {
    /// Build from an offline token. Empty input is a config error.
    pub fn offline_token(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.is_empty() {
            return Err(Error::Config("offline token must not be empty".into()));
        }
        Ok(Self::OfflineToken(Secret::new(token)))
    }

    /// Build from a client-id/client-secret pair. Either half missing is a
    /// config error.
    pub fn client_credentials(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Result<Self> {
        let client_id = client_id.into();
        let client_secret = client_secret.into();
        if client_id.is_empty() || client_secret.is_empty() {
            return Err(Error::Config(
                "client id and client secret must both be provided".into(),
            ));
        }
        Ok(Self::ClientCredentials {
            client_id,
            client_secret: Secret::new(client_secret),
        })
    }

    /// Build from optional caller inputs, enforcing that exactly one shape
    /// is present. Empty strings count as absent.
    pub fn from_parts(
        offline_token: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
    ) -> Result<Self> {
        let offline_token = offline_token.filter(|t| !t.is_empty());
        let client_id = client_id.filter(|id| !id.is_empty());
        let client_secret = client_secret.filter(|s| !s.is_empty());

        match (offline_token, client_id, client_secret) {
            (Some(token), None, None) => Self::offline_token(token),
            (None, Some(id), Some(secret)) => Self::client_credentials(id, secret),
            _ => Err(Error::Config(
                "provide either an offline token or both client id and secret".into(),
            )),
        }
    }

    /// Form fields for the token exchange.
    ///
    /// Field order is significant: it is preserved verbatim on the wire and
    /// pinned by tests.
    pub fn form_params(&self) -> [(&'static str, &str); 3] {
        match self {
            Self::OfflineToken(token) => [
                ("grant_type", "refresh_token"),
                ("client_id", OFFLINE_TOKEN_CLIENT_ID),
                ("refresh_token", token.as_str()),
            ],
            Self::ClientCredentials {
                client_id,
                client_secret,
            } => [
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
            ],
        }
    }
}
