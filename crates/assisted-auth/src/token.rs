//! Access token exchange against Red Hat SSO
//!
//! One POST to the token endpoint per operation. The grant-specific form
//! body comes from `Credential::form_params`; the only field read from the
//! response is `access_token`.

use std::fmt;

use common::Transport;
use reqwest::header::ACCEPT;
use tracing::debug;

use crate::credentials::Credential;
use crate::error::{Error, Result};

/// Opaque bearer token. Short-lived: created for one operation, presented in
/// the `Authorization` header, then discarded.
pub struct AccessToken(String);

impl AccessToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Debug for AccessToken {
    // Token values stay out of logs even though they expire quickly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken([REDACTED])")
    }
}

/// Exchange a credential for a bearer access token.
///
/// POSTs the grant-specific form to `token_url` and extracts `access_token`
/// from the JSON response. Any status other than 200 is a rejection carrying
/// the remote body verbatim; a 200 without an `access_token` field is a
/// malformed response, never an empty token.
pub async fn fetch_access_token(
    transport: &Transport,
    token_url: &str,
    credential: &Credential,
) -> Result<AccessToken> {
    let request = transport
        .post(token_url)
        .header(ACCEPT, "application/json")
        .form(&credential.form_params());

    let response = transport.send(request).await?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::MalformedResponse(format!("reading token response: {e}")))?;

    if status.as_u16() != 200 {
        return Err(Error::Rejected {
            status: status.as_u16(),
            body,
        });
    }

    let value: serde_json::Value = serde_json::from_str(&body)
        .map_err(|e| Error::MalformedResponse(format!("token response is not JSON: {e}")))?;
    let token = value
        .get("access_token")
        .and_then(|token| token.as_str())
        .ok_or_else(|| {
            Error::MalformedResponse("token response has no access_token field".into())
        })?;

    debug!("access token obtained");
    Ok(AccessToken(token.to_owned()))
}
