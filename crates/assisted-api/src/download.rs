//! Credentials artifact download with idempotent write semantics
//!
//! The endpoint returns opaque bytes (kubeconfig, kubeadmin password, etc).
//! The destination file is rewritten only when the fetched content differs
//! from what is already on disk, so repeated invocations converge and report
//! `changed = false` once local state matches the remote artifact.

use std::io::ErrorKind;
use std::path::Path;

use assisted_auth::AccessToken;
use common::Transport;
use tracing::debug;

use crate::client::{DownloadRequest, Outcome};
use crate::error::{Error, Result};

pub(crate) async fn run(
    transport: &Transport,
    api_base: &str,
    token: &AccessToken,
    request: &DownloadRequest,
) -> Result<Outcome> {
    let url = format!(
        "{api_base}/v2/clusters/{}/downloads/credentials",
        request.cluster_id
    );
    let http_request = transport
        .get(&url)
        .bearer_auth(token.as_str())
        .query(&[("file_name", request.file_name.as_str())]);

    let response = transport.send(http_request).await?;
    let body = response.bytes().await.map_err(Error::Body)?;

    if looks_like_api_error(&body) {
        return Err(Error::Api {
            body: String::from_utf8_lossy(&body).into_owned(),
        });
    }

    let changed = write_if_changed(&request.dest, &body).await?;

    Ok(Outcome {
        changed,
        access_token: token.as_str().to_owned(),
        result: body.to_vec(),
    })
}

/// Whether a response body is shaped like an Assisted Installer error object:
/// a JSON object carrying a `code` field.
///
/// The download endpoint returns opaque bytes on success, so there is no
/// in-band success marker; this structural check is format-coupled and can
/// in principle misfire on a legitimate artifact that happens to parse as
/// such an object. Replace with a status-code check if the API grows one.
fn looks_like_api_error(body: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.as_object().map(|object| object.contains_key("code")))
        .unwrap_or(false)
}

/// Compare-and-write: rewrite `dest` only when `content` differs from what
/// is already there. Returns whether the file was touched. A missing file
/// counts as "no current content"; any other read or write failure is fatal.
async fn write_if_changed(dest: &Path, content: &[u8]) -> Result<bool> {
    let current = match tokio::fs::read(dest).await {
        Ok(bytes) => Some(bytes),
        Err(e) if e.kind() == ErrorKind::NotFound => None,
        Err(e) => {
            return Err(Error::Io {
                path: dest.to_owned(),
                source: e,
            });
        }
    };

    if current.as_deref() == Some(content) {
        debug!(path = %dest.display(), "destination already up to date");
        return Ok(false);
    }

    tokio::fs::write(dest, content).await.map_err(|e| Error::Io {
        path: dest.to_owned(),
        source: e,
    })?;
    Ok(true)
}
