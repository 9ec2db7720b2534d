//! Client facade: one fresh token exchange plus one API call per operation
//!
//! The token-fetch path is shared by both operations instead of being
//! duplicated per call site. There is no token cache: every operation pays
//! for its own exchange, which is fine at this call volume.

use std::path::PathBuf;

use assisted_auth::{Credential, fetch_access_token};
use common::Transport;
use tracing::info;

use crate::error::{Error, Result};
use crate::{download, install_config};

/// Production base URL of the Assisted Installer service.
pub const API_BASE: &str = "https://api.openshift.com/api/assisted-install";

/// Request to materialize one named credentials artifact at a local path.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    pub cluster_id: String,
    /// Name of the credential file on the API side (e.g. `kubeconfig`).
    pub file_name: String,
    pub dest: PathBuf,
}

/// Request to merge fields into a cluster's install configuration.
///
/// `install_config_params` is a JSON document as a string, relayed to the
/// API without local validation.
#[derive(Debug, Clone)]
pub struct PatchRequest {
    pub cluster_id: String,
    pub install_config_params: String,
}

/// Result of one operation.
///
/// `changed` is meaningful for downloads only: it reports whether the
/// destination file was created or rewritten. Patches always report `false`.
/// The access token is included for caller-side diagnostics; it is
/// short-lived and already spent by the time the outcome is returned.
#[derive(Debug)]
pub struct Outcome {
    pub changed: bool,
    pub access_token: String,
    pub result: Vec<u8>,
}

/// Assisted Installer API client.
///
/// Owns the pooled transport and the two endpoint URLs. No state is shared
/// between operations beyond connection reuse, so a `Client` is freely
/// cloneable and each operation is a self-contained call chain.
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    token_url: String,
    api_base: String,
}

impl Client {
    /// Client against the production endpoints.
    pub fn new() -> Self {
        Self::with_endpoints(assisted_auth::TOKEN_ENDPOINT, API_BASE)
    }

    /// Client against explicit endpoints (tests, alternate deployments).
    pub fn with_endpoints(token_url: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            transport: Transport::new(),
            token_url: token_url.into(),
            api_base: api_base.into(),
        }
    }

    /// Download a credentials artifact and write it to the request's
    /// destination path if the content differs from what is already there.
    pub async fn download_credentials(
        &self,
        credential: &Credential,
        request: &DownloadRequest,
    ) -> Result<Outcome> {
        ensure_cluster_id(&request.cluster_id)?;
        let token = fetch_access_token(&self.transport, &self.token_url, credential).await?;
        let outcome = download::run(&self.transport, &self.api_base, &token, request).await?;
        info!(
            cluster_id = %request.cluster_id,
            file_name = %request.file_name,
            changed = outcome.changed,
            "credentials download complete"
        );
        Ok(outcome)
    }

    /// Patch a cluster's install configuration.
    pub async fn patch_install_config(
        &self,
        credential: &Credential,
        request: &PatchRequest,
    ) -> Result<Outcome> {
        ensure_cluster_id(&request.cluster_id)?;
        let token = fetch_access_token(&self.transport, &self.token_url, credential).await?;
        let outcome = install_config::run(&self.transport, &self.api_base, &token, request).await?;
        info!(cluster_id = %request.cluster_id, "install-config patch applied");
        Ok(outcome)
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

fn ensure_cluster_id(cluster_id: &str) -> Result<()> {
    if cluster_id.is_empty() {
        return Err(Error::Config("cluster_id must not be empty".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::body::Bytes;
    use axum::http::StatusCode;
    use axum::routing::{get, patch, post};

    async fn spawn(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, router).await.unwrap() });
        format!("http://{addr}")
    }

    /// Router with a token endpoint that always succeeds.
    fn with_token_route(router: Router) -> Router {
        router.route(
            "/token",
            post(|| async { r#"{"access_token":"tok-test"}"# }),
        )
    }

    fn client_for(base: &str) -> Client {
        Client::with_endpoints(format!("{base}/token"), base)
    }

    fn offline_credential() -> Credential {
        Credential::offline_token("offline-tok").unwrap()
    }

    #[tokio::test]
    async fn download_is_idempotent_across_calls() {
        let payload: Arc<Mutex<Vec<u8>>> = Arc::new(Mutex::new(b"kubeconfig-v1".to_vec()));
        let serving = payload.clone();
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/downloads/credentials",
            get(move || {
                let serving = serving.clone();
                async move { serving.lock().unwrap().clone() }
            }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);
        let credential = offline_credential();
        let dir = tempfile::tempdir().unwrap();
        let request = DownloadRequest {
            cluster_id: "c-1".into(),
            file_name: "kubeconfig".into(),
            dest: dir.path().join("kubeconfig"),
        };

        // First call: file absent, must be created
        let first = client
            .download_credentials(&credential, &request)
            .await
            .unwrap();
        assert!(first.changed);
        assert_eq!(first.access_token, "tok-test");
        assert_eq!(std::fs::read(&request.dest).unwrap(), b"kubeconfig-v1");

        // Second call, same remote content: file untouched
        let second = client
            .download_credentials(&credential, &request)
            .await
            .unwrap();
        assert!(!second.changed);
        assert_eq!(std::fs::read(&request.dest).unwrap(), b"kubeconfig-v1");

        // Third call, remote content rotated: file rewritten
        *payload.lock().unwrap() = b"kubeconfig-v2".to_vec();
        let third = client
            .download_credentials(&credential, &request)
            .await
            .unwrap();
        assert!(third.changed);
        assert_eq!(std::fs::read(&request.dest).unwrap(), b"kubeconfig-v2");
    }

    #[tokio::test]
    async fn download_sends_bearer_and_file_name() {
        let seen: Arc<Mutex<Option<(String, String)>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/downloads/credentials",
            get(move |request: axum::extract::Request| {
                let captured = captured.clone();
                async move {
                    let auth = request
                        .headers()
                        .get("authorization")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_owned();
                    let query = request.uri().query().unwrap_or_default().to_owned();
                    *captured.lock().unwrap() = Some((auth, query));
                    "artifact-bytes"
                }
            }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);
        let dir = tempfile::tempdir().unwrap();
        let request = DownloadRequest {
            cluster_id: "c-1".into(),
            file_name: "kubeadmin-password".into(),
            dest: dir.path().join("pw"),
        };

        client
            .download_credentials(&offline_credential(), &request)
            .await
            .unwrap();

        let (auth, query) = seen.lock().unwrap().clone().unwrap();
        assert_eq!(auth, "Bearer tok-test");
        assert_eq!(query, "file_name=kubeadmin-password");
    }

    #[tokio::test]
    async fn download_error_shaped_body_is_failure() {
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/downloads/credentials",
            get(|| async { r#"{"code":"404","reason":"cluster not found"}"# }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("kubeconfig");
        let request = DownloadRequest {
            cluster_id: "missing".into(),
            file_name: "kubeconfig".into(),
            dest: dest.clone(),
        };

        let err = client
            .download_credentials(&offline_credential(), &request)
            .await
            .unwrap_err();

        match err {
            Error::Api { body } => assert!(body.contains("cluster not found"), "got: {body}"),
            other => panic!("expected Api, got {other:?}"),
        }
        assert!(!dest.exists(), "no file may be written on API failure");
    }

    #[tokio::test]
    async fn token_rejection_stops_before_cluster_api() {
        let api_calls = Arc::new(AtomicU32::new(0));
        let download_calls = api_calls.clone();
        let patch_calls = api_calls.clone();
        let app = Router::new()
            .route(
                "/token",
                post(|| async { (StatusCode::UNAUTHORIZED, r#"{"error":"invalid_grant"}"#) }),
            )
            .route(
                "/v2/clusters/{cluster_id}/downloads/credentials",
                get(move || {
                    let calls = download_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        "unreachable"
                    }
                }),
            )
            .route(
                "/v2/clusters/{cluster_id}/install-config",
                patch(move || {
                    let calls = patch_calls.clone();
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        ""
                    }
                }),
            );
        let base = spawn(app).await;
        let client = client_for(&base);
        let credential = offline_credential();
        let dir = tempfile::tempdir().unwrap();

        let err = client
            .download_credentials(
                &credential,
                &DownloadRequest {
                    cluster_id: "c-1".into(),
                    file_name: "kubeconfig".into(),
                    dest: dir.path().join("kubeconfig"),
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::Auth(assisted_auth::Error::Rejected { status: 401, .. })
            ),
            "got {err:?}"
        );

        let err = client
            .patch_install_config(
                &credential,
                &PatchRequest {
                    cluster_id: "c-1".into(),
                    install_config_params: r#"{"fips":true}"#.into(),
                },
            )
            .await
            .unwrap_err();
        assert!(
            matches!(
                err,
                Error::Auth(assisted_auth::Error::Rejected { status: 401, .. })
            ),
            "got {err:?}"
        );

        assert_eq!(
            api_calls.load(Ordering::SeqCst),
            0,
            "cluster API must not be called when the token exchange fails"
        );
    }

    #[tokio::test]
    async fn patch_accepts_trivial_body() {
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/install-config",
            patch(|| async { "" }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);

        let outcome = client
            .patch_install_config(
                &offline_credential(),
                &PatchRequest {
                    cluster_id: "c-1".into(),
                    install_config_params: r#"{"fips":true}"#.into(),
                },
            )
            .await
            .unwrap();

        assert!(!outcome.changed, "patches always report changed = false");
        assert!(outcome.result.is_empty());
    }

    #[tokio::test]
    async fn patch_surfaces_long_body_verbatim() {
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/install-config",
            patch(|| async { r#"{"error":"bad field"}"# }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);

        let err = client
            .patch_install_config(
                &offline_credential(),
                &PatchRequest {
                    cluster_id: "c-1".into(),
                    install_config_params: r#"{"fips":true}"#.into(),
                },
            )
            .await
            .unwrap_err();

        match err {
            Error::Api { body } => assert_eq!(body, r#"{"error":"bad field"}"#),
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn patch_body_is_double_encoded() {
        let seen: Arc<Mutex<Option<Vec<u8>>>> = Arc::new(Mutex::new(None));
        let captured = seen.clone();
        let app = with_token_route(Router::new().route(
            "/v2/clusters/{cluster_id}/install-config",
            patch(move |body: Bytes| {
                let captured = captured.clone();
                async move {
                    *captured.lock().unwrap() = Some(body.to_vec());
                    ""
                }
            }),
        ));
        let base = spawn(app).await;
        let client = client_for(&base);

        client
            .patch_install_config(
                &offline_credential(),
                &PatchRequest {
                    cluster_id: "c-1".into(),
                    install_config_params: r#"{"fips":true}"#.into(),
                },
            )
            .await
            .unwrap();

        // The caller's JSON object goes on the wire as a JSON string literal.
        assert_eq!(
            seen.lock().unwrap().clone().unwrap(),
            br#""{\"fips\":true}""#.to_vec()
        );
    }

    #[tokio::test]
    async fn empty_cluster_id_makes_no_network_calls() {
        let token_calls = Arc::new(AtomicU32::new(0));
        let calls = token_calls.clone();
        let app = Router::new().route(
            "/token",
            post(move || {
                let calls = calls.clone();
                async move {
                    calls.fetch_add(1, Ordering::SeqCst);
                    r#"{"access_token":"tok-test"}"#
                }
            }),
        );
        let base = spawn(app).await;
        let client = client_for(&base);
        let dir = tempfile::tempdir().unwrap();

        let err = client
            .download_credentials(
                &offline_credential(),
                &DownloadRequest {
                    cluster_id: String::new(),
                    file_name: "kubeconfig".into(),
                    dest: dir.path().join("kubeconfig"),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Config(_)), "got {err:?}");
        assert_eq!(token_calls.load(Ordering::SeqCst), 0);
    }
}
