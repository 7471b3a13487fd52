//! # Resource Fetch Adapter
//!
//! Single-retrieval HTTP fetches with the engine's fixed credential and
//! redirect policy: credential headers are forwarded on every request, a
//! marker header distinguishes engine fetches from passive page fetches, and
//! redirects are never followed automatically (the redirect response itself is
//! the behavior boundary that gets classified and cached).

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, redirect};
use tracing::debug;
use url::Url;

use crate::config::{MARKER_HEADER, MARKER_MANIFEST, MARKER_RESOURCE};
use crate::error::{EngineError, FetchError};
use crate::EngineConfig;

/// Create a reqwest Client with the provided configuration.
///
/// Redirects are handled manually for both manifest and resource fetches; a
/// redirected manifest fetch surfaces as a non-success status.
pub fn create_client(config: &EngineConfig) -> Result<Client, EngineError> {
    let mut client_builder = Client::builder()
        .user_agent(&config.user_agent)
        .default_headers(config.credential_headers.clone())
        .redirect(redirect::Policy::none());

    if !config.timeout.is_zero() {
        client_builder = client_builder.timeout(config.timeout);
    }

    if !config.connect_timeout.is_zero() {
        client_builder = client_builder.connect_timeout(config.connect_timeout);
    }

    client_builder.build().map_err(EngineError::from)
}

/// A fully-buffered response from a single resource fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedResponse {
    /// Numeric HTTP status code
    pub status: u16,
    /// Response headers as received, order preserved
    pub headers: Vec<(String, String)>,
    /// Response body bytes
    pub body: Bytes,
}

impl FetchedResponse {
    /// Whether the status is a 2xx success.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// First header value with the given name, case-insensitive.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether the response carries a `Cache-Control: no-store` directive.
    pub fn cache_control_no_store(&self) -> bool {
        self.header("cache-control")
            .map(|value| {
                value
                    .split(',')
                    .any(|directive| directive.trim().eq_ignore_ascii_case("no-store"))
            })
            .unwrap_or(false)
    }
}

/// Seam for the engine's two kinds of network retrieval.
#[async_trait]
pub trait ResourceFetch: Send + Sync {
    /// Fetch manifest text. Any non-success status (redirects included, since
    /// they are not followed) is unrecoverable for the resolution cycle.
    async fn fetch_manifest(&self, url: &Url) -> Result<String, EngineError>;

    /// Fetch a single resource. Network-level failures are returned as
    /// [`FetchError`] for the retention policy to classify; any response,
    /// whatever its status, is returned as `Ok`.
    async fn fetch_resource(&self, url: &Url) -> Result<FetchedResponse, FetchError>;
}

/// HTTP fetcher backed by a shared reqwest client.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &EngineConfig) -> Result<Self, EngineError> {
        Ok(Self {
            client: create_client(config)?,
        })
    }
}

#[async_trait]
impl ResourceFetch for HttpFetcher {
    async fn fetch_manifest(&self, url: &Url) -> Result<String, EngineError> {
        let response = self
            .client
            .get(url.clone())
            .header(MARKER_HEADER, MARKER_MANIFEST)
            .send()
            .await?;

        let status = response.status();
        debug!(url = %url, status = %status, "manifest fetch completed");

        if !status.is_success() {
            return Err(EngineError::ManifestFetch {
                url: url.to_string(),
                status,
            });
        }

        response.text().await.map_err(EngineError::from)
    }

    async fn fetch_resource(&self, url: &Url) -> Result<FetchedResponse, FetchError> {
        let response = self
            .client
            .get(url.clone())
            .header(MARKER_HEADER, MARKER_RESOURCE)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await?;

        debug!(url = %url, status = status, bytes = body.len(), "resource fetch completed");

        Ok(FetchedResponse {
            status,
            headers,
            body,
        })
    }
}
