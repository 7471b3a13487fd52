use std::time::Duration;

use reqwest::header::HeaderMap;

/// Header added to every fetch issued by this engine so intermediary caches
/// and service layers can distinguish it from a passive page-driven fetch.
pub const MARKER_HEADER: &str = "x-snapshot-fetch";

/// Marker value for the manifest fetch.
pub const MARKER_MANIFEST: &str = "manifest";

/// Marker value for resource fetches inside a snapshot build.
pub const MARKER_RESOURCE: &str = "resource";

const DEFAULT_USER_AGENT: &str = "offsnap-engine/0.1";

/// Configurable options for the engine's HTTP fetches.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Overall timeout for an entire HTTP request
    pub timeout: Duration,

    /// Connection timeout (time to establish initial connection)
    pub connect_timeout: Duration,

    /// User agent string
    pub user_agent: String,

    /// Credential headers (cookies, authorization) forwarded on every
    /// manifest and resource fetch
    pub credential_headers: HeaderMap,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            credential_headers: HeaderMap::new(),
        }
    }
}

impl EngineConfig {
    pub fn builder() -> crate::builder::EngineConfigBuilder {
        crate::builder::EngineConfigBuilder::new()
    }
}
