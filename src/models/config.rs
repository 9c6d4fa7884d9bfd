//! Configuration model loaded from external sources.

use serde::Deserialize;

#[derive(Clone, Debug, Deserialize)]
/// Basic configuration shared across handlers.
pub struct ServerConfig {
    pub domain: String,
    pub address: String,
    pub port: u16,
    pub templates_dir: String,
    /// Root directory for uploaded volunteer documents.
    pub upload_dir: String,
    /// Signs session cookies, flash messages and session tokens.
    pub secret: String,
    #[serde(default = "default_session_ttl_hours")]
    pub session_ttl_hours: u64,
    pub backend: BackendConfig,
}

#[derive(Clone, Debug, Deserialize)]
/// Connection settings of the hosted backend.
pub struct BackendConfig {
    /// Project URL without the `/rest/v1` suffix.
    pub url: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_session_ttl_hours() -> u64 {
    24
}

fn default_timeout_secs() -> u64 {
    30
}
