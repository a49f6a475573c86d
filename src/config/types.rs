use serde::{Deserialize, Serialize};
use std::time::Duration;
use ytsdebrid_common::CacheHints;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub environment: Environment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub metadata: MetadataConfig,

    #[serde(default)]
    pub debrid: DebridConfig,

    #[serde(default)]
    pub cache_hints: CacheHintsConfig,
}

/// Deployment environment; decides where the debrid credential is stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Credential is written back to the config file
    #[default]
    Development,
    /// Credential is kept in memory only
    Production,
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" | "test" => Ok(Self::Development),
            _ => Err(format!("Unknown environment: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Base URL of the metadata provider
    #[serde(default = "default_metadata_url")]
    pub base_url: String,

    /// How long raw metadata responses stay cached (default: 5 days)
    #[serde(default = "default_metadata_ttl")]
    pub cache_ttl_secs: u64,

    /// Outbound request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Items per catalog page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_metadata_url() -> String {
    "https://yts.mx".to_string()
}

fn default_metadata_ttl() -> u64 {
    432_000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_page_size() -> u32 {
    50
}

impl MetadataConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_metadata_url(),
            cache_ttl_secs: default_metadata_ttl(),
            request_timeout_secs: default_request_timeout(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DebridConfig {
    /// Base URL of the debrid REST API
    #[serde(default = "default_debrid_url")]
    pub base_url: String,

    /// API token; conversion is disabled when unset or empty
    #[serde(default)]
    pub api_key: Option<String>,

    /// Check the token with the provider before each conversion (default: true)
    #[serde(default = "default_verify_credential")]
    pub verify_credential: bool,

    /// Delay between job status polls
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Status polls before a job is given up on
    #[serde(default = "default_max_poll_attempts")]
    pub max_poll_attempts: u32,

    /// Outbound request timeout
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Outbound request budget shared by all conversions
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: u32,
}

fn default_debrid_url() -> String {
    "https://api.real-debrid.com/rest/1.0".to_string()
}

fn default_verify_credential() -> bool {
    true
}

fn default_poll_interval() -> u64 {
    2000
}

fn default_max_poll_attempts() -> u32 {
    10
}

fn default_requests_per_minute() -> u32 {
    250
}

impl DebridConfig {
    /// The configured token, if any and non-blank.
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for DebridConfig {
    fn default() -> Self {
        Self {
            base_url: default_debrid_url(),
            api_key: None,
            verify_credential: default_verify_credential(),
            poll_interval_ms: default_poll_interval(),
            max_poll_attempts: default_max_poll_attempts(),
            request_timeout_secs: default_request_timeout(),
            requests_per_minute: default_requests_per_minute(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheHintsConfig {
    /// Client cache lifetime for addon responses (default: 1.5 days)
    #[serde(default = "default_max_age")]
    pub max_age_secs: u64,

    /// How long clients may serve stale responses on error (default: ~6 months)
    #[serde(default = "default_stale_error")]
    pub stale_error_secs: u64,
}

fn default_max_age() -> u64 {
    CacheHints::default().max_age.as_secs()
}

fn default_stale_error() -> u64 {
    CacheHints::default().stale_error.as_secs()
}

impl CacheHintsConfig {
    pub fn hints(&self) -> CacheHints {
        CacheHints {
            max_age: Duration::from_secs(self.max_age_secs),
            stale_error: Duration::from_secs(self.stale_error_secs),
        }
    }
}

impl Default for CacheHintsConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age(),
            stale_error_secs: default_stale_error(),
        }
    }
}
