pub mod credential;
pub mod persist;
mod types;

pub use credential::CredentialStore;
pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Environment variable holding the debrid API token
pub const CREDENTIAL_ENV: &str = "RD_API_KEY";

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    if let Some(path) = find_default_config() {
        return load_config(&path);
    }

    // Return default config if no file found
    let mut config = Config::default();
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config)?;
    Ok(config)
}

/// First existing file among the default config locations
pub fn find_default_config() -> Option<std::path::PathBuf> {
    let default_paths = [
        "./config.toml",
        "./ytsdebrid.toml",
        "~/.config/ytsdebrid/config.toml",
        "/etc/ytsdebrid/config.toml",
    ];

    default_paths
        .iter()
        .map(|p| std::path::PathBuf::from(shellexpand::tilde(p).as_ref()))
        .find(|p| p.exists())
}

/// Overlay process environment settings onto a loaded config.
///
/// `RD_API_KEY` wins over a file-stored token, `PORT` over the configured
/// port, and `YTSDEBRID_ENV` (or `NODE_ENV`) selects the environment.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(CREDENTIAL_ENV).filter(|k| !k.trim().is_empty()) {
        config.debrid.api_key = Some(key);
    }

    if let Some(port) = lookup("PORT") {
        match port.parse() {
            Ok(port) => config.server.port = port,
            Err(_) => tracing::warn!("Ignoring invalid PORT value: {}", port),
        }
    }

    if let Some(env) = lookup("YTSDEBRID_ENV").or_else(|| lookup("NODE_ENV")) {
        match env.parse() {
            Ok(env) => config.environment = env,
            Err(e) => tracing::warn!("{}", e),
        }
    }
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    for (name, url) in [
        ("metadata", &config.metadata.base_url),
        ("debrid", &config.debrid.base_url),
    ] {
        reqwest::Url::parse(url)
            .with_context(|| format!("Invalid {} base_url: {}", name, url))?;
    }

    if config.metadata.page_size == 0 {
        anyhow::bail!("Metadata page_size cannot be 0");
    }

    if config.debrid.max_poll_attempts == 0 {
        anyhow::bail!("Debrid max_poll_attempts must be at least 1");
    }

    if config.debrid.requests_per_minute == 0 {
        anyhow::bail!("Debrid requests_per_minute must be at least 1");
    }

    Ok(())
}
