//! Storage for the debrid API token.
//!
//! In development the token is written back into the config file. In
//! production it is held in memory only; the process environment is read once
//! at startup and never written.

use super::{persist, Environment};
use anyhow::Result;
use parking_lot::RwLock;
use std::path::PathBuf;

pub struct CredentialStore {
    environment: Environment,
    config_path: PathBuf,
    current: RwLock<Option<String>>,
}

impl CredentialStore {
    pub fn new(environment: Environment, config_path: PathBuf, initial: Option<String>) -> Self {
        Self {
            environment,
            config_path,
            current: RwLock::new(normalize(initial)),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.current.read().clone()
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Replace the stored token. `None` or a blank token clears it.
    pub fn set(&self, api_key: Option<String>) -> Result<()> {
        let api_key = normalize(api_key);

        if self.environment == Environment::Development {
            persist::update_debrid_key(&self.config_path, api_key.as_deref())?;
        }

        tracing::info!(
            environment = ?self.environment,
            configured = api_key.is_some(),
            "Debrid credential updated"
        );
        *self.current.write() = api_key;
        Ok(())
    }
}

fn normalize(api_key: Option<String>) -> Option<String> {
    api_key
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
}
