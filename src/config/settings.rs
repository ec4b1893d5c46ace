//! Stored credentials and user settings
//!
//! Persisted as `config.json` in the config directory with owner-only
//! permissions, since it carries the API token.

use serde::{Deserialize, Serialize};

use super::paths::KeyvaultPaths;
use crate::crypto::SecureString;
use crate::error::KeyvaultError;
use crate::storage::file_io;

/// Environment variable overriding the API base URL
pub const API_URL_ENV: &str = "KEYVAULTIFY_API_URL";

/// API base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000";

/// User settings for keyvault
#[derive(Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// API token (`kvf_...`) saved by `keyvault login`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Preferred API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            token: None,
            api_url: None,
        }
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("schema_version", &self.schema_version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Settings {
    /// Load settings from disk, or default settings if the file doesn't exist
    pub fn load_or_create(paths: &KeyvaultPaths) -> Result<Self, KeyvaultError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Don't save yet - let caller decide when to persist
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| KeyvaultError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| KeyvaultError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk with owner-only permissions
    pub fn save(&self, paths: &KeyvaultPaths) -> Result<(), KeyvaultError> {
        paths.ensure_directories()?;
        file_io::write_private_json_atomic(paths.settings_file(), self)
    }

    /// The stored token, if any
    pub fn token(&self) -> Option<SecureString> {
        self.token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .map(SecureString::from)
    }

    /// Whether a token is stored
    pub fn is_logged_in(&self) -> bool {
        self.token().is_some()
    }

    /// Replace the stored token
    pub fn set_token(&mut self, token: &SecureString) {
        self.token = Some(token.as_str().to_string());
    }

    /// Remove the stored token, returning whether one was present
    pub fn clear_token(&mut self) -> bool {
        let had_token = self.is_logged_in();
        self.token = None;
        had_token
    }

    /// Resolve the API base URL
    ///
    /// `KEYVAULTIFY_API_URL` wins over the stored preference, which wins
    /// over the default.
    pub fn api_url(&self) -> String {
        let env = std::env::var(API_URL_ENV).ok();
        resolve_api_url(env.as_deref(), self.api_url.as_deref())
    }
}

fn resolve_api_url(env: Option<&str>, stored: Option<&str>) -> String {
    env.into_iter()
        .chain(stored)
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .trim_end_matches('/')
        .to_string()
}
