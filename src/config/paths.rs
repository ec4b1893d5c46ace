//! Path management for keyvault
//!
//! ## Path Resolution Order
//!
//! 1. `KEYVAULTIFY_CONFIG_DIR` environment variable (if set)
//! 2. `~/.keyvaultify` in the user's home directory
//!
//! The debug log lives in the config directory unless
//! `KEYVAULTIFY_LOG_FILE` points elsewhere.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::error::KeyvaultError;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "KEYVAULTIFY_CONFIG_DIR";

/// Environment variable overriding the debug log location
pub const LOG_FILE_ENV: &str = "KEYVAULTIFY_LOG_FILE";

/// Directory name used both globally and per project
pub const DIR_NAME: &str = ".keyvaultify";

/// Manages all paths used by keyvault
#[derive(Debug, Clone)]
pub struct KeyvaultPaths {
    /// Base directory for global keyvault files
    base_dir: PathBuf,

    /// Explicit debug log location, if overridden
    log_file: Option<PathBuf>,
}

impl KeyvaultPaths {
    /// Resolve paths from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no override is set and the home directory cannot
    /// be determined.
    pub fn new() -> Result<Self, KeyvaultError> {
        let base_dir = match non_empty_env(CONFIG_DIR_ENV) {
            Some(custom) => PathBuf::from(custom),
            None => resolve_default_path()?,
        };

        Ok(Self {
            base_dir,
            log_file: non_empty_env(LOG_FILE_ENV).map(PathBuf::from),
        })
    }

    /// Create KeyvaultPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            log_file: None,
        }
    }

    /// Get the base directory (~/.keyvaultify or the override)
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file holding the API token
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Get the path to the JSON debug log
    pub fn debug_log(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| self.base_dir.join("debug.log"))
    }

    /// Ensure the config directory exists
    pub fn ensure_directories(&self) -> Result<(), KeyvaultError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| KeyvaultError::Io(format!("Failed to create config directory: {}", e)))
    }

    /// Path of the project link file for a working directory
    pub fn project_file(dir: &Path) -> PathBuf {
        dir.join(DIR_NAME).join("project.json")
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn resolve_default_path() -> Result<PathBuf, KeyvaultError> {
    let dirs = BaseDirs::new()
        .ok_or_else(|| KeyvaultError::Config("Could not determine home directory".into()))?;
    Ok(dirs.home_dir().join(DIR_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = KeyvaultPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("config.json"));
        assert_eq!(paths.debug_log(), temp_dir.path().join("debug.log"));
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let base = temp_dir.path().join("nested").join(".keyvaultify");
        let paths = KeyvaultPaths::with_base_dir(base.clone());

        paths.ensure_directories().unwrap();
        assert!(base.is_dir());
    }

    #[test]
    fn test_project_file() {
        let dir = Path::new("/work/app");
        assert_eq!(
            KeyvaultPaths::project_file(dir),
            PathBuf::from("/work/app/.keyvaultify/project.json")
        );
    }
}
