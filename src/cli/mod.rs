//! CLI command handlers
//!
//! This module contains the implementation of CLI commands, bridging the
//! clap argument parsing with the config, API and crypto layers.

pub mod auth;
pub mod encrypt;
pub mod environments;
pub mod init;
pub mod logs;
pub mod passphrase;
pub mod projects;
pub mod prompt;
pub mod secrets;
pub mod sync;

pub use auth::{handle_login, handle_logout, handle_whoami};
pub use encrypt::{handle_decrypt, handle_encrypt, DecryptArgs, EncryptArgs};
pub use environments::{handle_environment_command, EnvironmentCommands};
pub use init::{handle_init, InitArgs};
pub use logs::{handle_logs_command, LogCommands};
pub use projects::{handle_project_command, ProjectCommands};
pub use secrets::{handle_secret_command, SecretCommands};
pub use sync::{handle_pull, handle_push, PullArgs, PushArgs};

use std::path::{Path, PathBuf};

use crate::api::ApiClient;
use crate::config::{KeyvaultPaths, ProjectConfig, Settings};
use crate::error::{KeyvaultError, KeyvaultResult};

/// Everything a command needs about its surroundings
pub struct CliContext {
    pub paths: KeyvaultPaths,
    pub settings: Settings,
    /// Directory the project link is resolved against
    pub cwd: PathBuf,
}

impl CliContext {
    /// Load settings for `paths` and take the process working directory
    pub fn load(paths: KeyvaultPaths) -> KeyvaultResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        let cwd = std::env::current_dir()?;
        Ok(Self::new(paths, settings, cwd))
    }

    pub fn new(paths: KeyvaultPaths, settings: Settings, cwd: PathBuf) -> Self {
        Self {
            paths,
            settings,
            cwd,
        }
    }

    /// An API client authenticated with the stored token
    pub fn client(&self) -> KeyvaultResult<ApiClient> {
        ApiClient::from_settings(&self.settings)
    }

    /// The project linked to the working directory, if any
    pub fn linked_project(&self) -> KeyvaultResult<Option<ProjectConfig>> {
        ProjectConfig::load(&self.cwd)
    }

    /// The project linked to the working directory
    pub fn project(&self) -> KeyvaultResult<ProjectConfig> {
        ProjectConfig::require(&self.cwd)
    }

    /// Resolve a user-supplied path against the working directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.cwd.join(path)
    }
}

/// Decide whether `path` may be written
///
/// Returns `Ok(false)` when the user declines. Interactive confirmation is
/// impossible while stdin carries the passphrase, so `--force` is required
/// then.
pub(crate) fn confirm_overwrite(path: &Path, force: bool, stdin_busy: bool) -> KeyvaultResult<bool> {
    if force || !path.exists() {
        return Ok(true);
    }
    if stdin_busy {
        return Err(KeyvaultError::Validation(format!(
            "{} already exists; pass --force to overwrite it when using --passphrase-stdin",
            path.display()
        )));
    }
    prompt::confirm(&format!("{} already exists. Overwrite?", path.display()))
}

/// Print a short list of follow-up commands
pub(crate) fn print_hints(hints: &[&str]) {
    println!();
    for hint in hints {
        println!("  {}", hint);
    }
}
