//! Tracing setup for the `keyvault` binary
//!
//! Human-readable diagnostics go to stderr so command output on stdout stays
//! pipeable. In debug mode a JSON-lines copy is appended to the debug log.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::config::KeyvaultPaths;
use crate::error::{KeyvaultError, KeyvaultResult};

/// Environment variable selecting the stderr log level
pub const LOG_LEVEL_ENV: &str = "KEYVAULTIFY_LOG_LEVEL";

/// Environment variable enabling the JSON debug log when set to `true`
pub const DEBUG_ENV: &str = "KEYVAULTIFY_DEBUG";

const DEFAULT_LEVEL: &str = "warn";

/// Directive used for the debug log file
const FILE_DIRECTIVE: &str = "warn,keyvault=debug";

/// Resolved logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    /// Filter directive for stderr output
    pub level: String,

    /// Debug log file, when debug mode is on
    pub debug_file: Option<PathBuf>,
}

impl LogOptions {
    /// Resolve options from the `--verbose` flag and environment values
    pub fn resolve(
        verbose: bool,
        env_level: Option<&str>,
        debug_flag: Option<&str>,
        log_file: PathBuf,
    ) -> Self {
        let level = if verbose {
            "debug".to_string()
        } else {
            env_level
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .unwrap_or(DEFAULT_LEVEL)
                .to_lowercase()
        };

        let debug = level == "debug" || debug_flag.map(str::trim) == Some("true");

        Self {
            level,
            debug_file: debug.then_some(log_file),
        }
    }

    /// Resolve options from the process environment
    pub fn from_env(verbose: bool, paths: &KeyvaultPaths) -> Self {
        let env_level = std::env::var(LOG_LEVEL_ENV).ok();
        let debug_flag = std::env::var(DEBUG_ENV).ok();
        Self::resolve(
            verbose,
            env_level.as_deref(),
            debug_flag.as_deref(),
            paths.debug_log(),
        )
    }
}

/// Install the global subscriber
///
/// An unparseable level falls back to `warn`. Failing to open the debug log
/// disables the file layer and is reported once on stderr.
pub fn init(options: &LogOptions) {
    let stderr_filter =
        EnvFilter::try_new(&options.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_filter(stderr_filter);

    let (file_layer, file_error) = match options.debug_file.as_deref().map(open_log_file) {
        Some(Ok(file)) => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(Mutex::new(file))
                .with_filter(EnvFilter::new(FILE_DIRECTIVE));
            (Some(layer), None)
        }
        Some(Err(e)) => (None, Some(e)),
        None => (None, None),
    };

    // Ignore a second initialization (e.g. from tests)
    let _ = tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .try_init();

    if let Some(e) = file_error {
        tracing::warn!(error = %e, "debug log disabled");
    }
}

fn open_log_file(path: &Path) -> KeyvaultResult<std::fs::File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| KeyvaultError::Io(format!("Failed to open {}: {}", path.display(), e)))
}
