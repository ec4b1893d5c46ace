//! Debug log commands

use clap::Subcommand;

use crate::config::KeyvaultPaths;
use crate::error::{KeyvaultError, KeyvaultResult};

/// Debug log commands
#[derive(Subcommand, Debug)]
pub enum LogCommands {
    /// Print the location of the debug log file
    Path,

    /// Delete the debug log file
    Clear,
}

/// Handle log commands
pub fn handle_logs_command(paths: &KeyvaultPaths, cmd: LogCommands) -> KeyvaultResult<()> {
    let log_file = paths.debug_log();

    match cmd {
        LogCommands::Path => {
            println!("{}", log_file.display());
        }
        LogCommands::Clear => {
            if !log_file.exists() {
                println!("No debug log at {}", log_file.display());
                return Ok(());
            }
            std::fs::remove_file(&log_file).map_err(|e| {
                KeyvaultError::Io(format!("Failed to remove {}: {}", log_file.display(), e))
            })?;
            println!("Cleared debug log {}", log_file.display());
        }
    }

    Ok(())
}
