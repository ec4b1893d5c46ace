//! Configuration module for keyvault
//!
//! This module provides configuration management including:
//! - Global config directory resolution
//! - Stored credentials and settings
//! - Per-directory project links

pub mod paths;
pub mod project;
pub mod settings;

pub use paths::KeyvaultPaths;
pub use project::ProjectConfig;
pub use settings::Settings;
