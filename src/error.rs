//! Custom error types for keyvault
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

use crate::api::ApiError;
use crate::crypto::CipherError;

/// The main error type for keyvault operations
#[derive(Error, Debug)]
pub enum KeyvaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Invalid user input or data
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// No API token is stored
    #[error("Not logged in")]
    NotLoggedIn,

    /// The working directory has no linked project
    #[error("No project linked to this directory")]
    NotInitialized,

    /// API request failures
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Envelope encryption/decryption failures
    #[error(transparent)]
    Cipher(#[from] CipherError),

    /// The user declined a confirmation
    #[error("Operation cancelled")]
    Aborted,
}

impl KeyvaultError {
    /// Create a "not found" error for projects
    pub fn project_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Project",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for environments
    pub fn environment_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Environment",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for secrets
    pub fn secret_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Secret",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for files
    pub fn file_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "File",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Remediation hints printed beneath the error message
    pub fn suggestions(&self) -> Vec<&'static str> {
        match self {
            Self::NotLoggedIn => vec![
                "Run `keyvault login` to authenticate",
                "Create an API token at https://keyvaultify.com/settings/developer",
            ],
            Self::NotInitialized => vec![
                "Run `keyvault init` to link a project",
                "Run `keyvault projects list` to see available projects",
            ],
            Self::Validation(_) => vec![
                "Check your input parameters",
                "Use `keyvault <command> --help` for usage information",
            ],
            Self::NotFound { entity_type, .. } => match *entity_type {
                "File" => vec!["Check the file path"],
                "Secret" => vec!["Run `keyvault secrets list` to see available secrets"],
                _ => vec![
                    "Check the resource ID",
                    "Run `keyvault projects list` to see available projects",
                    "Run `keyvault environments list` to see available environments",
                ],
            },
            Self::Config(_) => vec![
                "Run `keyvault init` to recreate the project configuration",
            ],
            Self::Api(err) => err.suggestions().to_vec(),
            Self::Cipher(CipherError::Authentication) => vec![
                "Check that you are using the passphrase the secrets were encrypted with",
                "The stored data may have been modified; push the secrets again",
            ],
            Self::Cipher(CipherError::MalformedEnvelope(_)) => vec![
                "The encrypted data is corrupted or was not produced by keyvault",
            ],
            Self::Cipher(CipherError::EmptyPassphrase) => vec![
                "Provide a passphrase via the prompt, --passphrase-stdin or KEYVAULTIFY_PASSPHRASE",
            ],
            Self::Io(_) | Self::Json(_) | Self::Cipher(_) | Self::Aborted => Vec::new(),
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for KeyvaultError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for KeyvaultError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for keyvault operations
pub type KeyvaultResult<T> = Result<T, KeyvaultError>;
