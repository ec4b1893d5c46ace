//! Project and environment models
//!
//! Mirrors the JSON returned by the Keyvaultify API (camelCase fields).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A Keyvaultify project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique identifier
    pub id: String,

    /// Project name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Number of environments in the project
    #[serde(default)]
    pub environments_count: u64,

    /// Number of secrets across all environments
    #[serde(default)]
    pub secrets_count: u64,

    /// Creation timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// An environment (e.g. development, staging, production) within a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    /// Unique identifier
    pub id: String,

    /// Environment name
    pub name: String,

    /// Optional description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Creation timestamp (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Environment {
    /// Label used in selection prompts: `name - description`
    pub fn label(&self) -> String {
        match &self.description {
            Some(description) if !description.is_empty() => {
                format!("{} - {}", self.name, description)
            }
            _ => self.name.clone(),
        }
    }
}

impl Project {
    /// Label used in selection prompts
    pub fn label(&self) -> String {
        format!(
            "{} ({} environments, {} secrets)",
            self.name, self.environments_count, self.secrets_count
        )
    }
}

/// Parse an API timestamp, tolerating absent or malformed values
pub fn parse_timestamp(value: Option<&str>) -> Option<DateTime<Utc>> {
    value
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
