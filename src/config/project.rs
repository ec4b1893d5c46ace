//! Per-directory project link (`.keyvaultify/project.json`)

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::paths::KeyvaultPaths;
use crate::error::{KeyvaultError, KeyvaultResult};
use crate::models::{Environment, Project};
use crate::storage::file_io;

/// The project and environment a working directory is linked to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    #[serde(default)]
    pub project_id: String,

    #[serde(default)]
    pub project_name: String,

    #[serde(default)]
    pub environment_id: String,

    #[serde(default)]
    pub environment_name: String,

    pub last_updated: DateTime<Utc>,
}

impl ProjectConfig {
    /// Link to a project and one of its environments
    pub fn new(project: &Project, environment: &Environment) -> Self {
        Self {
            project_id: project.id.clone(),
            project_name: project.name.clone(),
            environment_id: environment.id.clone(),
            environment_name: environment.name.clone(),
            last_updated: Utc::now(),
        }
    }

    /// Load the link for `dir`, or `None` when the directory isn't linked
    pub fn load(dir: &Path) -> KeyvaultResult<Option<Self>> {
        let path = KeyvaultPaths::project_file(dir);
        if !path.exists() {
            return Ok(None);
        }

        let config: Self = file_io::read_json_required(&path).map_err(|e| {
            KeyvaultError::Config(format!("Invalid {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(Some(config))
    }

    /// Load the link for `dir`, failing when the directory isn't linked
    pub fn require(dir: &Path) -> KeyvaultResult<Self> {
        Self::load(dir)?.ok_or(KeyvaultError::NotInitialized)
    }

    /// Write the link for `dir`, creating `.keyvaultify/` as needed
    pub fn save(&self, dir: &Path) -> KeyvaultResult<()> {
        file_io::write_json_atomic(KeyvaultPaths::project_file(dir), self)
    }

    fn validate(&self) -> KeyvaultResult<()> {
        if self.project_id.trim().is_empty() || self.environment_id.trim().is_empty() {
            return Err(KeyvaultError::Config(
                "project.json is missing required fields (projectId, environmentId)".into(),
            ));
        }
        Ok(())
    }
}
