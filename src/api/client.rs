//! HTTP client for the Keyvaultify API

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use crate::config::Settings;
use crate::crypto::{Envelope, SecureString};
use crate::error::{KeyvaultError, KeyvaultResult};
use crate::models::{Environment, Project, PushResults, Secret, SecretInput, UserInfo};

/// User-Agent sent with every request
pub const USER_AGENT: &str = concat!("keyvaultify-cli/", env!("CARGO_PKG_VERSION"));

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ProjectList {
    #[serde(default)]
    projects: Vec<Project>,
}

#[derive(Deserialize)]
struct EnvironmentList {
    #[serde(default)]
    environments: Vec<Environment>,
}

#[derive(Deserialize)]
struct SecretList {
    #[serde(default)]
    secrets: Vec<Secret>,
}

#[derive(Serialize)]
struct PushSecretsBody<'a> {
    secrets: &'a [SecretInput],
}

#[derive(Deserialize)]
struct PushSecretsResponse {
    #[serde(default)]
    results: Option<PushResults>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct VaultBody<'a> {
    project_id: &'a str,
    environment: &'a str,
    encrypted_secrets: &'a Envelope,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Authenticated client for the Keyvaultify API
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecureString,
}

impl ApiClient {
    /// Create a client for `base_url` authenticating with `token`
    ///
    /// # Errors
    ///
    /// `NotLoggedIn` when no token is available, `Config` when the URL is
    /// unusable.
    pub fn new(base_url: &str, token: Option<SecureString>) -> KeyvaultResult<Self> {
        let token = token
            .filter(|t| !t.trim().is_empty())
            .ok_or(KeyvaultError::NotLoggedIn)?;

        let base_url = Url::parse(base_url)
            .map_err(|e| KeyvaultError::Config(format!("Invalid API URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(KeyvaultError::Config(format!(
                "Invalid API URL '{}'",
                base_url
            )));
        }

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| KeyvaultError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url,
            token,
        })
    }

    /// Create a client from stored settings
    pub fn from_settings(settings: &Settings) -> KeyvaultResult<Self> {
        Self::new(&settings.api_url(), settings.token())
    }

    /// Base URL requests are sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /api/cli/projects`
    pub async fn list_projects(&self) -> KeyvaultResult<Vec<Project>> {
        let list: ProjectList = self
            .send_json(self.request(Method::GET, &["api", "cli", "projects"])?)
            .await?;
        Ok(list.projects)
    }

    /// `GET /api/cli/projects/{id}`
    pub async fn get_project(&self, project_id: &str) -> KeyvaultResult<Project> {
        let req = self.request(Method::GET, &["api", "cli", "projects", project_id])?;
        Ok(self.send_json(req).await?)
    }

    /// `GET /api/cli/projects/{id}/environments`
    pub async fn list_environments(&self, project_id: &str) -> KeyvaultResult<Vec<Environment>> {
        let req = self.request(
            Method::GET,
            &["api", "cli", "projects", project_id, "environments"],
        )?;
        let list: EnvironmentList = self.send_json(req).await?;
        Ok(list.environments)
    }

    /// `GET /api/cli/secrets/{envId}`
    pub async fn list_secrets(&self, environment_id: &str) -> KeyvaultResult<Vec<Secret>> {
        let req = self.request(Method::GET, &["api", "cli", "secrets", environment_id])?;
        let list: SecretList = self.send_json(req).await?;
        Ok(list.secrets)
    }

    /// `POST /api/cli/secrets/{envId}`: create or update secrets
    pub async fn push_secrets(
        &self,
        environment_id: &str,
        secrets: &[SecretInput],
    ) -> KeyvaultResult<Option<PushResults>> {
        let req = self
            .request(Method::POST, &["api", "cli", "secrets", environment_id])?
            .json(&PushSecretsBody { secrets });
        let resp: PushSecretsResponse = self.send_json(req).await?;
        Ok(resp.results)
    }

    /// `DELETE /api/cli/secrets/{envId}/{key}`
    pub async fn delete_secret(&self, environment_id: &str, key: &str) -> KeyvaultResult<()> {
        let req = self.request(
            Method::DELETE,
            &["api", "cli", "secrets", environment_id, key],
        )?;
        self.send(req).await?;
        Ok(())
    }

    /// `GET /api/cli/auth`: identity behind the token
    pub async fn user_info(&self) -> KeyvaultResult<UserInfo> {
        let req = self.request(Method::GET, &["api", "cli", "auth"])?;
        Ok(self.send_json(req).await?)
    }

    /// Whether the server accepts the token
    ///
    /// Only an authorization failure yields `Ok(false)`; other failures are
    /// returned as errors.
    pub async fn validate_token(&self) -> KeyvaultResult<bool> {
        match self.user_info().await {
            Ok(_) => Ok(true),
            Err(KeyvaultError::Api(ApiError::Unauthorized | ApiError::Forbidden)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// `POST /api/vault`: store an encrypted bundle
    pub async fn push_vault(
        &self,
        project_id: &str,
        environment: &str,
        envelope: &Envelope,
    ) -> KeyvaultResult<()> {
        let req = self.request(Method::POST, &["api", "vault"])?.json(&VaultBody {
            project_id,
            environment,
            encrypted_secrets: envelope,
        });
        self.send(req).await?;
        Ok(())
    }

    /// `GET /api/vault?projectId=..&environment=..`: fetch an encrypted bundle
    ///
    /// Accepts the envelope either as the whole body or wrapped in an
    /// `encryptedSecrets` member.
    pub async fn pull_vault(&self, project_id: &str, environment: &str) -> KeyvaultResult<Envelope> {
        let req = self
            .request(Method::GET, &["api", "vault"])?
            .query(&[("projectId", project_id), ("environment", environment)]);
        let mut body: serde_json::Value = self.send_json(req).await?;

        let envelope = match body.get_mut("encryptedSecrets") {
            Some(inner) => inner.take(),
            None => body,
        };
        Ok(Envelope::from_value(envelope)?)
    }

    fn request(&self, method: Method, segments: &[&str]) -> KeyvaultResult<RequestBuilder> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| KeyvaultError::Config(format!("Invalid API URL '{}'", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        tracing::debug!(%method, %url, "API request");
        Ok(self
            .http
            .request(method, url)
            .bearer_auth(self.token.as_str())
            .header(reqwest::header::CONTENT_TYPE, "application/json"))
    }

    async fn send(&self, req: RequestBuilder) -> Result<Response, ApiError> {
        let resp = req.send().await.map_err(|e| {
            tracing::debug!(error = %e, "API request failed without a response");
            ApiError::Network(e.without_url().to_string())
        })?;

        let status = resp.status();
        tracing::debug!(status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(resp);
        }

        let message = resp
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .and_then(|body| body.message);
        let err = ApiError::from_status(status.as_u16(), message);
        tracing::warn!(status = status.as_u16(), error = %err, "API request failed");
        Err(err)
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ApiError> {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(e.without_url().to_string()))
    }
}
