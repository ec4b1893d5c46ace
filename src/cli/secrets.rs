//! Secret CLI commands
//!
//! These talk to the per-key secrets API of an environment. Whole-file sync
//! of encrypted bundles lives in [`super::sync`].

use clap::Subcommand;

use crate::display::{format_secret_details, format_secret_list, format_set_result};
use crate::error::{KeyvaultError, KeyvaultResult};
use crate::models::{is_valid_secret_key, SecretInput};

use super::{print_hints, prompt, CliContext};

/// Secret commands
#[derive(Subcommand, Debug)]
pub enum SecretCommands {
    /// List secrets in the linked or specified environment
    #[command(alias = "ls")]
    List {
        /// Environment ID (uses the linked environment if not specified)
        #[arg(long = "env")]
        environment: Option<String>,
    },

    /// Show a secret's value
    Show {
        /// Secret key
        key: String,
    },

    /// Create or update a secret
    Set {
        /// Secret key (uppercase letters, digits and underscores)
        key: String,
        /// Secret value
        value: String,
    },

    /// Delete a secret
    #[command(alias = "rm")]
    Delete {
        /// Secret key
        key: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },
}

/// Validate and normalize a key/value pair for `secrets set`
pub fn secret_input(key: &str, value: &str) -> KeyvaultResult<SecretInput> {
    let key = key.trim();
    let value = value.trim();

    if key.is_empty() {
        return Err(KeyvaultError::Validation("Secret key is required".into()));
    }
    if !is_valid_secret_key(key) {
        return Err(KeyvaultError::Validation(
            "Secret key must contain only uppercase letters, numbers, and underscores".into(),
        ));
    }
    if value.is_empty() {
        return Err(KeyvaultError::Validation("Secret value is required".into()));
    }

    Ok(SecretInput {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Handle secret commands
pub async fn handle_secret_command(ctx: &CliContext, cmd: SecretCommands) -> KeyvaultResult<()> {
    match cmd {
        SecretCommands::List { environment } => {
            let environment_id = match environment {
                Some(id) => id,
                None => {
                    let link = ctx.linked_project()?.ok_or(KeyvaultError::NotInitialized)?;
                    println!("Using current environment: {}", link.environment_name);
                    link.environment_id
                }
            };

            let secrets = ctx.client()?.list_secrets(&environment_id).await?;
            println!("{}", format_secret_list(&secrets));
            if secrets.is_empty() {
                println!("Use `keyvault push` to upload secrets.");
            }
        }
        SecretCommands::Show { key } => {
            let link = ctx.project()?;
            let secrets = ctx.client()?.list_secrets(&link.environment_id).await?;
            let secret = secrets
                .iter()
                .find(|s| s.key == key)
                .ok_or_else(|| KeyvaultError::secret_not_found(&key))?;
            print!("{}", format_secret_details(secret, &link));
        }
        SecretCommands::Set { key, value } => {
            let input = secret_input(&key, &value)?;
            let link = ctx.project()?;
            let results = ctx
                .client()?
                .push_secrets(&link.environment_id, std::slice::from_ref(&input))
                .await?;
            println!("{}", format_set_result(&input.key, results.as_ref(), &link));
            print_hints(&[format!("keyvault secrets show {}", input.key).as_str()]);
        }
        SecretCommands::Delete { key, force } => {
            let link = ctx.project()?;
            let client = ctx.client()?;

            if !force
                && !prompt::confirm(&format!(
                    "Are you sure you want to delete secret \"{}\"?",
                    key
                ))?
            {
                println!("Deletion cancelled.");
                return Ok(());
            }

            client.delete_secret(&link.environment_id, &key).await?;
            tracing::info!(key = %key, environment = %link.environment_id, "secret deleted");
            println!(
                "Secret \"{}\" deleted from {} ({})",
                key, link.project_name, link.environment_name
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{KeyvaultPaths, ProjectConfig, Settings};
    use crate::crypto::SecureString;
    use crate::models::{Environment, Project};
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_secret_input_trims_and_validates() {
        let input = secret_input("  API_KEY ", " abc123 ").unwrap();
        assert_eq!(input.key, "API_KEY");
        assert_eq!(input.value, "abc123");

        assert!(secret_input("", "x").unwrap_err().is_validation());
        assert!(secret_input("api_key", "x").unwrap_err().is_validation());
        assert!(secret_input("API_KEY", "   ").unwrap_err().is_validation());
    }

    fn linked_context(dir: &TempDir, server: &MockServer) -> CliContext {
        let project = Project {
            id: "proj_1".into(),
            name: "Backend".into(),
            description: None,
            environments_count: 1,
            secrets_count: 0,
            created_at: None,
        };
        let env = Environment {
            id: "env_1".into(),
            name: "production".into(),
            description: None,
            created_at: None,
        };
        ProjectConfig::new(&project, &env).save(dir.path()).unwrap();

        let mut settings = Settings::default();
        settings.set_token(&SecureString::from("kvf_test"));
        settings.api_url = Some(server.uri());
        CliContext::new(
            KeyvaultPaths::with_base_dir(dir.path().join("config")),
            settings,
            dir.path().to_path_buf(),
        )
    }

    #[tokio::test]
    async fn test_set_pushes_to_linked_environment() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/cli/secrets/env_1"))
            .and(body_json(json!({"secrets": [{"key": "API_KEY", "value": "abc"}]})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": {"created": 1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = linked_context(&dir, &server);
        handle_secret_command(
            &ctx,
            SecretCommands::Set {
                key: "API_KEY".into(),
                value: "abc".into(),
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_show_missing_secret() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/cli/secrets/env_1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secrets": [{"key": "OTHER", "value": "x"}]
            })))
            .mount(&server)
            .await;

        let ctx = linked_context(&dir, &server);
        let err = handle_secret_command(&ctx, SecretCommands::Show { key: "MISSING".into() })
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_forced_delete() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/api/cli/secrets/env_1/OLD"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let ctx = linked_context(&dir, &server);
        handle_secret_command(
            &ctx,
            SecretCommands::Delete {
                key: "OLD".into(),
                force: true,
            },
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_list_without_link_or_flag() {
        let dir = TempDir::new().unwrap();
        let mut settings = Settings::default();
        settings.set_token(&SecureString::from("kvf_test"));
        let ctx = CliContext::new(
            KeyvaultPaths::with_base_dir(dir.path().join("config")),
            settings,
            dir.path().to_path_buf(),
        );

        let err = handle_secret_command(&ctx, SecretCommands::List { environment: None })
            .await
            .unwrap_err();
        assert!(matches!(err, KeyvaultError::NotInitialized));
    }
}
