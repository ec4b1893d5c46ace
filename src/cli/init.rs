//! `keyvault init`: link the working directory to a project environment

use clap::Args;

use crate::config::{KeyvaultPaths, ProjectConfig};
use crate::error::{KeyvaultError, KeyvaultResult};
use crate::models::{Environment, Project};

use super::{print_hints, prompt, CliContext};

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Project ID (prompts when omitted)
    #[arg(long)]
    pub project: Option<String>,

    /// Environment ID (prompts when omitted)
    #[arg(long)]
    pub environment: Option<String>,
}

/// Choose a project and environment and write `.keyvaultify/project.json`
pub async fn handle_init(ctx: &CliContext, args: InitArgs) -> KeyvaultResult<()> {
    let client = ctx.client()?;

    let projects = client.list_projects().await?;
    if projects.is_empty() {
        return Err(KeyvaultError::Validation(
            "You don't have access to any projects. Create one at https://keyvaultify.com/projects"
                .into(),
        ));
    }
    println!("Found {} project(s)", projects.len());
    let project = choose_project(&projects, args.project.as_deref())?;

    let environments = client.list_environments(&project.id).await?;
    if environments.is_empty() {
        return Err(KeyvaultError::Validation(format!(
            "Project '{}' has no environments. Create one at https://keyvaultify.com/projects/{}",
            project.name, project.id
        )));
    }
    println!("Found {} environment(s)", environments.len());
    let environment = choose_environment(&environments, args.environment.as_deref())?;

    let link = ProjectConfig::new(project, environment);
    link.save(&ctx.cwd)?;
    tracing::info!(project = %link.project_id, environment = %link.environment_id, "project linked");

    println!("Project initialized");
    println!("  Project:      {}", link.project_name);
    println!("  Environment:  {}", link.environment_name);
    println!(
        "  Config:       {}",
        KeyvaultPaths::project_file(&ctx.cwd).display()
    );
    print_hints(&[
        "keyvault push            # upload your .env file",
        "keyvault pull            # download secrets",
        "keyvault secrets list    # manage individual secrets",
    ]);
    Ok(())
}

fn choose_project<'a>(projects: &'a [Project], id: Option<&str>) -> KeyvaultResult<&'a Project> {
    match id {
        Some(id) => projects
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| KeyvaultError::project_not_found(id)),
        None => prompt::select("Select a project:", projects, Project::label),
    }
}

fn choose_environment<'a>(
    environments: &'a [Environment],
    id: Option<&str>,
) -> KeyvaultResult<&'a Environment> {
    match id {
        Some(id) => environments
            .iter()
            .find(|e| e.id == id || e.name == id)
            .ok_or_else(|| KeyvaultError::environment_not_found(id)),
        None => prompt::select("Select an environment:", environments, Environment::label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::crypto::SecureString;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn context(dir: &TempDir, server: &MockServer) -> CliContext {
        let mut settings = Settings::default();
        settings.set_token(&SecureString::from("kvf_test"));
        settings.api_url = Some(server.uri());
        CliContext::new(
            KeyvaultPaths::with_base_dir(dir.path().join("config")),
            settings,
            dir.path().to_path_buf(),
        )
    }

    async fn mount_projects(server: &MockServer, environments: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/cli/projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "projects": [
                    {"id": "proj_1", "name": "Backend"},
                    {"id": "proj_2", "name": "Frontend"}
                ]
            })))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/cli/projects/proj_2/environments"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "environments": environments
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_init_with_flags_writes_link() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        mount_projects(
            &server,
            json!([
                {"id": "env_dev", "name": "development"},
                {"id": "env_prod", "name": "production"}
            ]),
        )
        .await;

        let ctx = context(&dir, &server);
        handle_init(
            &ctx,
            InitArgs {
                project: Some("proj_2".into()),
                environment: Some("production".into()),
            },
        )
        .await
        .unwrap();

        let link = ProjectConfig::require(dir.path()).unwrap();
        assert_eq!(link.project_name, "Frontend");
        assert_eq!(link.environment_id, "env_prod");
    }

    #[tokio::test]
    async fn test_init_unknown_project() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        mount_projects(&server, json!([])).await;

        let ctx = context(&dir, &server);
        let err = handle_init(
            &ctx,
            InitArgs {
                project: Some("proj_missing".into()),
                environment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_init_project_without_environments() {
        let dir = TempDir::new().unwrap();
        let server = MockServer::start().await;
        mount_projects(&server, json!([])).await;

        let ctx = context(&dir, &server);
        let err = handle_init(
            &ctx,
            InitArgs {
                project: Some("proj_2".into()),
                environment: None,
            },
        )
        .await
        .unwrap_err();
        assert!(err.is_validation());
        assert!(ProjectConfig::load(dir.path()).unwrap().is_none());
    }
}
