//! Project CLI commands

use clap::Subcommand;

use crate::display::{format_project_details, format_project_list};
use crate::error::KeyvaultResult;

use super::{print_hints, CliContext};

/// Project commands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// List all available projects
    #[command(alias = "ls")]
    List,

    /// Show details of a specific project
    Show {
        /// Project ID
        project_id: String,
    },
}

/// Handle project commands
pub async fn handle_project_command(ctx: &CliContext, cmd: ProjectCommands) -> KeyvaultResult<()> {
    let client = ctx.client()?;

    match cmd {
        ProjectCommands::List => {
            let projects = client.list_projects().await?;
            println!("{}", format_project_list(&projects));
            if projects.is_empty() {
                println!("Create a project at: https://keyvaultify.com/projects");
            } else {
                print_hints(&[
                    "keyvault projects show <id>    # project details",
                    "keyvault init                  # link a project to this directory",
                ]);
            }
        }
        ProjectCommands::Show { project_id } => {
            let project = client.get_project(&project_id).await?;
            let environments = client.list_environments(&project_id).await?;
            print!("{}", format_project_details(&project, &environments));
            let list_hint = format!("keyvault environments list --project {}", project_id);
            print_hints(&[list_hint.as_str(), "keyvault init"]);
        }
    }

    Ok(())
}
