//! Environment CLI commands

use clap::Subcommand;

use crate::display::{format_environment_details, format_environment_list};
use crate::error::{KeyvaultError, KeyvaultResult};

use super::{print_hints, CliContext};

/// Environment commands
#[derive(Subcommand, Debug)]
pub enum EnvironmentCommands {
    /// List environments in the linked or specified project
    #[command(alias = "ls")]
    List {
        /// Project ID (uses the linked project if not specified)
        #[arg(long)]
        project: Option<String>,
    },

    /// Show details of a specific environment
    Show {
        /// Environment ID
        environment_id: String,
    },
}

/// Handle environment commands
pub async fn handle_environment_command(
    ctx: &CliContext,
    cmd: EnvironmentCommands,
) -> KeyvaultResult<()> {
    match cmd {
        EnvironmentCommands::List { project } => {
            let project_id = match project {
                Some(id) => id,
                None => {
                    let link = ctx.linked_project()?.ok_or(KeyvaultError::NotInitialized)?;
                    println!("Using current project: {}", link.project_name);
                    link.project_id
                }
            };

            let environments = ctx.client()?.list_environments(&project_id).await?;
            println!("{}", format_environment_list(&environments));
            if !environments.is_empty() {
                print_hints(&[
                    "keyvault environments show <id>     # environment details",
                    "keyvault secrets list --env <id>    # secrets in an environment",
                ]);
            }
        }
        EnvironmentCommands::Show { environment_id } => {
            let secrets = ctx.client()?.list_secrets(&environment_id).await?;
            print!("{}", format_environment_details(&environment_id, &secrets));
            print_hints(&[format!("keyvault secrets list --env {}", environment_id).as_str()]);
        }
    }

    Ok(())
}
