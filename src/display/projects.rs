//! Project display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::text::{format_date, format_datetime, short_id};
use crate::models::{Environment, Project};

#[derive(Tabled)]
struct ProjectRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Environments")]
    environments: u64,
    #[tabled(rename = "Secrets")]
    secrets: u64,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a list of projects as a table
pub fn format_project_list(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let rows = projects.iter().map(|p| ProjectRow {
        name: p.name.clone(),
        environments: p.environments_count,
        secrets: p.secrets_count,
        created: format_date(p.created_at.as_deref()),
        id: short_id(&p.id),
    });

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Format a single project's details with its environments
pub fn format_project_details(project: &Project, environments: &[Environment]) -> String {
    let mut output = String::new();

    output.push_str(&format!("Project: {}\n", project.name));
    output.push_str(&format!(
        "  Description:    {}\n",
        project.description.as_deref().unwrap_or("No description")
    ));
    output.push_str(&format!("  ID:             {}\n", project.id));
    output.push_str(&format!(
        "  Created:        {}\n",
        format_datetime(project.created_at.as_deref())
    ));
    output.push_str(&format!("  Environments:   {}\n", environments.len()));
    output.push_str(&format!("  Total Secrets:  {}\n", project.secrets_count));

    if environments.is_empty() {
        output.push_str("\nNo environments found.\n");
        return output;
    }

    output.push_str("\nEnvironments:\n");
    for (index, env) in environments.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", index + 1, env.name));
        if let Some(description) = env.description.as_deref().filter(|d| !d.is_empty()) {
            output.push_str(&format!("     {}\n", description));
        }
        output.push_str(&format!(
            "     Created: {}\n",
            format_date(env.created_at.as_deref())
        ));
    }

    output
}
