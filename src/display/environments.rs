//! Environment display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::text::{format_date, short_id, truncate};
use crate::models::{Environment, Secret};

/// Characters of a secret value shown in the environment view
const VALUE_PREVIEW_LEN: usize = 20;

#[derive(Tabled)]
struct EnvironmentRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
    #[tabled(rename = "Created")]
    created: String,
    #[tabled(rename = "ID")]
    id: String,
}

/// Format a list of environments as a table
pub fn format_environment_list(environments: &[Environment]) -> String {
    if environments.is_empty() {
        return "No environments found.".to_string();
    }

    let rows = environments.iter().map(|env| EnvironmentRow {
        name: env.name.clone(),
        description: env
            .description
            .clone()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "No description".to_string()),
        created: format_date(env.created_at.as_deref()),
        id: short_id(&env.id),
    });

    Table::new(rows).with(Style::sharp()).to_string()
}

/// Format an environment summary with a preview of its secrets
pub fn format_environment_details(environment_id: &str, secrets: &[Secret]) -> String {
    let mut output = String::new();

    output.push_str("Environment Details\n");
    output.push_str(&format!("  ID:       {}\n", environment_id));
    output.push_str(&format!("  Secrets:  {}\n", secrets.len()));

    if secrets.is_empty() {
        output.push_str("\nNo secrets found in this environment.\n");
        return output;
    }

    output.push_str("\nSecrets:\n");
    for (index, secret) in secrets.iter().enumerate() {
        output.push_str(&format!("  {}. {}\n", index + 1, secret.key));
        output.push_str(&format!(
            "     Value: {}\n",
            truncate(&secret.value, VALUE_PREVIEW_LEN)
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_table() {
        let envs = vec![Environment {
            id: "env_abcdefghijk".into(),
            name: "production".into(),
            description: None,
            created_at: None,
        }];
        let output = format_environment_list(&envs);
        assert!(output.contains("production"));
        assert!(output.contains("No description"));
        assert!(output.contains("env_abcd..."));
        assert!(output.contains("Unknown"));
    }

    #[test]
    fn test_environment_details_truncates_values() {
        let secrets = vec![Secret {
            key: "LONG".into(),
            value: "abcdefghijklmnopqrstuvwxyz".into(),
            created_at: None,
        }];
        let output = format_environment_details("env_1", &secrets);
        assert!(output.contains("Secrets:  1"));
        assert!(output.contains("Value: abcdefghijklmnopqrst..."));
        assert!(!output.contains("uvwxyz"));
    }

    #[test]
    fn test_environment_details_empty() {
        let output = format_environment_details("env_1", &[]);
        assert!(output.contains("No secrets found"));
    }
}
