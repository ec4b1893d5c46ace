//! Authentication commands: login, logout, whoami

use crate::api::{ApiClient, ApiError};
use crate::crypto::SecureString;
use crate::display::format_user_info;
use crate::error::{KeyvaultError, KeyvaultResult};

use super::{print_hints, CliContext};

/// Prefix every Keyvaultify API token carries
pub const TOKEN_PREFIX: &str = "kvf_";

/// Check a pasted token before it is stored
pub fn validate_token_format(token: &str) -> KeyvaultResult<()> {
    if token.is_empty() {
        return Err(KeyvaultError::Validation("Token is required".into()));
    }
    if !token.starts_with(TOKEN_PREFIX) {
        return Err(KeyvaultError::Validation(format!(
            "Token must start with \"{}\"",
            TOKEN_PREFIX
        )));
    }
    Ok(())
}

/// Store an API token, prompting (hidden input) when none is given
///
/// With `verify`, the token is checked against the API before saving.
pub async fn handle_login(
    ctx: &mut CliContext,
    token: Option<String>,
    verify: bool,
) -> KeyvaultResult<()> {
    let token = match token {
        Some(token) => SecureString::from(token),
        None => rpassword::prompt_password("Paste your API token: ")
            .map(SecureString::from)
            .map_err(|e| KeyvaultError::Io(format!("Failed to read token: {}", e)))?,
    }
    .trimmed();

    validate_token_format(&token)?;

    if verify {
        let client = ApiClient::new(&ctx.settings.api_url(), Some(token.clone()))?;
        if !client.validate_token().await? {
            return Err(ApiError::Unauthorized.into());
        }
    }

    ctx.settings.set_token(&token);
    ctx.settings.save(&ctx.paths)?;
    tracing::info!("API token stored");

    println!("Token saved to {}", ctx.paths.settings_file().display());
    print_hints(&[
        "keyvault init       # link this directory to a project",
        "keyvault whoami     # check the token",
    ]);
    Ok(())
}

/// Remove the stored API token
pub fn handle_logout(ctx: &mut CliContext) -> KeyvaultResult<()> {
    if !ctx.settings.clear_token() {
        return Err(KeyvaultError::NotLoggedIn);
    }
    ctx.settings.save(&ctx.paths)?;
    tracing::info!("API token removed");

    println!("Logged out. Your API token has been removed from this machine.");
    print_hints(&["keyvault login      # log back in"]);
    Ok(())
}

/// Show the identity behind the stored token
pub async fn handle_whoami(ctx: &CliContext) -> KeyvaultResult<()> {
    let client = ctx.client()?;
    let info = client.user_info().await?;
    print!("{}", format_user_info(&info, client.base_url().as_str()));
    Ok(())
}
