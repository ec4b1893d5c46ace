//! Push and pull of encrypted `.env` bundles
//!
//! The bundle is sealed locally with the passphrase before it leaves the
//! machine; the server only ever stores the envelope.

use std::path::PathBuf;

use clap::Args;

use crate::crypto;
use crate::error::KeyvaultResult;
use crate::storage::{dotenv, read_text, write_secret_file};

use super::passphrase::{passphrase_reader, PassphraseReader};
use super::{confirm_overwrite, CliContext};

/// Arguments for `keyvault push`
#[derive(Args, Debug)]
pub struct PushArgs {
    /// Path to the .env file to upload
    #[arg(long = "env", default_value = ".env")]
    pub env_file: PathBuf,

    /// Read the passphrase from stdin instead of prompting
    #[arg(long)]
    pub passphrase_stdin: bool,
}

/// Arguments for `keyvault pull`
#[derive(Args, Debug)]
pub struct PullArgs {
    /// File to write the secrets to
    #[arg(long = "env", default_value = ".env")]
    pub env_file: PathBuf,

    /// Overwrite an existing file without asking
    #[arg(short, long)]
    pub force: bool,

    /// Read the passphrase from stdin instead of prompting
    #[arg(long)]
    pub passphrase_stdin: bool,
}

/// Handle `keyvault push`
pub async fn handle_push(ctx: &CliContext, args: PushArgs) -> KeyvaultResult<()> {
    let mut reader = passphrase_reader(args.passphrase_stdin);
    push_with(ctx, &args, reader.as_mut()).await
}

/// Handle `keyvault pull`
pub async fn handle_pull(ctx: &CliContext, args: PullArgs) -> KeyvaultResult<()> {
    let mut reader = passphrase_reader(args.passphrase_stdin);
    pull_with(ctx, &args, reader.as_mut()).await
}

pub(crate) async fn push_with(
    ctx: &CliContext,
    args: &PushArgs,
    passphrase: &mut dyn PassphraseReader,
) -> KeyvaultResult<()> {
    let path = ctx.resolve(&args.env_file);
    let text = zeroize::Zeroizing::new(read_text(&path)?);
    let bundle = dotenv::parse(&text)?;

    if bundle.is_empty() {
        println!("No secrets found in {}", args.env_file.display());
        tracing::warn!(path = %path.display(), "nothing to push");
        return Ok(());
    }

    let client = ctx.client()?;
    let link = ctx.project()?;

    let key = passphrase.read_passphrase(true)?;
    let envelope = crypto::encrypt(&bundle, &key)?;

    client
        .push_vault(&link.project_id, &link.environment_id, &envelope)
        .await?;

    tracing::info!(
        count = bundle.len(),
        project = %link.project_id,
        environment = %link.environment_id,
        "pushed encrypted bundle"
    );
    println!(
        "Pushed {} secret(s) from {} to {} ({})",
        bundle.len(),
        args.env_file.display(),
        link.project_name,
        link.environment_name
    );
    Ok(())
}

pub(crate) async fn pull_with(
    ctx: &CliContext,
    args: &PullArgs,
    passphrase: &mut dyn PassphraseReader,
) -> KeyvaultResult<()> {
    let client = ctx.client()?;
    let link = ctx.project()?;
    let path = ctx.resolve(&args.env_file);

    if !confirm_overwrite(&path, args.force, passphrase.uses_stdin())? {
        println!("Pull cancelled.");
        return Ok(());
    }

    let envelope = client
        .pull_vault(&link.project_id, &link.environment_id)
        .await?;

    let key = passphrase.read_passphrase(false)?;
    let bundle = crypto::decrypt(&envelope, &key)?;
    write_secret_file(&path, &dotenv::render(&bundle)?)?;

    tracing::info!(
        count = bundle.len(),
        path = %path.display(),
        "pulled encrypted bundle"
    );
    println!(
        "Pulled {} secret(s) from {} ({}) into {}",
        bundle.len(),
        link.project_name,
        link.environment_name,
        args.env_file.display()
    );
    Ok(())
}
