use anyhow::Result;
use clap::{Parser, Subcommand};

use keyvault::cli::{
    handle_decrypt, handle_encrypt, handle_environment_command, handle_init, handle_login,
    handle_logout, handle_logs_command, handle_project_command, handle_pull, handle_push,
    handle_secret_command, handle_whoami, CliContext, DecryptArgs, EncryptArgs,
    EnvironmentCommands, InitArgs, LogCommands, ProjectCommands, PullArgs, PushArgs,
    SecretCommands,
};
use keyvault::config::KeyvaultPaths;
use keyvault::logging::{self, LogOptions};
use keyvault::KeyvaultError;

#[derive(Parser)]
#[command(
    name = "keyvault",
    author = "Keyvaultify",
    version,
    about = "Manage Keyvaultify secrets from the command line",
    long_about = "keyvault links a directory to a Keyvaultify project and environment, \
                  manages individual secrets, and syncs whole .env files through the \
                  vault as passphrase-encrypted envelopes."
)]
struct Cli {
    /// Enable debug output (also written to the debug log)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Store an API token
    Login {
        /// API token (prompted for when omitted)
        #[arg(long)]
        token: Option<String>,

        /// Check the token against the server before saving it
        #[arg(long)]
        verify: bool,
    },

    /// Remove the stored API token
    Logout,

    /// Show the identity behind the stored token
    Whoami,

    /// Link this directory to a project and environment
    Init(InitArgs),

    /// Project commands
    #[command(subcommand)]
    Projects(ProjectCommands),

    /// Environment commands
    #[command(subcommand, alias = "envs")]
    Environments(EnvironmentCommands),

    /// Secret commands
    #[command(subcommand)]
    Secrets(SecretCommands),

    /// Encrypt a .env file and upload it to the vault
    Push(PushArgs),

    /// Download and decrypt secrets from the vault into a .env file
    Pull(PullArgs),

    /// Encrypt a .env file to a local envelope file
    Encrypt(EncryptArgs),

    /// Decrypt a local envelope file into a .env file
    Decrypt(DecryptArgs),

    /// Debug log commands
    #[command(subcommand)]
    Logs(LogCommands),
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("Error: {}", err);
        if let Some(err) = err.downcast_ref::<KeyvaultError>() {
            let suggestions = err.suggestions();
            if !suggestions.is_empty() {
                eprintln!();
                eprintln!("Suggestions:");
                for suggestion in suggestions {
                    eprintln!("  - {}", suggestion);
                }
            }
        }
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    let paths = KeyvaultPaths::new()?;
    logging::init(&LogOptions::from_env(cli.verbose, &paths));

    let Some(command) = cli.command else {
        println!("keyvault - Keyvaultify secrets from the command line");
        println!();
        println!("Run 'keyvault --help' for usage information.");
        println!("Run 'keyvault login' to get started.");
        return Ok(());
    };

    // Log commands must work even when config.json is unreadable
    if let Commands::Logs(cmd) = command {
        handle_logs_command(&paths, cmd)?;
        return Ok(());
    }

    let mut ctx = CliContext::load(paths)?;
    tracing::debug!(config_dir = %ctx.paths.base_dir().display(), "loaded settings");

    match command {
        Commands::Login { token, verify } => handle_login(&mut ctx, token, verify).await?,
        Commands::Logout => handle_logout(&mut ctx)?,
        Commands::Whoami => handle_whoami(&ctx).await?,
        Commands::Init(args) => handle_init(&ctx, args).await?,
        Commands::Projects(cmd) => handle_project_command(&ctx, cmd).await?,
        Commands::Environments(cmd) => handle_environment_command(&ctx, cmd).await?,
        Commands::Secrets(cmd) => handle_secret_command(&ctx, cmd).await?,
        Commands::Push(args) => handle_push(&ctx, args).await?,
        Commands::Pull(args) => handle_pull(&ctx, args).await?,
        Commands::Encrypt(args) => handle_encrypt(&ctx, args)?,
        Commands::Decrypt(args) => handle_decrypt(&ctx, args)?,
        Commands::Logs(_) => {}
    }

    Ok(())
}
