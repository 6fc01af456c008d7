//! Main entry point for the DriftChat command-line client.

use std::path::PathBuf;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dotenv::dotenv;
use driftchat_shared::config::ClientConfig;
use tracing_subscriber::EnvFilter;

mod commands;

/// DriftChat CLI
#[derive(Parser)]
#[command(name = "driftchat")]
#[command(about = "Command-line client for the DriftChat API", long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML). Defaults are used when absent.
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the login session
    Session {
        #[command(subcommand)]
        command: commands::session::SessionCommands,
    },
    /// List the models available for chat
    Models,
    /// List, inspect, or delete conversations
    Conversations {
        #[command(subcommand)]
        command: commands::conversations::ConversationCommands,
    },
    /// Send a message and stream the assistant's reply
    Chat(commands::chat::ChatArgs),
    /// Show the credit balance, optionally topping up first
    Balance(commands::balance::BalanceArgs),
    /// Generate a default configuration file on stdout
    Config,
    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type (e.g. bash, zsh, fish, powershell)
        #[arg(long, short)]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();
    let config = ClientConfig::load_config(cli.config.clone())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Session { command } => commands::session::handle(command, &config).await?,
        Commands::Models => commands::models::handle(&config).await?,
        Commands::Conversations { command } => {
            commands::conversations::handle(command, &config).await?;
        }
        Commands::Chat(args) => commands::chat::handle(args, &config).await?,
        Commands::Balance(args) => commands::balance::handle(args, &config).await?,
        Commands::Config => print!("{}", config.to_toml()),
        Commands::Completion { shell } => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(shell, &mut command, name, &mut std::io::stdout());
        }
    }

    Ok(())
}
