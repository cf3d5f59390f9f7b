//! imgtier CLI - fetch images through the cache tiers and manage the caches.

use clap::{Parser, Subcommand};

mod commands;
mod error;

use commands::cache::CacheAction;
use commands::config::ConfigCommands;
use commands::fetch::FetchArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "imgtier", version = imgtier::VERSION)]
#[command(about = "Three-tier image retrieval: memory, disk, network", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch an image by key, printing each delivery
    Fetch(FetchArgs),
    /// Manage the disk cache
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result: Result<(), CliError> = match cli.command {
        Commands::Fetch(args) => commands::fetch::run(args).await,
        Commands::Cache { action } => commands::cache::run(action).await,
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
