//! Configuration file commands.

use clap::Subcommand;
use imgtier::config::{config_file_path, format_size, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the configuration file path
    Path,
    /// Print the effective configuration
    Show,
    /// Write a default configuration file if none exists
    Init,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
        }
        ConfigCommands::Show => {
            let config = ConfigFile::load()?;
            print_config(&config);
        }
        ConfigCommands::Init => {
            let existed = config_file_path().exists();
            let path = ConfigFile::ensure_exists()?;
            if existed {
                println!("Config file already exists: {}", path.display());
            } else {
                println!("Created config file: {}", path.display());
            }
        }
    }
    Ok(())
}

fn print_config(config: &ConfigFile) {
    println!("[cache]");
    println!("  directory    = {}", config.cache.directory.display());
    println!("  memory_size  = {}", format_size(config.cache.memory_size));
    println!("[download]");
    println!("  timeout      = {}", config.download.timeout);
    println!("  user_agent   = {}", config.download.user_agent);
    println!("[codec]");
    println!("  format       = {}", config.codec.format);
    println!("  jpeg_quality = {}", config.codec.jpeg_quality);
    println!("[logging]");
    println!("  directory    = {}", config.logging.directory.display());
    println!("  file         = {}", config.logging.file);
}
