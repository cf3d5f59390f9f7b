//! Disk cache maintenance commands.

use clap::Subcommand;
use imgtier::config::{format_size, ConfigFile};
use imgtier::store::{BlobStore, DiskBlobStore};

use crate::error::CliError;

/// Cache action subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheAction {
    /// Delete stored images
    Clear {
        /// Only clear this subdirectory
        #[arg(long)]
        subdir: Option<String>,
    },
    /// Create the cache directory
    Init {
        /// Create this subdirectory instead of the root
        #[arg(long)]
        subdir: Option<String>,
    },
    /// Show the cache directory
    Path,
}

/// Run a cache subcommand.
pub async fn run(action: CacheAction) -> Result<(), CliError> {
    let config = ConfigFile::load()?;
    let extension = config.codec.output_format().extension();
    let store = DiskBlobStore::new(&config.cache.directory, extension);

    match action {
        CacheAction::Clear { subdir } => {
            println!("Clearing disk cache at: {}", store.root().display());
            let result = store.clear(subdir.as_deref()).await?;
            println!(
                "Deleted {} files, freed {}",
                result.files_deleted,
                format_size(result.bytes_freed as usize)
            );
        }
        CacheAction::Init { subdir } => {
            let dir = store.ensure_directory(subdir.as_deref()).await?;
            println!("Cache directory ready: {}", dir.display());
        }
        CacheAction::Path => {
            println!("{}", store.root().display());
        }
    }

    Ok(())
}
