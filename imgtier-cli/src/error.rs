//! CLI error handling with user-friendly messages.

use imgtier::config::ConfigFileError;
use imgtier::fetch::TransportError;
use imgtier::retrieval::FetchError;
use imgtier::store::StorageError;
use std::fmt;
use std::process;

/// CLI-specific errors.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(std::io::Error),
    /// Configuration could not be loaded or saved
    Config(ConfigFileError),
    /// A command-line argument is malformed
    InvalidArgument(String),
    /// HTTP client could not be created
    ClientCreation(TransportError),
    /// The request ended in a failure
    Fetch(FetchError),
    /// The request produced no image
    NothingDelivered(String),
    /// Cache maintenance failed
    Storage(StorageError),
    /// Failed to write the output image
    FileWrite { path: String, error: String },
}

impl CliError {
    /// Print the error with hints and exit with status 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Fetch(FetchError::Network(_)) => {
                eprintln!();
                eprintln!("Check that:");
                eprintln!("  1. The URL is reachable from this machine");
                eprintln!("  2. Any required headers were passed with --header NAME:VALUE");
                eprintln!("  3. [download] timeout in the config file is long enough");
            }
            CliError::Config(_) => {
                eprintln!();
                eprintln!("Run 'imgtier config path' to locate the file.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            CliError::ClientCreation(e) => write!(f, "Failed to create HTTP client: {}", e),
            CliError::Fetch(e) => write!(f, "Fetch failed: {}", e),
            CliError::NothingDelivered(key) => write!(f, "No image was delivered for '{}'", key),
            CliError::Storage(e) => write!(f, "Cache error: {}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "Failed to write file '{}': {}", path, error)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Config(e) => Some(e),
            CliError::ClientCreation(e) => Some(e),
            CliError::Fetch(e) => Some(e),
            CliError::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Storage(e)
    }
}

impl From<FetchError> for CliError {
    fn from(e: FetchError) -> Self {
        CliError::Fetch(e)
    }
}
