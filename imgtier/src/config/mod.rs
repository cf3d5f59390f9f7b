//! User configuration stored in `~/.imgtier/config.ini`.
//!
//! # Example
//!
//! ```
//! use imgtier::config::{parse_size, ConfigFile};
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.cache.memory_size, parse_size("256MB").unwrap());
//! assert_eq!(config.download.timeout, 30);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod size;
mod writer;

pub use defaults::{
    default_cache_directory, default_log_directory, DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_LOG_FILE,
    DEFAULT_MEMORY_CACHE_SIZE,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{CacheSettings, CodecFormat, CodecSettings, ConfigFile, DownloadSettings, LoggingSettings};
pub use size::{format_size, parse_size, SizeParseError};
