//! Settings structs, one per `[section]` of the INI file.

use crate::codec::OutputFormat;
use std::fmt;
use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub cache: CacheSettings,
    pub download: DownloadSettings,
    pub codec: CodecSettings,
    pub logging: LoggingSettings,
}

/// `[cache]`
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSettings {
    /// Blob store root
    pub directory: PathBuf,
    /// Memory cache capacity in bytes of decoded pixels
    pub memory_size: usize,
}

/// `[download]`
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSettings {
    /// Timeout in seconds for HTTP requests
    pub timeout: u64,
    pub user_agent: String,
}

/// Storage encoding named in `[codec] format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodecFormat {
    #[default]
    Jpeg,
    Png,
}

impl fmt::Display for CodecFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecFormat::Jpeg => f.write_str("jpeg"),
            CodecFormat::Png => f.write_str("png"),
        }
    }
}

/// `[codec]`
#[derive(Debug, Clone, PartialEq)]
pub struct CodecSettings {
    pub format: CodecFormat,
    /// JPEG quality 1-100, ignored for PNG
    pub jpeg_quality: u8,
}

impl CodecSettings {
    /// Codec output policy described by these settings.
    pub fn output_format(&self) -> OutputFormat {
        match self.format {
            CodecFormat::Jpeg => OutputFormat::Jpeg {
                quality: self.jpeg_quality,
            },
            CodecFormat::Png => OutputFormat::Png,
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub directory: PathBuf,
    pub file: String,
}
