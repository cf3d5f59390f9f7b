//! INI parsing: `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names map to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::{CodecFormat, ConfigFile};
use super::size::parse_size;

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Parse an `Ini` into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values present.
/// Empty values keep the default.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.cache.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("memory_size")) {
            config.cache.memory_size = parse_size(v).map_err(|_| {
                invalid("cache", "memory_size", v, "expected format like '256MB', '1GB', or '1024KB'")
            })?;
        }
    }

    if let Some(section) = ini.section(Some("download")) {
        if let Some(v) = non_empty(section.get("timeout")) {
            config.download.timeout = match v.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(invalid("download", "timeout", v, "must be a positive integer (seconds)")),
            };
        }
        if let Some(v) = non_empty(section.get("user_agent")) {
            config.download.user_agent = v.to_string();
        }
    }

    if let Some(section) = ini.section(Some("codec")) {
        if let Some(v) = non_empty(section.get("format")) {
            config.codec.format = match v.to_lowercase().as_str() {
                "jpeg" | "jpg" => CodecFormat::Jpeg,
                "png" => CodecFormat::Png,
                _ => return Err(invalid("codec", "format", v, "must be 'jpeg' or 'png'")),
            };
        }
        if let Some(v) = non_empty(section.get("jpeg_quality")) {
            config.codec.jpeg_quality = match v.parse::<u8>() {
                Ok(q) if (1..=100).contains(&q) => q,
                _ => return Err(invalid("codec", "jpeg_quality", v, "must be an integer from 1 to 100")),
            };
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = non_empty(section.get("directory")) {
            config.logging.directory = expand_tilde(v);
        }
        if let Some(v) = non_empty(section.get("file")) {
            config.logging.file = v.to_string();
        }
    }

    Ok(config)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Expand a leading `~/` to the home directory.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MEMORY_CACHE_SIZE;

    fn parse(content: &str) -> Result<ConfigFile, ConfigFileError> {
        parse_ini(&Ini::load_from_str(content).unwrap())
    }

    #[test]
    fn test_empty_ini_gives_defaults() {
        assert_eq!(parse("").unwrap(), ConfigFile::default());
    }

    #[test]
    fn test_cache_section() {
        let config = parse("[cache]\ndirectory = /srv/images\nmemory_size = 1GB\n").unwrap();

        assert_eq!(config.cache.directory, PathBuf::from("/srv/images"));
        assert_eq!(config.cache.memory_size, 1024 * 1024 * 1024);
    }

    #[test]
    fn test_empty_value_keeps_default() {
        let config = parse("[cache]\nmemory_size =\n").unwrap();
        assert_eq!(config.cache.memory_size, DEFAULT_MEMORY_CACHE_SIZE);
    }

    #[test]
    fn test_invalid_memory_size() {
        let err = parse("[cache]\nmemory_size = lots\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigFileError::InvalidValue { ref key, .. } if key == "memory_size"
        ));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        assert!(parse("[download]\ntimeout = 0\n").is_err());
        assert_eq!(parse("[download]\ntimeout = 12\n").unwrap().download.timeout, 12);
    }

    #[test]
    fn test_codec_section() {
        let config = parse("[codec]\nformat = PNG\njpeg_quality = 70\n").unwrap();

        assert_eq!(config.codec.format, CodecFormat::Png);
        assert_eq!(config.codec.jpeg_quality, 70);
    }

    #[test]
    fn test_codec_rejects_unknown_format_and_bad_quality() {
        assert!(parse("[codec]\nformat = webp\n").is_err());
        assert!(parse("[codec]\njpeg_quality = 0\n").is_err());
        assert!(parse("[codec]\njpeg_quality = 101\n").is_err());
    }

    #[test]
    fn test_logging_section() {
        let config = parse("[logging]\ndirectory = /var/log/imgtier\nfile = run.log\n").unwrap();

        assert_eq!(config.logging.directory, PathBuf::from("/var/log/imgtier"));
        assert_eq!(config.logging.file, "run.log");
    }

    #[test]
    fn test_expand_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_tilde("~/images"), home.join("images"));
        }
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_tilde("relative"), PathBuf::from("relative"));
    }
}
