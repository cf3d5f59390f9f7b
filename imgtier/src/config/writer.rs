//! INI serialization: `ConfigFile` → commented INI string.

use std::path::Path;

use super::settings::ConfigFile;
use super::size::format_size;

/// Render `config` as the commented INI written to `config.ini`.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    format!(
        r#"[cache]
; Root directory for stored images. Subdirectories are created on demand.
; If empty, defaults to <platform cache dir>/imgtier/Images
directory = {}
; Memory cache capacity for decoded images (default: 256MB)
; Supports: KB, MB, GB suffixes (e.g., 64MB, 512MB, 1GB)
memory_size = {}

[download]
; Timeout in seconds for HTTP requests (default: 30)
timeout = {}
; User-Agent header sent with every request
user_agent = {}

[codec]
; Encoding for images written to disk: jpeg or png (default: jpeg)
format = {}
; JPEG quality from 1 to 100 (default: 100, ignored for png)
jpeg_quality = {}

[logging]
; Directory for log files (default: ~/.imgtier/logs)
directory = {}
; Log file name (default: imgtier.log)
file = {}
"#,
        path_to_string(&config.cache.directory),
        format_size(config.cache.memory_size),
        config.download.timeout,
        config.download.user_agent,
        config.codec.format,
        config.codec.jpeg_quality,
        path_to_string(&config.logging.directory),
        config.logging.file,
    )
}

/// Display string for a path, collapsing the home directory to `~`.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_has_every_section() {
        let output = to_config_string(&ConfigFile::default());

        for section in ["[cache]", "[download]", "[codec]", "[logging]"] {
            assert!(output.contains(section), "missing {}", section);
        }
        assert!(output.contains("memory_size = 256MB"));
        assert!(output.contains("format = jpeg"));
        assert!(output.contains("jpeg_quality = 100"));
    }

    #[test]
    fn test_output_parses_back() {
        let output = to_config_string(&ConfigFile::default());
        let ini = ini::Ini::load_from_str(&output).unwrap();

        let parsed = super::super::parser::parse_ini(&ini).unwrap();

        assert_eq!(parsed.cache.memory_size, ConfigFile::default().cache.memory_size);
        assert_eq!(parsed.download.user_agent, ConfigFile::default().download.user_agent);
    }

    #[test]
    fn test_home_paths_collapse_to_tilde() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path_to_string(&home.join("pics")), "~/pics");
        }
    }
}
