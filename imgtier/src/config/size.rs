//! Human-readable byte sizes ("256MB", "1GB").

use thiserror::Error;

/// Error parsing a size string.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid size '{input}' - expected format like '256MB', '1GB', or '1024KB'")]
pub struct SizeParseError {
    input: String,
}

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Two-letter suffixes are tried first.
const UNITS: [(&str, usize); 6] = [("GB", GB), ("MB", MB), ("KB", KB), ("G", GB), ("M", MB), ("K", KB)];

/// Parse a size such as `1024`, `64K`, `256MB` or `2 GB` into bytes.
///
/// Suffixes are case-insensitive and binary (1KB = 1024 bytes). Decimals are
/// not accepted.
///
/// ```
/// use imgtier::config::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("256mb").unwrap(), 256 * 1024 * 1024);
/// assert!(parse_size("1.5GB").is_err());
/// ```
pub fn parse_size(s: &str) -> Result<usize, SizeParseError> {
    let trimmed = s.trim();
    let error = || SizeParseError {
        input: trimmed.to_string(),
    };

    let upper = trimmed.to_ascii_uppercase();
    let (digits, multiplier) = UNITS
        .iter()
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|rest| (trimmed[..rest.len()].trim(), *multiplier))
        })
        .unwrap_or((trimmed, 1));

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(error());
    }

    let value: usize = digits.parse().map_err(|_| error())?;
    value.checked_mul(multiplier).ok_or_else(error)
}

/// Format bytes using the largest unit that divides them exactly.
///
/// ```
/// use imgtier::config::format_size;
///
/// assert_eq!(format_size(256 * 1024 * 1024), "256MB");
/// assert_eq!(format_size(1000), "1000");
/// ```
pub fn format_size(bytes: usize) -> String {
    for (suffix, unit) in &UNITS[..3] {
        if bytes >= *unit && bytes % unit == 0 {
            return format!("{}{}", bytes / unit, suffix);
        }
    }
    bytes.to_string()
}
