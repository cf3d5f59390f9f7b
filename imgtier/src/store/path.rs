//! Key-to-path mapping for the blob store.

use crate::cache::ImageKey;
use crate::store::types::StorageError;
use sha2::{Digest, Sha256};
use std::path::{Component, Path, PathBuf};

/// Longest key used verbatim as a filename stem.
const MAX_PLAIN_STEM_LEN: usize = 128;

/// Length of a hex SHA-256 digest.
const DIGEST_HEX_LEN: usize = 64;

/// Filename for `key` with the given extension.
///
/// Keys that are safe as a single path component are used as-is
/// (`<key>.<extension>`). Anything else (separators, leading dots, control
/// characters, empty or very long keys) is replaced by the lowercase hex
/// SHA-256 of the key. A key that itself looks like a digest is hashed too,
/// so it can never land on another key's file.
///
/// ```
/// use imgtier::cache::ImageKey;
/// use imgtier::store::blob_filename;
///
/// assert_eq!(blob_filename(&ImageKey::new("avatar-42"), "jpg"), "avatar-42.jpg");
/// assert_eq!(blob_filename(&ImageKey::new("a/b"), "jpg").len(), 64 + 4);
/// ```
pub fn blob_filename(key: &ImageKey, extension: &str) -> String {
    let stem = if is_plain_stem(key.as_str()) {
        key.as_str().to_string()
    } else {
        hashed_stem(key.as_str())
    };
    format!("{}.{}", stem, extension)
}

/// Directory for an optional subdirectory under `root`.
///
/// # Errors
///
/// Returns [`StorageError::InvalidSubdirectory`] for absolute paths or paths
/// containing `..`.
pub fn directory_for(root: &Path, subdirectory: Option<&str>) -> Result<PathBuf, StorageError> {
    let Some(sub) = subdirectory.filter(|s| !s.is_empty()) else {
        return Ok(root.to_path_buf());
    };

    let sub_path = Path::new(sub);
    let only_normal = sub_path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    if !only_normal {
        return Err(StorageError::InvalidSubdirectory(sub.to_string()));
    }

    Ok(root.join(sub_path))
}

/// Full path of the blob for `key`.
///
/// ```
/// use std::path::{Path, PathBuf};
/// use imgtier::cache::ImageKey;
/// use imgtier::store::blob_path;
///
/// let path = blob_path(Path::new("/data/Images"), Some("avatars"), &ImageKey::new("u1"), "jpg").unwrap();
/// assert_eq!(path, PathBuf::from("/data/Images/avatars/u1.jpg"));
/// ```
pub fn blob_path(
    root: &Path,
    subdirectory: Option<&str>,
    key: &ImageKey,
    extension: &str,
) -> Result<PathBuf, StorageError> {
    Ok(directory_for(root, subdirectory)?.join(blob_filename(key, extension)))
}

fn is_plain_stem(key: &str) -> bool {
    !key.is_empty()
        && key.len() <= MAX_PLAIN_STEM_LEN
        && !key.starts_with('.')
        && !looks_like_digest(key)
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@' | '+'))
}

/// Case-insensitive so the mapping holds on case-folding filesystems.
fn looks_like_digest(key: &str) -> bool {
    key.len() == DIGEST_HEX_LEN && key.chars().all(|c| c.is_ascii_hexdigit())
}

fn hashed_stem(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_plain_key_used_verbatim() {
        let key = ImageKey::new("user_17.avatar");
        assert_eq!(blob_filename(&key, "jpg"), "user_17.avatar.jpg");
    }

    #[test]
    fn test_unsafe_keys_are_hashed() {
        for raw in ["", "..", ".hidden", "a/b", "a\\b", "with space", "ü"] {
            let name = blob_filename(&ImageKey::new(raw), "png");
            assert_eq!(name.len(), 64 + 4, "key {:?} should hash", raw);
            assert!(name.ends_with(".png"));
        }
    }

    #[test]
    fn test_digest_shaped_key_never_matches_hashed_filename() {
        let hashed = blob_filename(&ImageKey::new("https://cdn.example.com/a.png"), "png");
        let digest = hashed.trim_end_matches(".png");

        for raw in [digest.to_string(), digest.to_uppercase()] {
            let name = blob_filename(&ImageKey::new(raw.as_str()), "png");
            assert_ne!(name, hashed);
            assert_ne!(name.to_lowercase(), hashed);
            assert_eq!(name.len(), DIGEST_HEX_LEN + 4);
        }
    }

    #[test]
    fn test_short_hex_key_used_verbatim() {
        let key = ImageKey::new("deadbeef");
        assert_eq!(blob_filename(&key, "jpg"), "deadbeef.jpg");
    }

    #[test]
    fn test_long_key_is_hashed() {
        let key = ImageKey::new("k".repeat(MAX_PLAIN_STEM_LEN + 1));
        assert_eq!(blob_filename(&key, "jpg").len(), 68);
    }

    #[test]
    fn test_directory_for_root() {
        let root = Path::new("/store");
        assert_eq!(directory_for(root, None).unwrap(), PathBuf::from("/store"));
        assert_eq!(directory_for(root, Some("")).unwrap(), PathBuf::from("/store"));
    }

    #[test]
    fn test_directory_for_nested() {
        let root = Path::new("/store");
        assert_eq!(
            directory_for(root, Some("a/b")).unwrap(),
            PathBuf::from("/store/a/b")
        );
    }

    #[test]
    fn test_directory_for_rejects_escape() {
        let root = Path::new("/store");
        assert!(matches!(
            directory_for(root, Some("../etc")),
            Err(StorageError::InvalidSubdirectory(_))
        ));
        assert!(directory_for(root, Some("/abs")).is_err());
    }

    proptest! {
        /// The same key always maps to the same single-component filename.
        #[test]
        fn prop_filename_is_deterministic_single_component(raw in ".{0,200}") {
            let key = ImageKey::new(raw);
            let first = blob_filename(&key, "jpg");
            let second = blob_filename(&key, "jpg");

            prop_assert_eq!(&first, &second);
            prop_assert!(!first.contains('/'));
            prop_assert!(!first.contains('\\'));
            prop_assert!(!first.starts_with('.'));
        }

        /// A key spelled like another key's digest maps elsewhere.
        #[test]
        fn prop_hashed_and_plain_namespaces_are_disjoint(raw in "[a-z:.]{0,20}/[a-z:.]{0,20}") {
            let hashed = blob_filename(&ImageKey::new(raw), "jpg");
            let digest = hashed.trim_end_matches(".jpg").to_string();
            prop_assert_ne!(blob_filename(&ImageKey::new(digest), "jpg"), hashed);
        }

        /// Distinct keys never share a filename.
        #[test]
        fn prop_distinct_keys_distinct_filenames(a in "[a-z/]{1,20}", b in "[a-z/]{1,20}") {
            prop_assume!(a != b);
            prop_assert_ne!(
                blob_filename(&ImageKey::new(a), "jpg"),
                blob_filename(&ImageKey::new(b), "jpg")
            );
        }
    }
}
