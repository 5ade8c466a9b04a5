//! File naming for cache keys.

use sha2::{Digest, Sha256};

/// Extension of every entry file in the cache directory
const ENTRY_EXTENSION: &str = "json";

/// Maps a cache key to the name of its backing file.
///
/// The key is hashed so that any string (slashes, `..`, unicode, empty) yields
/// a flat, platform-safe file name.
pub fn file_name(key: &str) -> String {
    let digest = Sha256::digest(key.as_bytes());
    format!("{}.{}", hex::encode(digest), ENTRY_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_name_is_stable() {
        assert_eq!(file_name("test"), file_name("test"));
    }

    #[test]
    fn test_file_name_differs_per_key() {
        assert_ne!(file_name("test"), file_name("Test"));
        assert_ne!(file_name("a/b"), file_name("a_b"));
    }

    #[test]
    fn test_file_name_format() {
        let name = file_name("../../etc/passwd");
        let stem = name.strip_suffix(".json").expect("Should end with .json");
        assert_eq!(stem.len(), 64);
        assert!(stem.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_file_name_for_empty_key() {
        // sha256 of the empty string
        assert_eq!(
            file_name(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855.json"
        );
    }
}
