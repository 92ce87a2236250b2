//! Scanning of on-disk shop data directories.
//!
//! Each deployed shop owns a directory under the configured cache path, named
//! by its auth token. A directory is considered real shop data when it holds
//! the `data/config.json` marker file. Directories carrying the marker but
//! matching no shop row are "local shops" - orphaned or not yet registered.

use std::collections::HashSet;
use std::path::Path;

/// Check whether a shop's data directory is viewable.
///
/// True iff `<cache>/<auth_token>/data/config.json` exists.
#[must_use]
pub fn is_viewable(cache_dir: &Path, auth_token: &str) -> bool {
    cache_dir
        .join(auth_token)
        .join("data")
        .join("config.json")
        .is_file()
}

/// List shop data directories that match no registered auth token.
///
/// Only directories carrying the `data/config.json` marker count; anything
/// else under the cache path is ignored. A missing cache directory yields an
/// empty list. Results are sorted for stable responses.
#[must_use]
pub fn local_shops(cache_dir: &Path, known_tokens: &HashSet<&str>) -> Vec<String> {
    let Ok(entries) = std::fs::read_dir(cache_dir) else {
        return Vec::new();
    };

    let mut found: Vec<String> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| is_viewable(cache_dir, name))
        .filter(|name| !known_tokens.contains(name.as_str()))
        .collect();

    found.sort_unstable();
    found
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Create `<root>/<token>/data/config.json`.
    fn seed_shop_dir(root: &Path, token: &str) {
        let data = root.join(token).join("data");
        std::fs::create_dir_all(&data).unwrap();
        std::fs::write(data.join("config.json"), "{}").unwrap();
    }

    #[test]
    fn test_is_viewable_with_marker() {
        let tmp = tempfile::tempdir().unwrap();
        seed_shop_dir(tmp.path(), "tok-a");

        assert!(is_viewable(tmp.path(), "tok-a"));
        assert!(!is_viewable(tmp.path(), "tok-missing"));
    }

    #[test]
    fn test_is_viewable_requires_config_file() {
        let tmp = tempfile::tempdir().unwrap();
        // data/ exists but no config.json
        std::fs::create_dir_all(tmp.path().join("tok-b").join("data")).unwrap();

        assert!(!is_viewable(tmp.path(), "tok-b"));
    }

    #[test]
    fn test_local_shops_excludes_known_tokens() {
        let tmp = tempfile::tempdir().unwrap();
        seed_shop_dir(tmp.path(), "registered");
        seed_shop_dir(tmp.path(), "orphan-b");
        seed_shop_dir(tmp.path(), "orphan-a");

        let known = HashSet::from(["registered"]);
        assert_eq!(
            local_shops(tmp.path(), &known),
            vec!["orphan-a".to_owned(), "orphan-b".to_owned()]
        );
    }

    #[test]
    fn test_local_shops_ignores_directories_without_marker() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("no-marker")).unwrap();
        seed_shop_dir(tmp.path(), "real");

        assert_eq!(
            local_shops(tmp.path(), &HashSet::new()),
            vec!["real".to_owned()]
        );
    }

    #[test]
    fn test_local_shops_missing_cache_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("does-not-exist");
        assert!(local_shops(&missing, &HashSet::new()).is_empty());
    }
}
