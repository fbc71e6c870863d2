//! Static feed snapshots
//!
//! The home feed and the trending list are pre-generated JSON snapshots that
//! ship inside the binary. A snapshot directory can be configured to serve
//! fresher copies; a file found there replaces the bundled one.

use crate::models::{FeedCollection, Show};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const COLLECTIONS_FILE: &str = "feed_collections.json";
const TRENDING_FILE: &str = "trending_shows.json";

static BUNDLED_COLLECTIONS: &str = include_str!("../assets/feed_collections.json");
static BUNDLED_TRENDING: &str = include_str!("../assets/trending_shows.json");

/// Errors that can occur while loading a feed snapshot
#[derive(Debug, Error)]
pub enum FeedError {
    /// Failed to read an override snapshot
    #[error("Failed to read feed snapshot {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Snapshot content is not valid JSON for its record type
    #[error("Failed to deserialize feed snapshot {path}: {source}")]
    DeserializationFailed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Read-only access to the two feed snapshots
#[derive(Debug, Clone, Default)]
pub(crate) struct FeedStore {
    snapshot_dir: Option<PathBuf>,
}

impl FeedStore {
    pub fn new(snapshot_dir: Option<PathBuf>) -> Self {
        Self { snapshot_dir }
    }

    /// Returns the home feed collections
    pub fn collections(&self) -> Result<Vec<FeedCollection>, FeedError> {
        self.load(COLLECTIONS_FILE, BUNDLED_COLLECTIONS)
    }

    /// Returns the trending shows
    pub fn trending(&self) -> Result<Vec<Show>, FeedError> {
        self.load(TRENDING_FILE, BUNDLED_TRENDING)
    }

    fn load<T: DeserializeOwned>(&self, file_name: &str, bundled: &str) -> Result<T, FeedError> {
        if let Some(path) = self.override_path(file_name) {
            tracing::debug!(path = %path.display(), "Loading feed snapshot override");

            let content = fs::read_to_string(&path).map_err(|e| FeedError::ReadFailed {
                path: path.clone(),
                source: e,
            })?;
            return parse(&content, &path);
        }

        parse(bundled, Path::new(file_name))
    }

    fn override_path(&self, file_name: &str) -> Option<PathBuf> {
        let path = self.snapshot_dir.as_ref()?.join(file_name);
        path.exists().then_some(path)
    }
}

fn parse<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T, FeedError> {
    serde_json::from_str(content).map_err(|e| FeedError::DeserializationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShowKind;

    #[test]
    fn test_bundled_snapshots_parse() {
        let store = FeedStore::default();

        let collections = store.collections().unwrap();
        assert!(!collections.is_empty());
        assert!(collections.iter().all(|c| !c.id.is_empty()));

        let trending = store.trending().unwrap();
        assert!(!trending.is_empty());
    }

    #[test]
    fn test_override_wins() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(COLLECTIONS_FILE),
            r#"[{"id": "top10", "name": "Top 10", "shows": [
                {"kind": "movie", "id": "835-jurassic-park", "title": "Jurassic Park", "language": "it"}
            ]}]"#,
        )
        .unwrap();

        let store = FeedStore::new(Some(dir.path().to_path_buf()));
        let collections = store.collections().unwrap();

        assert_eq!(collections.len(), 1);
        assert_eq!(collections[0].id, "top10");
        assert_eq!(collections[0].shows[0].kind, ShowKind::Movie);

        // no override for the trending file, bundled data is used
        assert!(!store.trending().unwrap().is_empty());
    }

    #[test]
    fn test_invalid_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TRENDING_FILE);
        fs::write(&path, "{not json").unwrap();

        let store = FeedStore::new(Some(dir.path().to_path_buf()));
        match store.trending() {
            Err(FeedError::DeserializationFailed { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
