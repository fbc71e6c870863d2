//! Host-facing extension traits
//!
//! A host application talks to a content source through these three traits.
//! All returned futures are `Send` so hosts can drive them on a multi-threaded
//! runtime.

use crate::ExtensionError;
use crate::models::{Episode, FeedCollection, Show, ShowEntry, VideoAsset};
use std::future::Future;

/// Search and detail lookups
pub trait MetadataExtension {
    /// Searches for shows matching a free-text query
    fn fetch_shows_by_query(
        &self,
        query: &str,
    ) -> impl Future<Output = Result<Vec<ShowEntry>, ExtensionError>> + Send;

    /// Fetches the full details of a `<numericId>-<slug>` show
    fn fetch_show(&self, id: &str) -> impl Future<Output = Result<Show, ExtensionError>> + Send;

    /// Fetches the episodes of one season in catalog order
    fn fetch_episodes(
        &self,
        id: &str,
        season: u32,
    ) -> impl Future<Output = Result<Vec<Episode>, ExtensionError>> + Send;
}

/// Playable stream lookups
pub trait VideoExtension {
    /// Resolves an asset id into playable streams
    ///
    /// The id is `<numericId>` for movies or `<numericId>?episode_id=<episodeId>`
    /// for episodes. The returned list always holds exactly one asset.
    fn fetch_video_assets(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Vec<VideoAsset>, ExtensionError>> + Send;
}

/// Home feed snapshots
pub trait FeedExtension {
    fn fetch_feed_collections(
        &self,
    ) -> impl Future<Output = Result<Vec<FeedCollection>, ExtensionError>> + Send;

    fn fetch_trending_shows(&self) -> impl Future<Output = Result<Vec<Show>, ExtensionError>> + Send;
}
