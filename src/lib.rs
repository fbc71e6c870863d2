//! StreamScout - Metadata and stream aggregation for a streaming catalog
//!
//! This library answers a host application's catalog requests: it searches the
//! primary catalog, enriches show details with artwork and ratings from TMDB,
//! IMDB and TVMaze, lists season episodes and resolves embedded player pages
//! into directly playable stream URLs.
//!
//! # Examples
//!
//! ```no_run
//! use streamscout::{Extension, ExtensionConfig, MetadataExtension};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let extension = Extension::new(ExtensionConfig::load(None)?)?;
//! let show = extension.fetch_show("835-jurassic-park").await?;
//! println!("{} ({:?})", show.title, show.kind);
//! # Ok(())
//! # }
//! ```

mod catalog;
mod config;
mod extension;
mod feed;
mod html;
mod merge;
mod metadata_retrieval;
mod models;
mod player;

use catalog::{CatalogClient, TitleType, parse_show_id};
use feed::FeedStore;
use html::HtmlFetcher;
use merge::{ProviderRecords, merge_show};
use metadata_retrieval::{
    ImdbProvider, TmdbKind, TmdbProvider, TmdbQuery, TvMazeProvider, fetch_optional,
};
use player::PlayerResolver;
use url::Url;

// Re-export error types
pub use catalog::CatalogError;
pub use config::ConfigError;
pub use feed::FeedError;
pub use html::HttpError;
pub use metadata_retrieval::{FetchError, ProviderError};
pub use player::{ParseError, ResolveError};

pub use config::{CatalogConfig, ExtensionConfig, FeedConfig, HttpConfig, ProvidersConfig};
pub use extension::{FeedExtension, MetadataExtension, VideoExtension};
pub use merge::map_status;
pub use metadata_retrieval::{
    BACKDROP_RESOLUTION, LOGO_RESOLUTION, POSTER_RESOLUTION, normalize_image_url,
    sanitize_image_url, update_resolution_in_url,
};
pub use player::{
    PlayerScript, StreamParams, build_video_asset, parse_params_block, parse_player_script,
    playlist_base_url,
};
pub use models::{
    Episode, FeedCollection, Show, ShowEntry, ShowKind, ShowSeason, ShowStatus, VideoAsset,
};

use thiserror::Error;

/// Top-level error type for StreamScout operations
///
/// Each variant carries a fixed, user-facing message. The underlying cause is
/// available through [`std::error::Error::source`] and is logged when the
/// error is created.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// The shared HTTP client could not be built
    #[error("Failed to set up the HTTP client")]
    Setup(#[source] HttpError),

    /// Catalog search failed
    #[error("Failed to search shows")]
    Search(#[source] CatalogError),

    /// The catalog title could not be loaded
    #[error("Failed to fetch show")]
    Show(#[source] CatalogError),

    /// The catalog season could not be loaded
    #[error("Failed to fetch episodes")]
    Episodes(#[source] CatalogError),

    /// The catalog did not hand out a player page
    #[error("Failed to fetch video assets")]
    Player(#[source] CatalogError),

    /// The player page could not be resolved
    #[error("Failed to fetch video assets")]
    Resolve(#[source] ResolveError),

    /// A feed snapshot could not be loaded
    #[error("Failed to load feed")]
    Feed(#[source] FeedError),
}

impl ExtensionError {
    /// Logs the error together with its cause and returns it unchanged
    fn logged(self) -> Self {
        match std::error::Error::source(&self) {
            Some(cause) => tracing::error!(%cause, "{self}"),
            None => tracing::error!("{self}"),
        }
        self
    }
}

/// The catalog extension
///
/// Holds one client per upstream source. All clients share a single
/// connection pool.
#[derive(Debug, Clone)]
pub struct Extension {
    catalog: CatalogClient,
    tmdb: TmdbProvider,
    imdb: ImdbProvider,
    tvmaze: TvMazeProvider,
    resolver: PlayerResolver,
    feeds: FeedStore,
}

impl Extension {
    /// Creates an extension from a loaded configuration
    pub fn new(config: ExtensionConfig) -> Result<Self, ExtensionError> {
        let fetcher = HtmlFetcher::new(&config.http)
            .map_err(|e| ExtensionError::Setup(e).logged())?;

        let ExtensionConfig {
            catalog,
            providers,
            http,
            feed,
        } = config;

        Ok(Self {
            catalog: CatalogClient::new(
                fetcher.clone(),
                catalog.base_url,
                catalog.cdn_url,
                catalog.language,
            ),
            tmdb: TmdbProvider::new(
                fetcher.clone(),
                providers.tmdb_url,
                providers.tmdb_primary_language,
                providers.tmdb_fallback_language,
            ),
            imdb: ImdbProvider::new(fetcher.clone(), providers.imdb_url),
            tvmaze: TvMazeProvider::new(fetcher.clone(), providers.tvmaze_url),
            resolver: PlayerResolver::new(fetcher, http.user_agent),
            feeds: FeedStore::new(feed.snapshot_dir),
        })
    }

    /// Fetches every optional provider record for a title
    ///
    /// Providers run one after another; a failing provider only leaves its
    /// slot empty.
    async fn provider_records(
        &self,
        title_type: TitleType,
        tmdb_id: Option<u64>,
        imdb_id: Option<&str>,
    ) -> ProviderRecords {
        let mut records = ProviderRecords::default();

        if let Some(id) = tmdb_id {
            let kind = match title_type {
                TitleType::Movie => TmdbKind::Movie,
                TitleType::Tv | TitleType::Other => TmdbKind::Tv,
            };
            records.tmdb = fetch_optional(&self.tmdb, &TmdbQuery { kind, id }).await;
        }

        if let Some(id) = imdb_id {
            records.imdb = fetch_optional(&self.imdb, id).await;

            if title_type == TitleType::Tv {
                records.tvmaze = fetch_optional(&self.tvmaze, id).await;
            }
        }

        records
    }
}

impl MetadataExtension for Extension {
    async fn fetch_shows_by_query(&self, query: &str) -> Result<Vec<ShowEntry>, ExtensionError> {
        let entries = self
            .catalog
            .search(query)
            .await
            .map_err(|e| ExtensionError::Search(e).logged())?;

        tracing::debug!(query, results = entries.len(), "Catalog search finished");

        Ok(entries
            .iter()
            .map(|entry| self.catalog.show_entry(entry))
            .collect())
    }

    async fn fetch_show(&self, id: &str) -> Result<Show, ExtensionError> {
        let props = self
            .catalog
            .title(id)
            .await
            .map_err(|e| ExtensionError::Show(e).logged())?;

        let show = self.catalog.show(id, &props);
        let title = &props.title;
        let records = self
            .provider_records(title.title_type, title.tmdb_id, title.imdb_id())
            .await;

        Ok(merge_show(show, title.title_type, &records))
    }

    async fn fetch_episodes(&self, id: &str, season: u32) -> Result<Vec<Episode>, ExtensionError> {
        let numeric_id = parse_show_id(id).map_err(|e| ExtensionError::Episodes(e).logged())?;

        let episodes = self
            .catalog
            .episodes(id, season)
            .await
            .map_err(|e| ExtensionError::Episodes(e).logged())?;

        Ok(episodes
            .iter()
            .map(|episode| self.catalog.episode(numeric_id, episode))
            .collect())
    }
}

impl VideoExtension for Extension {
    async fn fetch_video_assets(&self, id: &str) -> Result<Vec<VideoAsset>, ExtensionError> {
        let player_url: Url = self
            .catalog
            .video_url(id)
            .await
            .map_err(|e| ExtensionError::Player(e).logged())?;

        let asset = self
            .resolver
            .resolve(&player_url)
            .await
            .map_err(|e| ExtensionError::Resolve(e).logged())?;

        Ok(vec![asset])
    }
}

impl FeedExtension for Extension {
    async fn fetch_feed_collections(&self) -> Result<Vec<FeedCollection>, ExtensionError> {
        self.feeds
            .collections()
            .map_err(|e| ExtensionError::Feed(e).logged())
    }

    async fn fetch_trending_shows(&self) -> Result<Vec<Show>, ExtensionError> {
        self.feeds
            .trending()
            .map_err(|e| ExtensionError::Feed(e).logged())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_message_is_fixed() {
        let error = ExtensionError::Show(CatalogError::InvalidId("nope".to_string()));
        assert_eq!(error.to_string(), "Failed to fetch show");
        assert_eq!(
            error.source().map(|cause| cause.to_string()).as_deref(),
            Some("Invalid catalog id: nope")
        );
    }

    #[tokio::test]
    async fn test_invalid_episode_id() {
        let extension = Extension::new(ExtensionConfig::defaults().unwrap()).unwrap();
        let result = extension.fetch_episodes("mr-robot", 1).await;
        assert!(matches!(result, Err(ExtensionError::Episodes(CatalogError::InvalidId(_)))));
    }

    #[tokio::test]
    async fn test_feed_passthrough() {
        let extension = Extension::new(ExtensionConfig::defaults().unwrap()).unwrap();
        assert!(!extension.fetch_feed_collections().await.unwrap().is_empty());
        assert!(!extension.fetch_trending_shows().await.unwrap().is_empty());
    }
}
