//! Video asset resolution from embedded player pages
//!
//! The catalog hands out a player page URL (`https://<host>/embed/<id>?...`).
//! The page's inline scripts carry the signed playlist parameters; this module
//! fetches the page, parses its scripts and builds the final playlist URL.

mod playlist;
mod stream_params;

pub use playlist::build_video_asset;
pub use stream_params::{
    ParseError, PlayerScript, StreamParams, parse_params_block, parse_player_script,
    playlist_base_url,
};

use crate::html::{HtmlFetcher, HttpError, script_text};
use crate::models::VideoAsset;
use thiserror::Error;
use url::Url;

/// Errors that can occur while resolving a player page
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The player URL has no trailing id segment
    #[error("Missing ID from player url: {0}")]
    MissingId(String),

    /// The player page could not be fetched
    #[error("Failed to fetch player page: {0}")]
    Http(#[from] HttpError),

    /// The player page scripts could not be parsed
    #[error("Failed to parse player page: {0}")]
    Parse(#[from] ParseError),
}

/// Resolves player pages into playable video assets
#[derive(Debug, Clone)]
pub(crate) struct PlayerResolver {
    fetcher: HtmlFetcher,
    /// Forwarded as `User-Agent` on every resolved asset
    user_agent: Option<String>,
}

impl PlayerResolver {
    pub fn new(fetcher: HtmlFetcher, user_agent: Option<String>) -> Self {
        Self {
            fetcher,
            user_agent,
        }
    }

    /// Fetches a player page and returns its single playable asset
    pub async fn resolve(&self, player_url: &Url) -> Result<VideoAsset, ResolveError> {
        let id = asset_id(player_url)
            .ok_or_else(|| ResolveError::MissingId(player_url.to_string()))?;

        let html = self.fetcher.fetch_text(player_url, None).await?;
        let scripts = script_text(&html);

        let script = parse_player_script(&scripts, &id, player_url)?;
        tracing::debug!(
            id,
            base_url = %script.base_url,
            params = script.params.pairs().len(),
            "parsed player page"
        );

        Ok(build_video_asset(
            &script,
            player_url,
            self.user_agent.as_deref(),
        ))
    }
}

/// Returns the last non-empty path segment of a player URL
pub fn asset_id(player_url: &Url) -> Option<String> {
    player_url
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()
        .map(str::to_string)
}
