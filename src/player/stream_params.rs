//! Embedded player script parsing
//!
//! The player page configures its video element through inline JavaScript:
//!
//! ```text
//! window.video = {...};
//! window.streams = [{"name":"Server1","active":false,"url":"https://..."}, ...];
//! window.masterPlaylist = {
//!     params: {
//!         'token': 'a1b2c3',
//!         'expires': '1735689600',
//!     },
//!     url: 'https://...',
//! }
//! window.canPlayFHD = true
//! ```
//!
//! The `params` object is not JSON (single quotes, trailing commas), so it is
//! scanned with a `'key': 'value'` pattern. `streams` is valid JSON and parsed
//! as such.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

static RE_PARAMS_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"params\s*:\s*\{([^}]*)\}").unwrap());

static RE_PARAM_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"'(\w+)'\s*:\s*'([^']+)'").unwrap());

static RE_STREAMS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.streams\s*=\s*(\[[^\]]+\])").unwrap());

static RE_CAN_PLAY_FHD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"window\.canPlayFHD\s*=\s*true").unwrap());

/// Errors raised for player scripts that cannot be resolved at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The mandatory `params` object is missing from the page scripts
    #[error("params block not found")]
    ParamsBlockNotFound,

    /// The player page URL has no host to serve the default playlist from
    #[error("player url has no host: {0}")]
    InvalidPlayerUrl(String),
}

/// Ordered key/value pairs lifted from the `params` object
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamParams {
    pairs: Vec<(String, String)>,
}

impl StreamParams {
    /// Pairs in source order
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Everything the playlist builder needs from a player page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerScript {
    /// Active stream origin, or the default playlist endpoint
    pub base_url: Url,
    pub params: StreamParams,
    /// `window.canPlayFHD = true` was present in the scripts
    pub can_play_fhd: bool,
}

/// Parses the concatenated script text of a player page
///
/// # Arguments
///
/// * `scripts` - Text content of every `<script>` element on the page
/// * `id` - Numeric id of the asset, used for the default playlist URL
/// * `player_url` - The player page URL; its host serves the default playlist
///
/// # Returns
///
/// The parsed script, or `ParseError::ParamsBlockNotFound` when the mandatory
/// `params` object is absent. Problems with `window.streams` never fail.
pub fn parse_player_script(
    scripts: &str,
    id: &str,
    player_url: &Url,
) -> Result<PlayerScript, ParseError> {
    let block = RE_PARAMS_BLOCK
        .captures(scripts)
        .and_then(|caps| caps.get(1))
        .ok_or(ParseError::ParamsBlockNotFound)?;

    Ok(PlayerScript {
        base_url: playlist_base_url(scripts, id, player_url)?,
        params: parse_params_block(block.as_str()),
        can_play_fhd: RE_CAN_PLAY_FHD.is_match(scripts),
    })
}

/// Scans the body of a `params: { ... }` block for `'key': 'value'` pairs
pub fn parse_params_block(block: &str) -> StreamParams {
    let pairs = RE_PARAM_PAIR
        .captures_iter(block)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
        .collect();

    StreamParams { pairs }
}

/// Picks the active stream if there is one, else `https://<host>/playlist/<id>`
///
/// Only a player URL without a host can fail; a broken `window.streams`
/// always falls back to the default.
pub fn playlist_base_url(scripts: &str, id: &str, player_url: &Url) -> Result<Url, ParseError> {
    if let Some(url) = find_active_stream(scripts) {
        return Ok(url);
    }

    default_playlist_url(id, player_url)
}

/// Builds `https://<host>[:<port>]/playlist/<id>`, whatever the player scheme
fn default_playlist_url(id: &str, player_url: &Url) -> Result<Url, ParseError> {
    let invalid = || ParseError::InvalidPlayerUrl(player_url.to_string());

    let host = player_url
        .host_str()
        .filter(|host| !host.is_empty())
        .ok_or_else(invalid)?;
    let authority = match player_url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };

    Url::parse(&format!("https://{authority}/playlist/{id}")).map_err(|_| invalid())
}

/// Returns the URL of the first `window.streams` entry whose `active` is `true`
///
/// A missing assignment, malformed JSON, or an unparsable URL all yield `None`.
fn find_active_stream(scripts: &str) -> Option<Url> {
    let array = RE_STREAMS.captures(scripts)?.get(1)?.as_str();

    let streams: Vec<Value> = match serde_json::from_str(array) {
        Ok(streams) => streams,
        Err(e) => {
            tracing::debug!(error = %e, "ignoring malformed window.streams");
            return None;
        }
    };

    let active = streams
        .iter()
        .find(|stream| stream.get("active") == Some(&Value::Bool(true)))?;

    let url = active.get("url")?.as_str()?;
    Url::parse(url).ok()
}
