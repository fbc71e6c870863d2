//! Playlist URL construction

use super::stream_params::PlayerScript;
use crate::models::VideoAsset;
use std::collections::BTreeMap;
use url::Url;

/// Builds the playable asset for a parsed player page
///
/// Query parameters are appended to the base URL in this order: the extracted
/// `params` pairs, `b=1` when the request URL carried `b=1`, and `h=1` when
/// full HD is allowed either by the request URL (`canPlayFHD`) or the page
/// scripts. The request URL is always forwarded as `Referer`.
///
/// # Arguments
///
/// * `script` - The parsed player page
/// * `request_url` - The player page URL the scripts were fetched from
/// * `user_agent` - Optional user-agent override to forward with the asset
pub fn build_video_asset(
    script: &PlayerScript,
    request_url: &Url,
    user_agent: Option<&str>,
) -> VideoAsset {
    let mut extra: Vec<(&str, &str)> = script
        .params
        .pairs()
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let b_flag = request_url
        .query_pairs()
        .find(|(key, _)| key == "b")
        .is_some_and(|(_, value)| value == "1");
    if b_flag {
        extra.push(("b", "1"));
    }

    let fhd_requested = request_url.query_pairs().any(|(key, _)| key == "canPlayFHD");
    if fhd_requested || script.can_play_fhd {
        extra.push(("h", "1"));
    }

    // Touching query_pairs_mut on a query-less URL leaves a dangling '?'
    let mut url = script.base_url.clone();
    if !extra.is_empty() {
        url.query_pairs_mut().extend_pairs(extra);
    }

    let mut headers = BTreeMap::new();
    headers.insert("Referer".to_string(), request_url.to_string());
    if let Some(user_agent) = user_agent {
        headers.insert("User-Agent".to_string(), user_agent.to_string());
    }

    VideoAsset {
        url: url.to_string(),
        headers,
    }
}
