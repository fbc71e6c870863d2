//! Host-facing data model
//!
//! These are the records handed to the host application. Field names follow the
//! host's JSON contract (`posterURL`, `releaseDate`, ...), so every struct
//! carries explicit serde renames.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Whether an entry is a single movie or an episodic series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowKind {
    Movie,
    Series,
}

/// Airing status of a show
///
/// The host also knows an `undefined` status; it is represented as `None`
/// wherever a status is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowStatus {
    Upcoming,
    Airing,
    Canceled,
    Ended,
}

/// A search or listing result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowEntry {
    pub kind: ShowKind,
    /// Composite catalog id in the form `<numericId>-<slug>`
    pub id: String,
    pub title: String,
    #[serde(rename = "posterURL", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    pub language: String,
}

/// A season reference inside a series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShowSeason {
    pub number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Full show details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Show {
    pub id: String,
    pub kind: ShowKind,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub genres: Vec<String>,
    /// Runtime in seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(rename = "releaseDate", default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasons: Option<Vec<ShowSeason>>,
    #[serde(rename = "posterURL", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "backdropURL", default, skip_serializing_if = "Option::is_none")]
    pub backdrop_url: Option<String>,
    #[serde(rename = "logoURL", default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ShowStatus>,
    #[serde(rename = "relatedShows", default, skip_serializing_if = "Option::is_none")]
    pub related_shows: Option<Vec<ShowEntry>>,
    pub language: String,
}

/// A single episode of a season
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    /// Asset id in the form `<numericId>?episode_id=<episodeId>`
    pub id: String,
    pub number: u32,
    #[serde(default)]
    pub overview: String,
    pub title: String,
    /// Runtime in seconds
    #[serde(default)]
    pub duration: u64,
    #[serde(rename = "thumbnailURL", default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

/// A directly playable stream endpoint and the headers needed to request it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoAsset {
    pub url: String,
    pub headers: BTreeMap<String, String>,
}

/// A named row of shows for the host's home feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedCollection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub shows: Vec<ShowEntry>,
}

/// A number that some sources serialize as a JSON string (`"8.2"`)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LooseNumber {
    Number(f64),
    Text(String),
}

impl LooseNumber {
    /// Returns the numeric value; unparsable or non-finite text yields `None`
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            LooseNumber::Number(n) => Some(*n),
            LooseNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }
        .filter(|n| n.is_finite())
    }
}

/// Converts a runtime in minutes to seconds, treating an absent value as zero
pub(crate) fn minutes_to_seconds(minutes: Option<u64>) -> u64 {
    minutes.unwrap_or(0) * 60
}
