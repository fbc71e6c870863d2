//! Primary content catalog
//!
//! The catalog provides search, title details, season episodes and the player
//! page for each playable asset. Unlike the metadata providers its failures
//! are fatal to the operation that needs it.

mod client;
mod types;

pub(crate) use client::{CatalogClient, parse_show_id};
pub(crate) use types::TitleType;

use crate::html::HttpError;
use thiserror::Error;

/// Errors that can occur while talking to the catalog
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the catalog failed
    #[error("Catalog request failed: {0}")]
    Http(#[from] HttpError),

    /// The id does not have the `<numericId>-<slug>` / asset id shape
    #[error("Invalid catalog id: {0}")]
    InvalidId(String),

    /// A catalog URL could not be built
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The page did not carry the expected embedded data
    #[error("Unexpected page at {url}: {reason}")]
    InvalidPage { url: String, reason: String },

    /// No player iframe was found for the asset
    #[error("No player found for asset {0}")]
    MissingPlayer(String),
}
