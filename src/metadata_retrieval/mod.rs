//! Secondary metadata providers used to enrich catalog records.
//!
//! Each provider takes its own kind of id and returns its own record type.
//! Providers are optional by nature: a failing provider is reported as a
//! [`FetchError`] which the aggregation layer logs and downgrades to "no data"
//! through [`fetch_optional`].
mod imdb;
mod imdb_types;
mod tmdb;
mod tvmaze;
mod tvmaze_types;

pub use imdb::{ImdbProvider, ImdbShow};
pub use tmdb::{
    BACKDROP_RESOLUTION, LOGO_RESOLUTION, POSTER_RESOLUTION, TmdbKind, TmdbProvider, TmdbQuery,
    TmdbShow, normalize_image_url, sanitize_image_url, update_resolution_in_url,
};
pub use tvmaze::{MazeShow, TvMazeProvider};

#[cfg(test)]
pub(crate) use tvmaze::MazeImage;

use crate::html::HttpError;
use std::fmt::Display;
use std::future::Future;
use thiserror::Error;

/// Underlying causes of a provider failure.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Request to the provider failed
    #[error("Request failed: {0}")]
    RequestError(#[from] HttpError),

    /// The provider has no record for the id
    #[error("Not found: {0}")]
    NotFound(String),

    /// A URL could not be built or an extracted URL is not absolute
    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },

    /// The page or API returned invalid or unexpected data
    #[error("Provider returned invalid data: {0}")]
    InvalidData(String),
}

/// A provider call failed.
///
/// The message is fixed so it is safe to surface; the actual cause is kept as
/// the error source for logging.
#[derive(Debug, Error)]
#[error("Failed to fetch show data from {provider}")]
pub struct FetchError {
    pub provider: &'static str,
    #[source]
    pub source: ProviderError,
}

impl FetchError {
    pub fn new(provider: &'static str, source: ProviderError) -> Self {
        Self { provider, source }
    }
}

/// Trait for metadata providers that can fetch enrichment records.
pub(crate) trait MetadataProvider {
    /// The provider-specific identifier
    type Id: Display + Sync + ?Sized;
    /// The provider-specific record
    type Record: Send;

    /// Provider name used in errors and logs
    const NAME: &'static str;

    /// Fetches the record for the given id.
    ///
    /// # Returns
    ///
    /// The provider's record, or a FetchError wrapping the cause
    fn fetch(&self, id: &Self::Id) -> impl Future<Output = Result<Self::Record, FetchError>> + Send;
}

/// Fetches from an optional provider, logging and swallowing any failure.
pub(crate) async fn fetch_optional<P>(provider: &P, id: &P::Id) -> Option<P::Record>
where
    P: MetadataProvider + Sync,
{
    match provider.fetch(id).await {
        Ok(record) => Some(record),
        Err(e) => {
            tracing::warn!(
                provider = P::NAME,
                %id,
                cause = %e.source,
                "Failed to fetch data from {}", P::NAME
            );
            None
        }
    }
}
