/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API.
use serde::Deserialize;

/// The show returned by the TVMaze lookup endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    /// The name of the TV show
    pub name: String,
    /// Poster artwork (may be null for obscure shows)
    pub image: Option<TvMazeImage>,
    /// Show summary in HTML format (may be null)
    pub summary: Option<String>,
}

/// Poster URLs in the two sizes TVMaze serves.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    /// Resized poster (210x295)
    pub medium: Option<String>,
    /// Poster at upload resolution
    pub original: Option<String>,
}
