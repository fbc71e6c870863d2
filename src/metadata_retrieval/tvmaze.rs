/// TVMaze metadata provider implementation.
use super::tvmaze_types::TvMazeShow;
use super::{FetchError, MetadataProvider, ProviderError};
use crate::html::{HtmlFetcher, join_path};
use url::Url;

/// Poster artwork of a TVMaze show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MazeImage {
    pub medium: Option<String>,
    pub original: Option<String>,
}

/// A TVMaze show as used for enrichment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MazeShow {
    pub name: String,
    pub image: Option<MazeImage>,
    /// Plain text summary
    pub summary: String,
}

/// Metadata provider for the TVMaze API.
///
/// This provider looks shows up by IMDB id through
/// https://api.tvmaze.com/lookup/shows?imdb=<imdb_id>.
#[derive(Debug, Clone)]
pub struct TvMazeProvider {
    fetcher: HtmlFetcher,
    base_url: Url,
}

impl TvMazeProvider {
    /// Creates a new TVMaze provider instance.
    pub(crate) fn new(fetcher: HtmlFetcher, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    /// Converts a TVMaze show to our enrichment record.
    fn convert_show(tvmaze_show: TvMazeShow) -> MazeShow {
        MazeShow {
            name: tvmaze_show.name,
            image: tvmaze_show.image.map(|image| MazeImage {
                medium: image.medium,
                original: image.original,
            }),
            summary: tvmaze_show
                .summary
                .map(|s| nanohtml2text::html2text(&s).trim().to_string())
                .unwrap_or_default(),
        }
    }

    async fn fetch_show(&self, imdb_id: &str) -> Result<MazeShow, ProviderError> {
        // Build the API URL
        let mut url =
            join_path(&self.base_url, "lookup/shows").map_err(|e| ProviderError::InvalidUrl {
                url: format!("{}lookup/shows", self.base_url),
                source: e,
            })?;
        url.query_pairs_mut().append_pair("imdb", imdb_id);

        // The lookup endpoint redirects to the show resource, which reqwest follows
        let tvmaze_show: TvMazeShow = match self.fetcher.fetch_json(&url).await {
            Ok(show) => show,
            Err(e) if e.status() == Some(404) => {
                return Err(ProviderError::NotFound(imdb_id.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self::convert_show(tvmaze_show))
    }
}

impl MetadataProvider for TvMazeProvider {
    type Id = str;
    type Record = MazeShow;

    const NAME: &'static str = "TVMaze";

    async fn fetch(&self, id: &str) -> Result<MazeShow, FetchError> {
        self.fetch_show(id)
            .await
            .map_err(|e| FetchError::new(Self::NAME, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_show() {
        let json = r#"{
            "id": 1871,
            "name": "Mr. Robot",
            "image": {
                "medium": "https://static.tvmaze.com/uploads/images/medium_portrait/211/528026.jpg",
                "original": "https://static.tvmaze.com/uploads/images/original_untouched/211/528026.jpg"
            },
            "summary": "<p><b>Mr. Robot</b> follows Elliot, a young programmer.</p>"
        }"#;

        let show: TvMazeShow = serde_json::from_str(json).unwrap();
        let maze = TvMazeProvider::convert_show(show);

        assert_eq!(maze.name, "Mr. Robot");
        assert_eq!(
            maze.image.and_then(|image| image.original).as_deref(),
            Some("https://static.tvmaze.com/uploads/images/original_untouched/211/528026.jpg")
        );
        assert!(maze.summary.contains("Mr. Robot"));
        assert!(!maze.summary.contains("<b>"));
    }

    #[test]
    fn test_convert_show_without_image() {
        let show: TvMazeShow =
            serde_json::from_str(r#"{"name": "Obscure", "image": null, "summary": null}"#).unwrap();
        let maze = TvMazeProvider::convert_show(show);

        assert!(maze.image.is_none());
        assert!(maze.summary.is_empty());
    }
}
