//! Catalog response types for deserialization.
//!
//! Title and season pages are Inertia apps: the server embeds the page props
//! as JSON in the `data-page` attribute of the root element. Search is a plain
//! JSON endpoint.

use crate::models::LooseNumber;
use serde::Deserialize;

/// Catalog media type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TitleType {
    Movie,
    Tv,
    #[serde(other)]
    Other,
}

/// An image reference; the file is served from the catalog CDN
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogImage {
    pub filename: String,
    /// poster, background, cover, cover_mobile, logo, ...
    #[serde(rename = "type")]
    pub kind: String,
}

/// A title as it appears in search results and sliders
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub title_type: TitleType,
    #[serde(default)]
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogGenre {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CatalogSeason {
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
}

/// Full title details from a title page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogTitle {
    pub id: u64,
    pub slug: String,
    pub name: String,
    #[serde(rename = "type")]
    pub title_type: TitleType,
    #[serde(default)]
    pub plot: Option<String>,
    /// Score out of 10, sometimes serialized as a string
    #[serde(default)]
    pub score: Option<LooseNumber>,
    /// Runtime in minutes
    #[serde(default)]
    pub runtime: Option<u64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub last_air_date: Option<String>,
    /// Raw TMDB-style status ("Released", "Returning Series", ...)
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tmdb_id: Option<u64>,
    #[serde(default)]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub genres: Vec<CatalogGenre>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
    #[serde(default)]
    pub seasons: Vec<CatalogSeason>,
}

impl CatalogTitle {
    /// IMDB id, ignoring the empty strings the catalog uses for "unknown"
    pub fn imdb_id(&self) -> Option<&str> {
        self.imdb_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

/// An episode from a season page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEpisode {
    pub id: u64,
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub plot: Option<String>,
    /// Runtime in minutes
    #[serde(default)]
    pub duration: Option<u64>,
    #[serde(default)]
    pub images: Vec<CatalogImage>,
}

/// Envelope of the search endpoint
#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    pub data: Vec<CatalogEntry>,
}

/// The Inertia page object embedded in `data-page`
#[derive(Debug, Deserialize)]
pub(super) struct InertiaPage<P> {
    pub props: P,
}

/// A horizontal row of related titles on a title page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Slider {
    #[serde(default)]
    pub titles: Vec<CatalogEntry>,
}

/// Props of a title page
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TitleProps {
    pub title: CatalogTitle,
    #[serde(default)]
    pub sliders: Vec<Slider>,
}

/// Props of a season page
#[derive(Debug, Deserialize)]
pub(super) struct SeasonProps {
    #[serde(rename = "loadedSeason")]
    pub loaded_season: LoadedSeason,
}

#[derive(Debug, Deserialize)]
pub(super) struct LoadedSeason {
    #[serde(default)]
    pub episodes: Vec<CatalogEpisode>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_props_deserialize() {
        let json = r#"{
            "title": {
                "id": 835,
                "slug": "jurassic-park",
                "name": "Jurassic Park",
                "type": "movie",
                "plot": "Un miliardario crea un parco a tema.",
                "score": "8.2",
                "runtime": 127,
                "release_date": "1993-06-11",
                "status": "Released",
                "tmdb_id": 329,
                "imdb_id": "tt0107290",
                "genres": [{"id": 1, "name": "Avventura"}],
                "images": [{"filename": "abc.webp", "type": "poster"}],
                "seasons": []
            },
            "sliders": [{"name": "related", "titles": []}]
        }"#;

        let props: TitleProps = serde_json::from_str(json).unwrap();
        assert_eq!(props.title.title_type, TitleType::Movie);
        assert_eq!(props.title.score.as_ref().and_then(LooseNumber::as_f64), Some(8.2));
        assert_eq!(props.title.imdb_id(), Some("tt0107290"));
        assert_eq!(props.sliders.len(), 1);
    }

    #[test]
    fn test_unknown_type_and_empty_imdb_id() {
        let json = r#"{"id": 1, "slug": "x", "name": "X", "type": "documentary", "imdb_id": ""}"#;
        let title: CatalogTitle = serde_json::from_str(json).unwrap();

        assert_eq!(title.title_type, TitleType::Other);
        assert_eq!(title.imdb_id(), None);
        assert!(title.genres.is_empty());
    }
}
