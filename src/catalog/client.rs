//! Catalog site client

use super::CatalogError;
use super::types::{
    CatalogEntry, CatalogEpisode, CatalogImage, InertiaPage, SearchResponse, SeasonProps,
    TitleProps, TitleType,
};
use crate::html::{HtmlFetcher, first_attr, join_path};
use crate::merge::map_status;
use crate::models::{Episode, Show, ShowEntry, ShowKind, ShowSeason, minutes_to_seconds};
use chrono::{Datelike, NaiveDate};
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use url::Url;

static INERTIA_ROOT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#app[data-page]").unwrap());
static PLAYER_IFRAME: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("iframe[src]").unwrap());

/// Client for the primary catalog site
#[derive(Debug, Clone)]
pub(crate) struct CatalogClient {
    fetcher: HtmlFetcher,
    base_url: Url,
    cdn_url: Url,
    /// Language tag attached to every mapped entry
    language: String,
}

impl CatalogClient {
    pub fn new(fetcher: HtmlFetcher, base_url: Url, cdn_url: Url, language: String) -> Self {
        Self {
            fetcher,
            base_url,
            cdn_url,
            language,
        }
    }

    /// Searches the catalog by free text
    pub async fn search(&self, query: &str) -> Result<Vec<CatalogEntry>, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut url = self.endpoint("api/search")?;
        url.query_pairs_mut().append_pair("q", query);

        let response: SearchResponse = self.fetcher.fetch_json(&url).await?;
        Ok(response.data)
    }

    /// Fetches the title page for a `<numericId>-<slug>` id
    pub async fn title(&self, id: &str) -> Result<TitleProps, CatalogError> {
        parse_show_id(id)?;

        let url = self.endpoint(&format!("titles/{id}"))?;
        self.fetch_inertia_props(&url).await
    }

    /// Fetches the episodes of one season, in catalog order
    pub async fn episodes(
        &self,
        id: &str,
        season: u32,
    ) -> Result<Vec<CatalogEpisode>, CatalogError> {
        parse_show_id(id)?;

        let url = self.endpoint(&format!("titles/{id}/season-{season}"))?;
        let props: SeasonProps = self.fetch_inertia_props(&url).await?;
        Ok(props.loaded_season.episodes)
    }

    /// Looks up the player page for an asset id
    ///
    /// Asset ids are either `<numericId>` for movies or
    /// `<numericId>?episode_id=<episodeId>` for episodes.
    pub async fn video_url(&self, asset_id: &str) -> Result<Url, CatalogError> {
        let (numeric_id, episode_id) = parse_asset_id(asset_id)?;

        let mut url = self.endpoint(&format!("iframe/{numeric_id}"))?;
        if let Some(episode_id) = episode_id {
            url.query_pairs_mut().append_pair("episode_id", &episode_id);
        }

        let html = self.fetcher.fetch_text(&url, None).await?;
        let src = {
            let document = Html::parse_document(&html);
            first_attr(&document, &PLAYER_IFRAME, "src")
        }
        .ok_or_else(|| CatalogError::MissingPlayer(asset_id.to_string()))?;

        url.join(&src).map_err(|e| CatalogError::InvalidUrl { url: src, source: e })
    }

    /// Returns the CDN URL of the first image of the given type
    pub fn image_url(&self, images: &[CatalogImage], kind: &str) -> Option<String> {
        let image = images.iter().find(|image| image.kind == kind)?;
        join_path(&self.cdn_url, &format!("images/{}", image.filename))
            .ok()
            .map(String::from)
    }

    /// Maps a search or slider entry to the host model
    pub fn show_entry(&self, entry: &CatalogEntry) -> ShowEntry {
        ShowEntry {
            kind: show_kind(entry.title_type),
            id: format!("{}-{}", entry.id, entry.slug),
            title: entry.name.clone(),
            poster_url: self.image_url(&entry.images, "poster"),
            year: entry.last_air_date.as_deref().and_then(parse_year),
            language: self.language.clone(),
        }
    }

    /// Maps a title page to the host model using catalog data only
    pub fn show(&self, id: &str, props: &TitleProps) -> Show {
        let title = &props.title;
        let kind = show_kind(title.title_type);

        let backdrop_url = ["background", "cover_mobile", "cover"]
            .into_iter()
            .find_map(|image_kind| self.image_url(&title.images, image_kind));

        let seasons = (kind == ShowKind::Series).then(|| {
            title
                .seasons
                .iter()
                .map(|season| ShowSeason {
                    number: season.number,
                    name: season.name.clone(),
                })
                .collect()
        });

        Show {
            id: id.to_string(),
            kind,
            title: title.name.clone(),
            overview: title.plot.clone().unwrap_or_default(),
            genres: title.genres.iter().map(|genre| genre.name.clone()).collect(),
            duration: minutes_to_seconds(title.runtime),
            release_date: title.release_date.clone(),
            seasons,
            poster_url: self.image_url(&title.images, "poster"),
            backdrop_url,
            logo_url: self.image_url(&title.images, "logo"),
            rating: title.score.as_ref().and_then(|score| score.as_f64()),
            status: map_status(title.status.as_deref()),
            related_shows: props
                .sliders
                .first()
                .map(|slider| slider.titles.iter().map(|entry| self.show_entry(entry)).collect()),
            language: self.language.clone(),
        }
    }

    /// Maps a season page episode to the host model
    pub fn episode(&self, numeric_id: &str, episode: &CatalogEpisode) -> Episode {
        Episode {
            id: format!("{numeric_id}?episode_id={}", episode.id),
            number: episode.number,
            overview: episode.plot.clone().unwrap_or_default(),
            title: episode.name.clone().unwrap_or_default(),
            duration: minutes_to_seconds(episode.duration),
            thumbnail_url: self.image_url(&episode.images, "cover"),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, CatalogError> {
        join_path(&self.base_url, path).map_err(|e| CatalogError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            source: e,
        })
    }

    async fn fetch_inertia_props<P: DeserializeOwned>(&self, url: &Url) -> Result<P, CatalogError> {
        let html = self.fetcher.fetch_text(url, None).await?;
        parse_inertia_props(&html).map_err(|reason| CatalogError::InvalidPage {
            url: url.to_string(),
            reason,
        })
    }
}

/// Decodes the props of the Inertia page object embedded in a document
fn parse_inertia_props<P: DeserializeOwned>(html: &str) -> Result<P, String> {
    let data = {
        let document = Html::parse_document(html);
        first_attr(&document, &INERTIA_ROOT, "data-page")
    }
    .ok_or_else(|| "no Inertia page data".to_string())?;

    let page: InertiaPage<P> = serde_json::from_str(&data).map_err(|e| e.to_string())?;
    Ok(page.props)
}

fn show_kind(title_type: TitleType) -> ShowKind {
    match title_type {
        TitleType::Movie => ShowKind::Movie,
        TitleType::Tv | TitleType::Other => ShowKind::Series,
    }
}

/// Extracts the year of a `YYYY-MM-DD` (optionally followed by a time) date
fn parse_year(date: &str) -> Option<i32> {
    let day = date.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .ok()
        .map(|date| date.year())
}

/// Returns the numeric part of a `<numericId>-<slug>` show id
pub(crate) fn parse_show_id(id: &str) -> Result<&str, CatalogError> {
    let numeric_id = id.split('-').next().unwrap_or_default();
    if numeric_id.is_empty() || !numeric_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CatalogError::InvalidId(id.to_string()));
    }
    Ok(numeric_id)
}

/// Splits an asset id into its numeric id and optional episode id
pub(crate) fn parse_asset_id(asset_id: &str) -> Result<(&str, Option<String>), CatalogError> {
    let (show_part, query) = match asset_id.split_once('?') {
        Some((show_part, query)) => (show_part, Some(query)),
        None => (asset_id, None),
    };

    let numeric_id =
        parse_show_id(show_part).map_err(|_| CatalogError::InvalidId(asset_id.to_string()))?;

    let episode_id = query.and_then(|query| {
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "episode_id")
            .map(|(_, value)| value.into_owned())
    });

    Ok((numeric_id, episode_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtensionConfig;
    use crate::models::ShowStatus;

    fn client() -> CatalogClient {
        let config = ExtensionConfig::defaults().unwrap();
        CatalogClient::new(
            HtmlFetcher::new(&config.http).unwrap(),
            Url::parse("https://catalog.example/").unwrap(),
            Url::parse("https://cdn.catalog.example/").unwrap(),
            "it".to_string(),
        )
    }

    fn image(filename: &str, kind: &str) -> CatalogImage {
        CatalogImage {
            filename: filename.to_string(),
            kind: kind.to_string(),
        }
    }

    fn title_props(title_type: &str) -> TitleProps {
        let json = format!(
            r#"{{
                "title": {{
                    "id": 147,
                    "slug": "mr-robot",
                    "name": "Mr. Robot",
                    "type": "{title_type}",
                    "plot": "Elliot",
                    "score": "8.5",
                    "runtime": 49,
                    "release_date": "2015-06-24",
                    "status": "Ended",
                    "genres": [{{"name": "Crime"}}, {{"name": "Dramma"}}],
                    "images": [
                        {{"filename": "cover.webp", "type": "cover"}},
                        {{"filename": "mobile.webp", "type": "cover_mobile"}},
                        {{"filename": "poster.webp", "type": "poster"}}
                    ],
                    "seasons": [{{"number": 1, "name": null}}, {{"number": 2}}]
                }},
                "sliders": [{{"titles": [
                    {{"id": 115, "slug": "rick-and-morty", "name": "Rick and Morty", "type": "tv", "last_air_date": "2023-12-17", "images": []}}
                ]}}]
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    #[test]
    fn test_parse_show_id() {
        assert_eq!(parse_show_id("835-jurassic-park").unwrap(), "835");
        assert_eq!(parse_show_id("835").unwrap(), "835");
        assert!(matches!(parse_show_id("jurassic-park"), Err(CatalogError::InvalidId(_))));
        assert!(matches!(parse_show_id(""), Err(CatalogError::InvalidId(_))));
    }

    #[test]
    fn test_parse_asset_id() {
        assert_eq!(parse_asset_id("835").unwrap(), ("835", None));
        assert_eq!(
            parse_asset_id("12264?episode_id=90021").unwrap(),
            ("12264", Some("90021".to_string()))
        );
        assert_eq!(
            parse_asset_id("12264?next_episode=1&episode_id=90021").unwrap(),
            ("12264", Some("90021".to_string()))
        );
        assert!(parse_asset_id("?episode_id=1").is_err());
    }

    #[test]
    fn test_parse_year() {
        assert_eq!(parse_year("1993-06-11"), Some(1993));
        assert_eq!(parse_year("2015-06-24T00:00:00.000000Z"), Some(2015));
        assert_eq!(parse_year("unknown"), None);
    }

    #[test]
    fn test_image_url() {
        let client = client();
        let images = vec![image("a.webp", "cover"), image("b.webp", "poster")];

        assert_eq!(
            client.image_url(&images, "poster").as_deref(),
            Some("https://cdn.catalog.example/images/b.webp")
        );
        assert_eq!(client.image_url(&images, "logo"), None);
    }

    #[test]
    fn test_show_entry() {
        let entry = CatalogEntry {
            id: 115,
            slug: "rick-and-morty".to_string(),
            name: "Rick and Morty".to_string(),
            title_type: TitleType::Tv,
            last_air_date: Some("2023-12-17".to_string()),
            images: vec![image("p.webp", "poster")],
        };

        let show_entry = client().show_entry(&entry);
        assert_eq!(show_entry.id, "115-rick-and-morty");
        assert_eq!(show_entry.kind, ShowKind::Series);
        assert_eq!(show_entry.year, Some(2023));
        assert_eq!(show_entry.language, "it");
        assert_eq!(
            show_entry.poster_url.as_deref(),
            Some("https://cdn.catalog.example/images/p.webp")
        );
    }

    #[test]
    fn test_show_series() {
        let show = client().show("147-mr-robot", &title_props("tv"));

        assert_eq!(show.kind, ShowKind::Series);
        assert_eq!(show.duration, 49 * 60);
        assert_eq!(show.rating, Some(8.5));
        assert_eq!(show.status, Some(ShowStatus::Ended));
        assert_eq!(show.genres, vec!["Crime", "Dramma"]);
        assert_eq!(show.seasons.as_ref().map(Vec::len), Some(2));
        // background is missing, cover_mobile wins over cover
        assert_eq!(
            show.backdrop_url.as_deref(),
            Some("https://cdn.catalog.example/images/mobile.webp")
        );
        assert_eq!(show.logo_url, None);
        assert_eq!(show.related_shows.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_show_movie_has_no_seasons() {
        let show = client().show("147-mr-robot", &title_props("movie"));
        assert_eq!(show.kind, ShowKind::Movie);
        assert!(show.seasons.is_none());
    }

    #[test]
    fn test_episode() {
        let episode = CatalogEpisode {
            id: 90021,
            number: 3,
            name: Some("eps1.2_d3bug.mkv".to_string()),
            plot: None,
            duration: Some(45),
            images: vec![image("thumb.webp", "cover")],
        };

        let mapped = client().episode("147", &episode);
        assert_eq!(mapped.id, "147?episode_id=90021");
        assert_eq!(mapped.number, 3);
        assert_eq!(mapped.duration, 2700);
        assert_eq!(mapped.overview, "");
        assert_eq!(
            mapped.thumbnail_url.as_deref(),
            Some("https://cdn.catalog.example/images/thumb.webp")
        );
    }

    #[test]
    fn test_parse_inertia_props() {
        let html = r#"<html><body><div id="app" data-page="{&quot;component&quot;:&quot;Titles/Season&quot;,&quot;props&quot;:{&quot;loadedSeason&quot;:{&quot;episodes&quot;:[{&quot;id&quot;:1,&quot;number&quot;:1}]}}}"></div></body></html>"#;

        let props: SeasonProps = parse_inertia_props(html).unwrap();
        assert_eq!(props.loaded_season.episodes.len(), 1);
    }

    #[test]
    fn test_parse_inertia_props_missing() {
        let result: Result<SeasonProps, String> = parse_inertia_props("<html></html>");
        assert!(result.is_err());
    }
}
