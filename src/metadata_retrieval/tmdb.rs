/// TMDB metadata provider implementation.
///
/// TMDB artwork is scraped from the public image gallery page
/// (`/<kind>/<id>/images/logos`) rather than the API, so no API key is needed.
/// The page's Open Graph tags carry the poster and backdrop, and the logo
/// gallery lists the available logos.
use super::{FetchError, MetadataProvider, ProviderError};
use crate::html::{HtmlFetcher, first_attr, join_path};
use scraper::{Html, Selector};
use std::fmt;
use std::sync::LazyLock;
use url::Url;

/// Resolution token used for posters.
pub const POSTER_RESOLUTION: &str = "w780";
/// Resolution token used for backdrops.
pub const BACKDROP_RESOLUTION: &str = "w1280";
/// Resolution token used for logos.
pub const LOGO_RESOLUTION: &str = "w500";

const MEDIA_HOST: &str = "media.themoviedb.org";
const IMAGE_HOST: &str = "image.tmdb.org";

const REFERER: &str = "https://google.com";

static OG_TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"head meta[property="og:title"]"#).unwrap());
static OG_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"head meta[property="og:description"]"#).unwrap());
static OG_IMAGE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"head meta[property="og:image"]"#).unwrap());
static LOGO_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul.images.logos li a.image[href]").unwrap());

/// TMDB media kind, which is also the first path segment of TMDB pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TmdbKind {
    Movie,
    Tv,
}

impl TmdbKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TmdbKind::Movie => "movie",
            TmdbKind::Tv => "tv",
        }
    }
}

impl fmt::Display for TmdbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identifies a TMDB title.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TmdbQuery {
    pub kind: TmdbKind,
    pub id: u64,
}

impl fmt::Display for TmdbQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

/// Artwork and texts scraped from TMDB.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TmdbShow {
    pub title: String,
    pub description: String,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub logo: Option<String>,
}

/// Raw fields of a single gallery page, before language fallback and
/// resolution normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TmdbPage {
    pub title: Option<String>,
    pub description: Option<String>,
    pub poster: Option<String>,
    pub backdrop: Option<String>,
    pub logo: Option<String>,
}

impl TmdbPage {
    fn has_all_images(&self) -> bool {
        self.poster.is_some() && self.backdrop.is_some() && self.logo.is_some()
    }
}

/// Metadata provider for TMDB gallery pages.
#[derive(Debug, Clone)]
pub struct TmdbProvider {
    fetcher: HtmlFetcher,
    base_url: Url,
    primary_language: String,
    fallback_language: String,
}

impl TmdbProvider {
    /// Creates a new TMDB provider instance.
    pub(crate) fn new(
        fetcher: HtmlFetcher,
        base_url: Url,
        primary_language: String,
        fallback_language: String,
    ) -> Self {
        Self {
            fetcher,
            base_url,
            primary_language,
            fallback_language,
        }
    }

    /// Fetches the primary language page and, when any artwork is missing,
    /// the fallback language page to fill the gaps.
    async fn fetch_show(&self, query: &TmdbQuery) -> Result<TmdbShow, ProviderError> {
        let primary = self.fetch_page(query, &self.primary_language).await?;

        let mut poster = primary.poster.clone();
        let mut backdrop = primary.backdrop.clone();
        let mut logo = primary.logo.clone();

        if !primary.has_all_images() {
            tracing::debug!(%query, language = %self.fallback_language, "filling missing TMDB artwork");
            let fallback = self.fetch_page(query, &self.fallback_language).await?;

            poster = poster.or(fallback.poster);
            backdrop = backdrop.or(fallback.backdrop);
            logo = logo.or(fallback.logo);
        }

        Ok(TmdbShow {
            title: primary.title.unwrap_or_default(),
            description: primary.description.unwrap_or_default(),
            poster: normalize_optional(poster, POSTER_RESOLUTION)?,
            backdrop: normalize_optional(backdrop, BACKDROP_RESOLUTION)?,
            logo: normalize_optional(logo, LOGO_RESOLUTION)?,
        })
    }

    async fn fetch_page(&self, query: &TmdbQuery, language: &str) -> Result<TmdbPage, ProviderError> {
        let path = format!("{}/{}/images/logos", query.kind, query.id);
        let mut url = join_path(&self.base_url, &path).map_err(|e| ProviderError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            source: e,
        })?;
        url.query_pairs_mut()
            .append_pair("language", language)
            .append_pair("image_language", language);

        let html = self.fetcher.fetch_text(&url, Some(REFERER)).await?;
        Ok(parse_gallery_page(&html, &url))
    }
}

impl MetadataProvider for TmdbProvider {
    type Id = TmdbQuery;
    type Record = TmdbShow;

    const NAME: &'static str = "TMDB";

    async fn fetch(&self, id: &TmdbQuery) -> Result<TmdbShow, FetchError> {
        self.fetch_show(id)
            .await
            .map_err(|e| FetchError::new(Self::NAME, e))
    }
}

/// Extracts title, description, the first two `og:image` tags (poster then
/// backdrop) and the first `.png` logo from a gallery page.
pub(crate) fn parse_gallery_page(html: &str, page_url: &Url) -> TmdbPage {
    let document = Html::parse_document(html);

    let mut images = document
        .select(&OG_IMAGE)
        .map(|meta| meta.value().attr("content").map(str::trim).unwrap_or_default().to_string());
    let poster = images.next().filter(|url| !url.is_empty());
    let backdrop = images.next().filter(|url| !url.is_empty());

    let logo = document
        .select(&LOGO_LINK)
        .filter_map(|link| link.value().attr("href"))
        .find(|href| href.to_ascii_lowercase().ends_with(".png"))
        .and_then(|href| page_url.join(href).ok())
        .map(String::from);

    TmdbPage {
        title: first_attr(&document, &OG_TITLE, "content"),
        description: first_attr(&document, &OG_DESCRIPTION, "content"),
        poster,
        backdrop,
        logo,
    }
}

fn normalize_optional(
    url: Option<String>,
    resolution: &str,
) -> Result<Option<String>, ProviderError> {
    url.map(|url| {
        normalize_image_url(&url, resolution).map_err(|e| ProviderError::InvalidUrl { url, source: e })
    })
    .transpose()
}

/// Rewrites `media.themoviedb.org` image URLs to the `image.tmdb.org` CDN.
///
/// Any other host is left untouched.
pub fn sanitize_image_url(url: &str) -> Result<String, url::ParseError> {
    let mut parsed = Url::parse(url)?;
    if parsed.host_str() != Some(MEDIA_HOST) {
        return Ok(url.to_string());
    }

    parsed.set_host(Some(IMAGE_HOST))?;
    Ok(parsed.to_string())
}

/// Replaces the resolution segment (second to last path segment) of a TMDB
/// image URL, e.g. `/t/p/w500/abc.jpg` becomes `/t/p/w780/abc.jpg`.
///
/// URLs already at `resolution`, or with fewer than two path segments, are
/// returned unchanged.
pub fn update_resolution_in_url(url: &str, resolution: &str) -> Result<String, url::ParseError> {
    let mut parsed = Url::parse(url)?;

    let mut parts: Vec<&str> = parsed
        .path()
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();
    if parts.len() < 2 {
        return Ok(url.to_string());
    }

    let index = parts.len() - 2;
    if parts[index] == resolution {
        return Ok(url.to_string());
    }

    parts[index] = resolution;
    let path = format!("/{}", parts.join("/"));
    parsed.set_path(&path);
    Ok(parsed.to_string())
}

/// Sanitizes the host, then sets the resolution.
pub fn normalize_image_url(url: &str, resolution: &str) -> Result<String, url::ParseError> {
    update_resolution_in_url(&sanitize_image_url(url)?, resolution)
}
