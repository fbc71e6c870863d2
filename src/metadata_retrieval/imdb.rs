/// IMDB metadata provider implementation.
use super::imdb_types::ImdbLdJson;
use super::{FetchError, MetadataProvider, ProviderError};
use crate::html::{HtmlFetcher, join_path};
use scraper::{Html, Selector};
use std::sync::LazyLock;
use url::Url;

static LD_JSON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

/// Poster and rating scraped from an IMDB title page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImdbShow {
    pub name: Option<String>,
    pub image: Option<String>,
    /// Aggregate user rating
    pub rating: Option<f64>,
}

/// Metadata provider for IMDB title pages.
///
/// This provider reads the JSON-LD document embedded in
/// `https://www.imdb.com/title/<imdb_id>/`.
#[derive(Debug, Clone)]
pub struct ImdbProvider {
    fetcher: HtmlFetcher,
    base_url: Url,
}

impl ImdbProvider {
    /// Creates a new IMDB provider instance.
    pub(crate) fn new(fetcher: HtmlFetcher, base_url: Url) -> Self {
        Self { fetcher, base_url }
    }

    async fn fetch_show(&self, imdb_id: &str) -> Result<ImdbShow, ProviderError> {
        if !is_imdb_id(imdb_id) {
            return Err(ProviderError::InvalidData(format!(
                "Not an IMDB title id: {imdb_id}"
            )));
        }

        let path = format!("title/{imdb_id}/");
        let url = join_path(&self.base_url, &path).map_err(|e| ProviderError::InvalidUrl {
            url: format!("{}{}", self.base_url, path),
            source: e,
        })?;

        let html = self.fetcher.fetch_text(&url, None).await?;
        parse_title_page(&html)
    }
}

impl MetadataProvider for ImdbProvider {
    type Id = str;
    type Record = ImdbShow;

    const NAME: &'static str = "IMDB";

    async fn fetch(&self, id: &str) -> Result<ImdbShow, FetchError> {
        self.fetch_show(id)
            .await
            .map_err(|e| FetchError::new(Self::NAME, e))
    }
}

/// Checks for the `tt` + digits shape of IMDB title ids.
fn is_imdb_id(id: &str) -> bool {
    id.strip_prefix("tt")
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Extracts name, image and rating from the JSON-LD block of a title page.
pub(crate) fn parse_title_page(html: &str) -> Result<ImdbShow, ProviderError> {
    let document = Html::parse_document(html);

    let json = document
        .select(&LD_JSON)
        .next()
        .map(|script| script.text().collect::<String>())
        .ok_or_else(|| ProviderError::InvalidData("No JSON-LD block on title page".to_string()))?;

    let data: ImdbLdJson =
        serde_json::from_str(&json).map_err(|e| ProviderError::InvalidData(e.to_string()))?;

    Ok(ImdbShow {
        name: data.name,
        image: data.image.filter(|image| !image.is_empty()),
        rating: data
            .aggregate_rating
            .and_then(|rating| rating.rating_value)
            .and_then(|value| value.as_f64()),
    })
}
