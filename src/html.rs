//! HTTP fetching and HTML field extraction
//!
//! Every network call in the crate goes through [`HtmlFetcher`]. Documents are
//! returned as plain strings and parsed with `scraper` inside synchronous
//! helpers, so no parsed DOM is ever held across an `.await`.

use crate::config::HttpConfig;
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;
use std::sync::LazyLock;
use thiserror::Error;
use url::Url;

/// Browser user agent used when no override is configured. Several providers
/// reject requests without one.
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.4 Safari/605.1.15";

static SCRIPT_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("script").unwrap());

/// Errors that can occur while fetching a document
#[derive(Debug, Error)]
pub enum HttpError {
    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// The request could not be sent or the body could not be read
    #[error("Request to {url} failed: {source}")]
    RequestFailed { url: String, source: reqwest::Error },

    /// The server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    /// The response body is not the expected JSON document
    #[error("Invalid JSON from {url}: {source}")]
    InvalidJson {
        url: String,
        source: serde_json::Error,
    },
}

impl HttpError {
    /// Returns the HTTP status code when the server answered with an error status
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Thin async wrapper around a shared `reqwest` client
#[derive(Debug, Clone)]
pub(crate) struct HtmlFetcher {
    client: reqwest::Client,
}

impl HtmlFetcher {
    /// Creates a fetcher using the configured timeout and user agent
    pub fn new(http: &HttpConfig) -> Result<Self, HttpError> {
        let user_agent = http.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT);

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(http.timeout())
            .build()
            .map_err(HttpError::ClientBuild)?;

        Ok(Self { client })
    }

    /// Fetches a URL and returns the response body as text
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL to request
    /// * `referer` - Optional `Referer` header value
    pub async fn fetch_text(&self, url: &Url, referer: Option<&str>) -> Result<String, HttpError> {
        tracing::debug!(%url, "fetching");

        let mut request = self.client.get(url.clone());
        if let Some(referer) = referer {
            request = request.header(reqwest::header::REFERER, referer);
        }

        let response = request.send().await.map_err(|e| HttpError::RequestFailed {
            url: url.to_string(),
            source: e,
        })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|e| HttpError::RequestFailed {
            url: url.to_string(),
            source: e,
        })
    }

    /// Fetches a URL and deserializes the JSON body
    pub async fn fetch_json<T: DeserializeOwned>(&self, url: &Url) -> Result<T, HttpError> {
        let body = self.fetch_text(url, None).await?;

        serde_json::from_str(&body).map_err(|e| HttpError::InvalidJson {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Joins a relative path onto a base URL, treating the base as a directory
/// even when it lacks a trailing slash
pub(crate) fn join_path(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let directory = format!("{}/", base.path());
        base.set_path(&directory);
    }
    base.join(path.trim_start_matches('/'))
}

/// Returns the concatenated text of every `<script>` element in a document
pub(crate) fn script_text(html: &str) -> String {
    let document = Html::parse_document(html);
    document
        .select(&SCRIPT_SELECTOR)
        .map(|script| script.text().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Returns the given attribute of the first element matching `selector`
pub(crate) fn first_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .filter_map(|element| element.value().attr(attr))
        .map(str::trim)
        .find(|value| !value.is_empty())
        .map(str::to_string)
}
