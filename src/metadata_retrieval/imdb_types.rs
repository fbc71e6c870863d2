/// IMDB structured data types for deserialization.
///
/// IMDB title pages embed a schema.org JSON-LD document describing the title.
/// Only the fields used for enrichment are modeled.
use crate::models::LooseNumber;
use serde::Deserialize;

/// The JSON-LD document of a title page.
#[derive(Debug, Deserialize)]
pub(super) struct ImdbLdJson {
    /// Original title
    pub name: Option<String>,
    /// Primary poster image URL
    pub image: Option<String>,
    /// Aggregated user rating (absent for unreleased titles)
    #[serde(rename = "aggregateRating")]
    pub aggregate_rating: Option<ImdbAggregateRating>,
}

/// The schema.org AggregateRating block.
#[derive(Debug, Deserialize)]
pub(super) struct ImdbAggregateRating {
    /// Rating on a 1-10 scale
    #[serde(rename = "ratingValue")]
    pub rating_value: Option<LooseNumber>,
}
