//! Priority merge of catalog and provider data
//!
//! The catalog always provides the base record. Providers replace artwork and
//! rating, and only when they actually have a value:
//!
//! - poster: TMDB, then IMDB for movies, then TVMaze for TV, then IMDB for anything
//! - backdrop, logo: TMDB
//! - rating: IMDB
//!
//! Title and overview stay with the catalog unless it left them blank.

use crate::catalog::TitleType;
use crate::metadata_retrieval::{ImdbShow, MazeShow, TmdbShow};
use crate::models::{Show, ShowStatus};

/// Records fetched from the optional providers for one show
#[derive(Debug, Clone, Default)]
pub(crate) struct ProviderRecords {
    pub tmdb: Option<TmdbShow>,
    pub imdb: Option<ImdbShow>,
    pub tvmaze: Option<MazeShow>,
}

/// Maps a raw catalog status onto the host's closed status set
///
/// Unknown strings map to `None` (the host's `undefined`).
pub fn map_status(raw: Option<&str>) -> Option<ShowStatus> {
    let status = raw?.trim().to_lowercase();

    match status.as_str() {
        "in production" | "post production" | "planned" | "pilot" | "rumored" | "announced" => {
            Some(ShowStatus::Upcoming)
        }
        "returning series" => Some(ShowStatus::Airing),
        "canceled" => Some(ShowStatus::Canceled),
        "released" | "ended" => Some(ShowStatus::Ended),
        _ => None,
    }
}

/// Applies provider data on top of a catalog-only show
pub(crate) fn merge_show(mut show: Show, title_type: TitleType, records: &ProviderRecords) -> Show {
    let tmdb = records.tmdb.as_ref();
    let imdb_image = records.imdb.as_ref().and_then(|imdb| imdb.image.clone());
    let maze_image = records
        .tvmaze
        .as_ref()
        .and_then(|maze| maze.image.as_ref())
        .and_then(|image| image.original.clone());

    let poster = tmdb
        .and_then(|tmdb| tmdb.poster.clone())
        .or_else(|| match title_type {
            TitleType::Movie => imdb_image.clone(),
            _ => None,
        })
        .or_else(|| match title_type {
            TitleType::Tv => maze_image,
            _ => None,
        })
        .or(imdb_image);
    if poster.is_some() {
        show.poster_url = poster;
    }

    if let Some(backdrop) = tmdb.and_then(|tmdb| tmdb.backdrop.clone()) {
        show.backdrop_url = Some(backdrop);
    }

    if let Some(logo) = tmdb.and_then(|tmdb| tmdb.logo.clone()) {
        show.logo_url = Some(logo);
    }

    if let Some(rating) = records.imdb.as_ref().and_then(|imdb| imdb.rating) {
        show.rating = Some(rating);
    }

    let maze = records.tvmaze.as_ref();
    if show.title.trim().is_empty() {
        let title = first_non_blank([
            tmdb.map(|tmdb| tmdb.title.clone()),
            records.imdb.as_ref().and_then(|imdb| imdb.name.clone()),
            maze.map(|maze| maze.name.clone()),
        ]);
        if let Some(title) = title {
            show.title = title;
        }
    }

    if show.overview.trim().is_empty() {
        let overview = first_non_blank([
            tmdb.map(|tmdb| tmdb.description.clone()),
            maze.map(|maze| maze.summary.clone()),
        ]);
        if let Some(overview) = overview {
            show.overview = overview;
        }
    }

    show
}

fn first_non_blank<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|text| !text.trim().is_empty())
}
