//! Turns a game name into a cached banner on disk.
//!
//! Resolution walks forward through [`Stage`]s exactly once. Any failure ends
//! the pass; nothing is retried.

use std::error::Error as StdError;
use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use log::{debug, info};
use reqwest::Url;
use thiserror::Error;

use crate::{
    cache::BannerCache,
    download::{DownloadError, HttpFetcher, ImageFetcher},
    sgdb_api::{
        get_client, GridApi, ImageCandidate, SearchResult, SgdbApiError, SgdbCredentials,
        SteamGridDbClient,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unconfigured,
    Searching,
    ResolvingImage,
    Downloading,
    Saved,
}

impl fmt::Display for Stage {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Stage::Unconfigured => "unconfigured",
            Stage::Searching => "searching",
            Stage::ResolvingImage => "resolving image",
            Stage::Downloading => "downloading",
            Stage::Saved => "saved",
        };

        formatter.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("banner resolver is not configured")]
    Configuration(#[source] Box<dyn StdError + Send + Sync + 'static>),

    #[error("search for game {query:?} failed")]
    Search { query: String, source: SgdbApiError },

    #[error("no game found matching {query:?}")]
    NotFound { query: String },

    #[error("API error while listing images for game {game_id}")]
    Api { game_id: u64, source: SgdbApiError },

    #[error("game {game_id} has no images to choose from")]
    NoCandidates { game_id: u64 },

    #[error("error downloading image from {url}")]
    Download { url: String, source: DownloadError },

    #[error("could not save banner to {}", .path.display())]
    Persistence {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl ResolveError {
    /// The stage the pipeline was in when it failed.
    pub fn stage(&self) -> Stage {
        match self {
            ResolveError::Configuration(_) => Stage::Unconfigured,
            ResolveError::Search { .. } | ResolveError::NotFound { .. } => Stage::Searching,
            ResolveError::Api { .. } | ResolveError::NoCandidates { .. } => Stage::ResolvingImage,
            ResolveError::Download { .. } | ResolveError::Persistence { .. } => Stage::Downloading,
        }
    }
}

/// Decides which search result is "the" game, by index into the results.
pub trait MatchSelector {
    fn select(&self, query: &str, results: &[SearchResult]) -> Option<usize>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum MatchStrategy {
    /// Trust the API's ranking and take the first result.
    #[default]
    First,

    /// Take the first result whose name equals the query, ignoring case.
    Exact,
}

impl MatchSelector for MatchStrategy {
    fn select(&self, query: &str, results: &[SearchResult]) -> Option<usize> {
        match self {
            MatchStrategy::First if results.is_empty() => None,
            MatchStrategy::First => Some(0),
            MatchStrategy::Exact => {
                let query = query.trim();
                results
                    .iter()
                    .position(|result| result.name.trim().eq_ignore_ascii_case(query))
            }
        }
    }
}

/// Every search result, in API order, plus the one the selector would pick,
/// if any.
#[derive(Debug, Clone)]
pub struct SearchListing {
    pub results: Vec<SearchResult>,
    pub chosen: Option<usize>,
}

/// Searches for a game and applies `selector` without insisting on a match.
/// Only an empty result list is `NotFound`.
pub fn list_games(
    api: &impl GridApi,
    selector: &dyn MatchSelector,
    game_name: &str,
) -> Result<SearchListing, ResolveError> {
    if game_name.trim().is_empty() {
        return Err(ResolveError::NotFound {
            query: game_name.to_owned(),
        });
    }

    debug!("{}: {:?}", Stage::Searching, game_name);

    let results = api
        .search_game(game_name)
        .map_err(|source| ResolveError::Search {
            query: game_name.to_owned(),
            source,
        })?;

    if results.is_empty() {
        return Err(ResolveError::NotFound {
            query: game_name.to_owned(),
        });
    }

    let chosen = selector
        .select(game_name, &results)
        .filter(|&index| index < results.len());

    Ok(SearchListing { results, chosen })
}

/// Every search result, in API order, plus the one that was picked.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<SearchResult>,
    pub chosen: usize,
}

impl SearchOutcome {
    pub fn game(&self) -> &SearchResult {
        &self.results[self.chosen]
    }
}

/// Where a resolution pass left its banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub path: PathBuf,

    /// Set when `--skip-existing` found the banner already cached and nothing
    /// was downloaded.
    pub reused: bool,
}

/// Picks the first landscape image in API order, falling back to the first
/// image at all when none qualifies.
pub fn select_banner(candidates: &[ImageCandidate]) -> Option<&ImageCandidate> {
    candidates
        .iter()
        .find(|candidate| candidate.is_landscape())
        .or_else(|| candidates.first())
}

pub struct BannerResolver<A, F> {
    api: A,
    fetcher: F,
    cache: BannerCache,
    selector: Box<dyn MatchSelector>,
    skip_existing: bool,
}

/// Builds only the SteamGridDB client, for commands that never download.
pub fn connect_api(
    credentials: SgdbCredentials,
    api_url: Url,
) -> Result<SteamGridDbClient, ResolveError> {
    get_client(credentials, api_url).map_err(|err| ResolveError::Configuration(Box::new(err)))
}

impl BannerResolver<SteamGridDbClient, HttpFetcher> {
    /// Builds a resolver backed by SteamGridDB. A missing credential fails
    /// here, before any client exists that could reach the network.
    pub fn connect(
        credentials: SgdbCredentials,
        api_url: Url,
        cache: BannerCache,
    ) -> Result<Self, ResolveError> {
        let api = connect_api(credentials, api_url)?;
        let fetcher = HttpFetcher::new().map_err(|err| ResolveError::Configuration(Box::new(err)))?;

        Ok(Self::new(api, fetcher, cache))
    }
}

impl<A: GridApi, F: ImageFetcher> BannerResolver<A, F> {
    pub fn new(api: A, fetcher: F, cache: BannerCache) -> Self {
        Self {
            api,
            fetcher,
            cache,
            selector: Box::new(MatchStrategy::default()),
            skip_existing: false,
        }
    }

    pub fn with_selector(mut self, selector: impl MatchSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    /// When set, a banner already cached for the matched game is returned
    /// without listing or downloading images again.
    pub fn skip_existing(mut self, skip_existing: bool) -> Self {
        self.skip_existing = skip_existing;
        self
    }

    /// Searches for the game and applies the configured selector.
    pub fn search(&self, game_name: &str) -> Result<SearchOutcome, ResolveError> {
        let listing = list_games(&self.api, self.selector.as_ref(), game_name)?;

        match listing.chosen {
            Some(chosen) => Ok(SearchOutcome {
                results: listing.results,
                chosen,
            }),
            None => Err(ResolveError::NotFound {
                query: game_name.to_owned(),
            }),
        }
    }

    /// Runs one full resolution pass, returning the path of the saved banner.
    pub fn resolve(&self, game_name: &str) -> Result<Resolution, ResolveError> {
        let outcome = self.search(game_name)?;
        let game = outcome.game();
        debug!("{}: matched {:?} (id {})", Stage::ResolvingImage, game.name, game.id);

        if self.skip_existing {
            if let Some(path) = self.cache.cached(game.id) {
                info!("Banner for {:?} is already cached", game.name);
                return Ok(Resolution { path, reused: true });
            }
        }

        let candidates = self
            .api
            .grids_for_game(game.id)
            .map_err(|source| ResolveError::Api {
                game_id: game.id,
                source,
            })?;

        let banner = select_banner(&candidates)
            .ok_or(ResolveError::NoCandidates { game_id: game.id })?;
        debug!(
            "{}: chose {} ({:?}x{:?}, style {:?}) out of {} images",
            Stage::Downloading,
            banner.url,
            banner.width,
            banner.height,
            banner.style,
            candidates.len()
        );

        let contents = self
            .fetcher
            .fetch(&banner.url)
            .map_err(|source| ResolveError::Download {
                url: banner.url.clone(),
                source,
            })?;

        let path = self
            .cache
            .store(game.id, &contents)
            .map_err(|source| ResolveError::Persistence {
                path: self.cache.path_for(game.id),
                source,
            })?;
        debug!("{}: wrote {} bytes to {}", Stage::Saved, contents.len(), path.display());

        Ok(Resolution {
            path,
            reused: false,
        })
    }
}
