mod client;

use reqwest::{StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;

pub use self::client::SteamGridDbClient;

pub const DEFAULT_API_URL: &str = "https://www.steamgriddb.com/api/v2";

/// A game returned by the SteamGridDB search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub verified: bool,
}

/// One grid image attached to a game. SteamGridDB normally reports the
/// dimensions, but nothing downstream relies on them being present.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageCandidate {
    pub url: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub style: Option<String>,
}

impl ImageCandidate {
    /// True only when both dimensions are known and the image is wider than
    /// it is tall.
    pub fn is_landscape(&self) -> bool {
        match (self.width, self.height) {
            (Some(width), Some(height)) => width > height,
            _ => false,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SgdbCredentials {
    pub api_key: Option<SecretString>,
}

pub trait GridApi {
    /// Searches games by free-text name, in the order the API ranks them.
    fn search_game(&self, term: &str) -> Result<Vec<SearchResult>, SgdbApiError>;

    /// Lists the grid images attached to a game.
    fn grids_for_game(&self, game_id: u64) -> Result<Vec<ImageCandidate>, SgdbApiError>;
}

impl<T: GridApi + ?Sized> GridApi for &T {
    fn search_game(&self, term: &str) -> Result<Vec<SearchResult>, SgdbApiError> {
        (**self).search_game(term)
    }

    fn grids_for_game(&self, game_id: u64) -> Result<Vec<ImageCandidate>, SgdbApiError> {
        (**self).grids_for_game(game_id)
    }
}

#[derive(Debug, Error)]
pub enum SgdbApiError {
    #[error("SteamGridDB HTTP error")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("SteamGridDB API error: {message}")]
    ApiError { message: String },

    #[error("SteamGridDB returned success, but had malformed JSON response: {body}")]
    BadResponseJson {
        body: String,
        source: serde_json::Error,
    },

    #[error("SteamGridDB returned HTTP {status} with body: {body}")]
    ResponseError { status: StatusCode, body: String },

    #[error("No SteamGridDB API key was found. Pass --api-key or set STEAMGRIDDB_API_KEY")]
    MissingApiKey,

    #[error("API URL {url} cannot be used as a base URL")]
    BadBaseUrl { url: Url },
}

/// Builds the HTTP client for the given credentials. Fails before anything
/// touches the network if no usable API key is present.
pub fn get_client(
    credentials: SgdbCredentials,
    api_url: Url,
) -> Result<SteamGridDbClient, SgdbApiError> {
    match credentials.api_key {
        Some(api_key) if !api_key.expose_secret().trim().is_empty() => {
            SteamGridDbClient::new(api_key, api_url)
        }
        _ => Err(SgdbApiError::MissingApiKey),
    }
}
