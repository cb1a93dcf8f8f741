use std::fmt;

use reqwest::{blocking::Client, StatusCode, Url};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Deserialize};

use super::{GridApi, ImageCandidate, SearchResult, SgdbApiError};

/// Every SteamGridDB v2 response is wrapped in this envelope, even when the
/// HTTP status is a success.
#[derive(Debug, Deserialize)]
struct RawResponse<T> {
    success: bool,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
    #[serde(default)]
    errors: Vec<String>,
}

pub struct SteamGridDbClient {
    api_key: SecretString,
    base_url: Url,
    client: Client,
}

impl fmt::Debug for SteamGridDbClient {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "SteamGridDbClient({})", self.base_url)
    }
}

impl SteamGridDbClient {
    pub fn new(api_key: SecretString, base_url: Url) -> Result<Self, SgdbApiError> {
        if base_url.cannot_be_a_base() {
            return Err(SgdbApiError::BadBaseUrl { url: base_url });
        }

        Ok(Self {
            api_key,
            base_url,
            client: Client::builder().build()?,
        })
    }

    /// Appends percent-encoded path segments to the base URL, so game names
    /// containing `/`, `?` or `#` survive intact.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SgdbApiError> {
        let mut url = self.base_url.clone();

        url.path_segments_mut()
            .map_err(|_| SgdbApiError::BadBaseUrl {
                url: self.base_url.clone(),
            })?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    fn get_data<T: DeserializeOwned>(&self, url: Url) -> Result<Vec<T>, SgdbApiError> {
        log::trace!("GET {}", url);

        let response = self
            .client
            .get(url)
            .bearer_auth(self.api_key.expose_secret())
            .send()?;

        let status = response.status();
        let body = response.text()?;

        decode_response(status, body)
    }
}

impl GridApi for SteamGridDbClient {
    fn search_game(&self, term: &str) -> Result<Vec<SearchResult>, SgdbApiError> {
        let url = self.endpoint(&["search", "autocomplete", term])?;

        match self.get_data(url) {
            Ok(results) => Ok(results),

            // The search endpoint answers 404 when nothing matches.
            Err(SgdbApiError::ResponseError { status, .. }) if status == StatusCode::NOT_FOUND => {
                Ok(Vec::new())
            }

            Err(err) => Err(err),
        }
    }

    fn grids_for_game(&self, game_id: u64) -> Result<Vec<ImageCandidate>, SgdbApiError> {
        let url = self.endpoint(&["grids", "game", &game_id.to_string()])?;
        self.get_data(url)
    }
}

fn decode_response<T: DeserializeOwned>(
    status: StatusCode,
    body: String,
) -> Result<Vec<T>, SgdbApiError> {
    // Some errors will be reported through HTTP status codes, handled here.
    if !status.is_success() {
        return Err(SgdbApiError::ResponseError { status, body });
    }

    let response: RawResponse<T> = match serde_json::from_str(&body) {
        Ok(response) => response,
        Err(source) => return Err(SgdbApiError::BadResponseJson { body, source }),
    };

    // Others come back as a 200 with `success: false`.
    if response.success {
        Ok(response.data)
    } else {
        let message = if response.errors.is_empty() {
            "request was not successful".to_owned()
        } else {
            response.errors.join(", ")
        };

        Err(SgdbApiError::ApiError { message })
    }
}
