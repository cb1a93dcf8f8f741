//! Fetching the raw bytes of a chosen image.

use std::time::Duration;

use reqwest::{blocking::Client, StatusCode};
use thiserror::Error;

/// The only timeout this tool sets explicitly. API calls use the client
/// defaults.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

pub trait ImageFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

impl<T: ImageFetcher + ?Sized> ImageFetcher for &T {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        (**self).fetch(url)
    }
}

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("HTTP error while downloading image")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("image host returned HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },
}

#[derive(Debug)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, DownloadError> {
        let client = Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;

        Ok(Self { client })
    }
}

impl ImageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        log::trace!("GET {}", url);

        let response = self.client.get(url).send()?;
        let status = response.status();

        if !status.is_success() {
            return Err(DownloadError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let bytes = response.bytes()?;
        log::debug!("downloaded {} bytes from {}", bytes.len(), url);

        Ok(bytes.to_vec())
    }
}
