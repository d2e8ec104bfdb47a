//! Blocking page retrieval.

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use tracing::debug;

use crate::error::CodingError;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// A fetched page: the URL it was served from and its body.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub body: String,
}

/// Abstraction over page retrieval so resolution is testable offline.
pub trait PageFetcher {
    /// Fetch a URL, returning the body only for a successful response.
    /// Transport and status failures both yield `None`; candidate sources
    /// are best-effort by design.
    fn fetch(&self, url: &str) -> Option<String>;
}

/// Fetcher backed by a blocking `reqwest` client.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> Result<Self, CodingError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|error| CodingError::Client(error.to_string()))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Option<String> {
        let response = match self
            .client
            .get(url)
            .header(
                USER_AGENT,
                concat!("ukb-decode/", env!("CARGO_PKG_VERSION")),
            )
            .send()
        {
            Ok(response) => response,
            Err(error) => {
                debug!(url, %error, "request failed");
                return None;
            }
        };
        if !response.status().is_success() {
            debug!(url, status = response.status().as_u16(), "non-success response");
            return None;
        }
        response.text().ok()
    }
}
