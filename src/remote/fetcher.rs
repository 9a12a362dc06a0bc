use reqwest::blocking::Client;

use crate::error::{ImportError, ImportResult};

const USER_AGENT: &str = concat!("convo-graph/", env!("CARGO_PKG_VERSION"));

/// Retrieves the body of a URL as text.
pub trait TextFetcher {
    /// # Errors
    ///
    /// [`ImportError::Network`] on transport failure or a non-2xx status.
    fn fetch_text(&self, url: &str) -> ImportResult<String>;
}

/// Blocking HTTP fetcher. One attempt per call, no retries.
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new() -> ImportResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ImportError::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl TextFetcher for HttpFetcher {
    fn fetch_text(&self, url: &str) -> ImportResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| ImportError::Network(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ImportError::Network(format!("{} returned HTTP {}", url, status)));
        }

        response.text().map_err(|e| ImportError::Network(format!("{}: {}", url, e)))
    }
}
