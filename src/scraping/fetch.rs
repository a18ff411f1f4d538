// Page fetching over blocking HTTP
//
// The activity page is served to ordinary browsers only, so every request
// carries a fixed desktop-browser header set.

use anyhow::Context;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, REFERER, USER_AGENT};
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115.0.0 Safari/537.36";
pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
pub const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9";
pub const BROWSER_REFERER: &str = "https://www.google.com/";

/// Anything that can hand back the raw text of a page.
pub trait PageSource {
    fn fetch_page(&self, url: &str) -> Result<String>;
}

/// Fixed request headers sent with every page fetch
pub fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE),
    );
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(REFERER, HeaderValue::from_static(BROWSER_REFERER));
    headers
}

/// Blocking HTTP page source with a request timeout
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .default_headers(browser_headers())
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl PageSource for HttpPageSource {
    fn fetch_page(&self, url: &str) -> Result<String> {
        info!("Fetching ticket page: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| TrackerError::Network(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TrackerError::Network(format!("{} returned status {}", url, status)).into());
        }

        let body = response
            .text()
            .map_err(|e| TrackerError::Network(e.to_string()))
            .with_context(|| format!("failed reading response body from {}", url))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}
