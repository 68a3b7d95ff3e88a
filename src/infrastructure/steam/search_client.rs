use crate::domain::error::ReportError;
use crate::domain::ports::listing_source::ListingSource;
use crate::domain::values::report_limit::MAX_LIMIT;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, COOKIE, REFERER};
use std::time::Duration;
use tracing::info;

/// Fetch timeout for the search-results endpoint.
pub const FETCH_TIMEOUT_SECS: u64 = 15;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/108.0.0.0 Safari/537.36";
const SEARCH_REFERER: &str = "https://store.steampowered.com/search/?filter=topsellers&l=schinese";

/// Age-gate consent and CNY currency region.
const COOKIES: &str = "birthtime=568022401; steamCountry=CN%7C; wants_mature_content=1";

/// Steam store search-results endpoint, top sellers in Simplified Chinese
/// with CN pricing.
pub struct SteamSearchClient {
    url: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl SteamSearchClient {
    pub fn new() -> Self {
        Self::with_base_url("https://store.steampowered.com")
    }

    /// Point the client at another host (used against local fixtures).
    /// The request context and timeout stay the same.
    pub fn with_base_url(base: &str) -> Self {
        let url = format!(
            "{}/search/results/?query&start=0&count={MAX_LIMIT}&dynamic_data=&sort_by=_ASC&filter=topsellers&l=schinese&cc=CN&infinite=1",
            base.trim_end_matches('/')
        );

        let timeout = Duration::from_secs(FETCH_TIMEOUT_SECS);
        Self {
            url,
            timeout,
            client: build_client(timeout),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.client = build_client(timeout);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for SteamSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ListingSource for SteamSearchClient {
    fn name(&self) -> &str {
        "steam"
    }

    async fn fetch(&self) -> Result<String, ReportError> {
        info!(url = %self.url, "Requesting Steam top sellers");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        if !resp.status().is_success() {
            return Err(ReportError::Network(format!(
                "Steam search returned {}",
                resp.status()
            )));
        }

        resp.text().await.map_err(|e| self.map_reqwest(e))
    }
}

impl SteamSearchClient {
    fn map_reqwest(&self, e: reqwest::Error) -> ReportError {
        if e.is_timeout() {
            ReportError::Timeout(self.timeout.as_secs())
        } else {
            ReportError::Network(e.to_string())
        }
    }
}

fn build_client(timeout: Duration) -> reqwest::Client {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-requested-with"),
        HeaderValue::from_static("XMLHttpRequest"),
    );
    headers.insert(REFERER, HeaderValue::from_static(SEARCH_REFERER));
    headers.insert(COOKIE, HeaderValue::from_static(COOKIES));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .unwrap_or_default()
}
