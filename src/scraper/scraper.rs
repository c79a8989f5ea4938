// scraper.rs
use crate::config::Config;
use crate::scraper::headers::CredentialProvider;
use crate::scraper::models::ShopFilter;
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const MAX_ATTEMPTS: u64 = 3;
const MAX_BACKOFF_SECS: u64 = 10;
const JITTER_MAX_SECS: u64 = 2;

/// Anything that can produce one complete raw snapshot of listings.
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot(&self) -> Result<Vec<Value>, ScraperError>;
}

/// Client for the buycycle shop API.
pub struct BuycycleScraper {
    client: Client,
    api_url: String,
    filter: ShopFilter,
    credentials: Box<dyn CredentialProvider>,
}

impl BuycycleScraper {
    pub fn new(
        config: &Config,
        credentials: Box<dyn CredentialProvider>,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self {
            client,
            api_url: config.api_url.clone(),
            filter: config.filter.clone(),
            credentials,
        })
    }

    fn fetch_with_retry(&self, headers: &HeaderMap) -> Result<Value, ScraperError> {
        let mut last_err = None;

        for attempt in 1..=MAX_ATTEMPTS {
            let start = Instant::now();

            match self.try_fetch(headers) {
                Ok(data) => {
                    debug!(attempt, elapsed = ?start.elapsed(), "shop API request succeeded");
                    return Ok(data);
                }
                Err(e) if e.is_retryable() && attempt < MAX_ATTEMPTS => {
                    warn!(attempt, elapsed = ?start.elapsed(), error = %e, "shop API request failed, retrying");
                    last_err = Some(e);

                    let base = std::cmp::min(2 * attempt, MAX_BACKOFF_SECS);
                    let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_SECS);
                    std::thread::sleep(Duration::from_secs(base + jitter));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop exhausted".into())))
    }

    fn try_fetch(&self, headers: &HeaderMap) -> Result<Value, ScraperError> {
        let resp = self
            .client
            .post(&self.api_url)
            .headers(headers.clone())
            .json(&self.filter)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(ScraperError::Http {
                status: status.as_u16(),
                body: truncate(&text, 300),
            });
        }

        serde_json::from_str(&text).map_err(|e| ScraperError::JsonParse(e.to_string()))
    }

    /// Pulls the listing array out of a `get-content` response.
    ///
    /// A missing array is an error rather than an empty snapshot, since an
    /// empty snapshot would mark every known listing sold.
    pub fn extract_listings(data: &Value) -> Result<Vec<Value>, ScraperError> {
        data.get("bikes")
            .and_then(|b| b.get("data"))
            .and_then(Value::as_array)
            .cloned()
            .ok_or_else(|| ScraperError::UnexpectedShape("bikes.data missing from response".into()))
    }
}

impl SnapshotSource for BuycycleScraper {
    fn fetch_snapshot(&self) -> Result<Vec<Value>, ScraperError> {
        let headers = self
            .credentials
            .request_headers()
            .ok_or(ScraperError::MissingAuthContext)?
            .to_header_map();

        let data = self.fetch_with_retry(&headers)?;
        let listings = Self::extract_listings(&data)?;
        info!(count = listings.len(), "fetched listing snapshot");
        Ok(listings)
    }
}

fn truncate(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
