use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{info, warn};
use url::Url;

use crate::settings::Settings;

const WANTED_MARKER: &str = "fbi.gov/wanted";
const PDF_SUFFIX: &str = "/download.pdf";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL. Must be from FBI missing persons page: {0}")]
    InvalidUrl(String),
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to fetch webpage {url}: {status}")]
    Status { status: StatusCode, url: String },
}

/// Turn user input into the wanted-person web page URL. A link to the
/// poster PDF is mapped back to its page.
pub fn resolve_page_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    let page = trimmed
        .split_once(PDF_SUFFIX)
        .map(|(head, tail)| format!("{head}{tail}"))
        .unwrap_or_else(|| trimmed.to_string());

    if !page.contains(WANTED_MARKER) {
        return Err(FetchError::InvalidUrl(input.to_string()));
    }
    match Url::parse(&page) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(url),
        _ => Err(FetchError::InvalidUrl(input.to_string())),
    }
}

pub fn build_client(settings: &Settings) -> reqwest::Result<Client> {
    Client::builder()
        .user_agent(settings.user_agent.clone())
        .timeout(settings.timeout())
        .build()
}

/// GET the page body, backing off on rate limits and transient 5xx.
pub async fn fetch_page(client: &Client, url: &Url, settings: &Settings) -> Result<String, FetchError> {
    let mut attempt = 0u32;
    loop {
        let start = Instant::now();
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Http { url: url.to_string(), source })?;
        let status = response.status();

        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|source| FetchError::Http { url: url.to_string(), source })?;
            info!(
                "Fetched {} ({} bytes in {}ms)",
                url,
                body.len(),
                start.elapsed().as_millis()
            );
            return Ok(body);
        }

        if !should_retry(status) || attempt >= settings.max_retries {
            return Err(FetchError::Status { status, url: url.to_string() });
        }

        let backoff = backoff_for(settings.base_backoff_ms, attempt);
        warn!(
            "{} on {} (attempt {}/{}), backing off {:.1}s",
            status,
            url,
            attempt + 1,
            settings.max_retries,
            backoff.as_secs_f64()
        );
        tokio::time::sleep(backoff).await;
        attempt += 1;
    }
}

fn should_retry(status: StatusCode) -> bool {
    matches!(status.as_u16(), 429 | 500 | 502 | 503)
}

fn backoff_for(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(2u64.saturating_pow(attempt)))
}
