//! Live page retrieval for `jobguard page <url>`.
//!
//! Job boards serve stripped-down or bot-check pages to clients that do not
//! look like a browser, so requests carry browser-like identity headers.

use std::time::Duration;

use futures_util::StreamExt;
use jobguard_logging::{guard_debug, guard_info};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::redirect::Policy;

use crate::{FetchError, FetchFailure, FetchMetadata, FetchOutput};

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0 Safari/537.36";
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";
const ACCEPT_ENGLISH: &str = "en-US,en;q=0.9";

const HTML_TYPES: &[&str] = &["text/html", "application/xhtml+xml"];

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_redirects: usize,
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_redirects: 5,
            max_bytes: 5 * 1024 * 1024,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

/// Retrieves a live page so it can be classified like a saved snapshot.
#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError>;
}

#[derive(Debug, Clone, Default)]
pub struct SnapshotFetcher {
    settings: FetchSettings,
}

impl SnapshotFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn client(&self) -> Result<reqwest::Client, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_ENGLISH));

        reqwest::Client::builder()
            .user_agent(self.settings.user_agent.as_str())
            .default_headers(headers)
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(Policy::limited(self.settings.max_redirects))
            .build()
            .map_err(|err| FetchError::new(FetchFailure::Network, err.to_string()))
    }
}

#[async_trait::async_trait]
impl Fetcher for SnapshotFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchOutput, FetchError> {
        let url = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FetchFailure::InvalidUrl, err.to_string()))?;
        guard_info!("Fetching {}", url);

        let response = self.client()?.get(url).send().await.map_err(classify)?;
        let content_type = html_content_type(&response)?;
        let final_url = response.url().to_string();
        let bytes = read_capped(response, self.settings.max_bytes).await?;
        guard_debug!("Fetched {} bytes from {}", bytes.len(), final_url);

        Ok(FetchOutput {
            metadata: FetchMetadata {
                final_url,
                content_type,
                byte_len: bytes.len() as u64,
            },
            bytes,
        })
    }
}

/// Accepts a successful response that is HTML or does not say what it is.
fn html_content_type(response: &reqwest::Response) -> Result<Option<String>, FetchError> {
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::new(
            FetchFailure::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    match content_type.as_deref() {
        Some(declared) if !is_html(declared) => Err(FetchError::new(
            FetchFailure::UnsupportedContentType {
                content_type: declared.to_string(),
            },
            "unsupported content type",
        )),
        _ => Ok(content_type),
    }
}

fn is_html(content_type: &str) -> bool {
    let essence = content_type.split(';').next().unwrap_or(content_type).trim();
    HTML_TYPES
        .iter()
        .any(|html| html.eq_ignore_ascii_case(essence))
}

async fn read_capped(response: reqwest::Response, max_bytes: u64) -> Result<Vec<u8>, FetchError> {
    let too_large = |actual: u64| {
        FetchError::new(
            FetchFailure::TooLarge {
                max_bytes,
                actual: Some(actual),
            },
            "page too large",
        )
    };
    if let Some(declared) = response.content_length().filter(|len| *len > max_bytes) {
        return Err(too_large(declared));
    }

    let mut body = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(classify)?;
        let len = (body.len() + chunk.len()) as u64;
        if len > max_bytes {
            return Err(too_large(len));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

fn classify(err: reqwest::Error) -> FetchError {
    let kind = if err.is_timeout() {
        FetchFailure::Timeout
    } else if err.is_redirect() {
        FetchFailure::RedirectLimitExceeded
    } else {
        FetchFailure::Network
    };
    FetchError::new(kind, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::is_html;

    #[test]
    fn html_types_ignore_parameters_and_case() {
        assert!(is_html("text/html; charset=utf-8"));
        assert!(is_html("Application/XHTML+XML"));
        assert!(!is_html("application/json"));
    }
}
