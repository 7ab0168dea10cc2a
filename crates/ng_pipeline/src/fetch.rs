use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use ng_core::{Error, PageContent, Result};

/// A realistic browser identity; plain library User-Agents get blocked by
/// trivial bot filters on the target sites.
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

const BROWSER_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";

const BROWSER_ACCEPT_LANGUAGE: &str = "pl-PL,pl;q=0.9,en;q=0.8";

/// Fetch collaborator seam. Single attempt per call; retry policy belongs to
/// the external scheduler.
#[async_trait]
pub trait PageFetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<PageContent>;
}

/// Production fetcher: one `reqwest::Client` with browser-like default
/// headers and a fixed timeout.
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
        headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(BROWSER_ACCEPT_LANGUAGE));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<PageContent> {
        let started = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| classify(e, url))?;
        let elapsed = started.elapsed();

        Ok(PageContent {
            content_length: body.len(),
            status: status.as_u16(),
            elapsed,
            body,
        })
    }
}

fn classify(error: reqwest::Error, url: &str) -> Error {
    if error.is_timeout() {
        Error::Timeout(url.to_string())
    } else if error.is_connect() {
        Error::Connection(url.to_string())
    } else if let Some(status) = error.status() {
        Error::HttpStatus {
            code: status.as_u16(),
            url: url.to_string(),
        }
    } else {
        Error::Http(error)
    }
}
