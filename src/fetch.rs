//! Page fetching over HTTP(S).
//!
//! One GET per URL with a fixed timeout and a browser-like `User-Agent`.
//! Every failure comes back as a `LookupError`; the scanner turns it into
//! an unreachable record.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::NetworkConfig;
use crate::errors::{LookupError, LookupResult};

/// Source of raw page bodies.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url` and return the response body as text.
    async fn fetch(&self, url: &str) -> LookupResult<String>;
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(config: &NetworkConfig) -> LookupResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| LookupError::fetch("<client>", e.to_string()))?;

        Ok(Self {
            client,
            timeout: config.fetch_timeout,
        })
    }

    fn map_error(&self, url: &str, e: reqwest::Error) -> LookupError {
        if e.is_timeout() {
            LookupError::fetch_timeout(url, self.timeout.as_secs())
        } else {
            LookupError::fetch(url, e.to_string())
        }
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> LookupResult<String> {
        tracing::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        tracing::debug!("{url} -> HTTP {}", response.status());

        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            && !is_textual_content_type(content_type)
        {
            return Err(LookupError::not_html(url, content_type));
        }

        response.text().await.map_err(|e| self.map_error(url, e))
    }
}

/// True for content types an HTML parser can make sense of.
pub fn is_textual_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    let essence = ct.split(';').next().unwrap_or("").trim();
    essence.is_empty()
        || essence.starts_with("text/")
        || essence.contains("html")
        || essence.contains("xml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn textual_content_types() {
        assert!(is_textual_content_type("text/html; charset=utf-8"));
        assert!(is_textual_content_type("application/xhtml+xml"));
        assert!(is_textual_content_type("text/plain"));
        assert!(!is_textual_content_type("image/png"));
        assert!(!is_textual_content_type("application/pdf"));
        assert!(!is_textual_content_type("application/octet-stream"));
    }

    #[test]
    fn fetcher_builds_from_default_config() {
        assert!(HttpFetcher::new(&NetworkConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn connection_refused_is_an_error() {
        let fetcher = HttpFetcher::new(&NetworkConfig::default()).unwrap();
        // Port 9 (discard) is closed on loopback in test environments.
        let res = fetcher.fetch("http://127.0.0.1:9/").await;
        assert!(res.is_err());
    }

    #[tokio::test]
    async fn url_without_scheme_is_an_error() {
        let fetcher = HttpFetcher::new(&NetworkConfig::default()).unwrap();
        assert!(fetcher.fetch("example.com").await.is_err());
    }
}
