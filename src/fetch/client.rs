// HTTP page fetcher backed by reqwest.
//
// One GET per page with a hard timeout. No retries: a failed fetch is
// reported to the user as-is.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use tracing::debug;

use super::traits::{FetchError, FetchedPage, PageFetcher};

/// Default request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 4;

pub const DEFAULT_USER_AGENT: &str = "hookline/0.1 (content-based phishing detection)";

/// Options for building an HttpFetcher.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept_invalid_certs: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_invalid_certs: false,
        }
    }
}

pub struct HttpFetcher {
    client: reqwest::Client,
    timeout_secs: u64,
}

impl HttpFetcher {
    pub fn new(options: &FetchOptions) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::Client::builder()
            .user_agent(options.user_agent.as_str())
            .timeout(Duration::from_secs(options.timeout_secs))
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            timeout_secs: options.timeout_secs,
        })
    }

    fn map_error(&self, url: &Url, e: reqwest::Error) -> FetchError {
        if e.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
                secs: self.timeout_secs,
            }
        } else {
            FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            }
        }
    }
}

/// Only a full 200 response is classified. Other 2xx codes (204, 206, ...)
/// carry an empty or partial body.
pub fn is_accepted_status(status: StatusCode) -> bool {
    status == StatusCode::OK
}

/// Content types the extractor can meaningfully read.
pub fn is_html_content_type(content_type: &str) -> bool {
    let ct = content_type.to_ascii_lowercase();
    ct.contains("html") || ct.contains("xml") || ct.starts_with("text/plain")
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        debug!(url = %url, "Fetching page");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| self.map_error(url, e))?;

        let status = response.status();
        if !is_accepted_status(status) {
            return Err(FetchError::Status {
                url: url.to_string(),
                code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        if let Some(ct) = content_type.as_deref() {
            if !is_html_content_type(ct) {
                return Err(FetchError::UnsupportedContent {
                    url: final_url.to_string(),
                    content_type: ct.to_string(),
                });
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(&final_url, e))?;

        debug!(url = %final_url, bytes = body.len(), "Fetched page");

        Ok(FetchedPage {
            url: final_url,
            status: status.as_u16(),
            content_type,
            body: body.to_vec(),
        })
    }
}
