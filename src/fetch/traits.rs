// Page fetcher trait: retrieves raw HTML for a URL.
//
// The extractor never fetches anything itself. A fetcher either hands back a
// successfully retrieved page or fails with a FetchError before the core is
// invoked.

use std::fmt;

use async_trait::async_trait;
use reqwest::Url;

/// A successfully fetched page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects (the origin used for feature extraction)
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

/// Distinct, user-facing fetch failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The input is not an http(s) URL
    InvalidUrl { input: String, reason: String },
    /// The server did not answer within the configured timeout
    Timeout { url: String, secs: u64 },
    /// DNS, connection, TLS or body-read failure
    Transport { url: String, message: String },
    /// The server answered with any status other than 200
    Status { url: String, code: u16 },
    /// The response is not an HTML document
    UnsupportedContent { url: String, content_type: String },
}

impl FetchError {
    /// Short category label for terminal output.
    pub fn kind(&self) -> &'static str {
        match self {
            FetchError::InvalidUrl { .. } => "invalid URL",
            FetchError::Timeout { .. } => "fetch timed out",
            FetchError::Transport { .. } => "fetch failed",
            FetchError::Status { .. } => "non-success status",
            FetchError::UnsupportedContent { .. } => "unsupported content",
        }
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::InvalidUrl { input, reason } => {
                write!(f, "'{input}' is not a valid web URL: {reason}")
            }
            FetchError::Timeout { url, secs } => {
                write!(f, "{url} did not respond within {secs}s")
            }
            FetchError::Transport { url, message } => {
                write!(f, "HTTP connection to {url} was not successful: {message}")
            }
            FetchError::Status { url, code } => {
                write!(f, "{url} returned HTTP {code}")
            }
            FetchError::UnsupportedContent { url, content_type } => {
                write!(f, "{url} returned {content_type}, not an HTML page")
            }
        }
    }
}

impl std::error::Error for FetchError {}

/// Anything that can retrieve a page. Async because every real
/// implementation does network I/O.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Parse user input into a fetchable URL. Bare hosts get `https://`.
pub fn parse_target_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    };

    let url = Url::parse(&candidate).map_err(|e| FetchError::InvalidUrl {
        input: input.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(FetchError::InvalidUrl {
            input: input.to_string(),
            reason: "only http and https URLs with a host can be checked".to_string(),
        });
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_host_gets_https() {
        let url = parse_target_url("example.com/login").unwrap();
        assert_eq!(url.as_str(), "https://example.com/login");
    }

    #[test]
    fn test_explicit_scheme_kept() {
        let url = parse_target_url(" http://example.com ").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_non_web_scheme_rejected() {
        let err = parse_target_url("ftp://example.com/").unwrap_err();
        assert_eq!(err.kind(), "invalid URL");
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(parse_target_url("http://").is_err());
    }
}
