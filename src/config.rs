use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::classifier::HEURISTIC_MODEL;
use crate::fetch::client::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};
use crate::fetch::FetchOptions;

/// Default number of pages fetched in parallel by `hookline check`.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override these values.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model used when `--model` is not given (HOOKLINE_MODEL)
    pub default_model: String,
    /// Directory scanned for externally trained models (HOOKLINE_MODEL_DIR)
    pub model_dir: PathBuf,
    /// Fetch timeout in seconds (HOOKLINE_FETCH_TIMEOUT_SECS)
    pub fetch_timeout_secs: u64,
    /// User-Agent header sent when fetching (HOOKLINE_USER_AGENT)
    pub user_agent: String,
    /// Skip TLS certificate validation (HOOKLINE_ACCEPT_INVALID_CERTS)
    pub accept_invalid_certs: bool,
    /// Pages fetched in parallel (HOOKLINE_CONCURRENCY)
    pub concurrency: usize,
}

/// Returns the default directory for model files.
/// Uses the platform data directory: ~/.local/share/hookline/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hookline")
        .join("models")
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

impl Config {
    /// Load configuration from environment variables. Everything has a default.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup (tests pass a map).
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch_timeout_secs = match lookup("HOOKLINE_FETCH_TIMEOUT_SECS") {
            Some(v) => v
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HOOKLINE_FETCH_TIMEOUT_SECS must be a number, got '{v}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };
        if fetch_timeout_secs == 0 {
            anyhow::bail!("HOOKLINE_FETCH_TIMEOUT_SECS must be at least 1");
        }

        let concurrency = match lookup("HOOKLINE_CONCURRENCY") {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .with_context(|| format!("HOOKLINE_CONCURRENCY must be a number, got '{v}'"))?,
            None => DEFAULT_CONCURRENCY,
        };

        let accept_invalid_certs = match lookup("HOOKLINE_ACCEPT_INVALID_CERTS") {
            Some(v) => parse_bool(&v).with_context(|| {
                format!("HOOKLINE_ACCEPT_INVALID_CERTS must be true or false, got '{v}'")
            })?,
            None => false,
        };

        Ok(Self {
            default_model: lookup("HOOKLINE_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| HEURISTIC_MODEL.to_string()),
            model_dir: lookup("HOOKLINE_MODEL_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(default_model_dir),
            fetch_timeout_secs,
            user_agent: lookup("HOOKLINE_USER_AGENT")
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            accept_invalid_certs,
            concurrency: concurrency.max(1),
        })
    }

    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            timeout_secs: self.fetch_timeout_secs,
            user_agent: self.user_agent.clone(),
            accept_invalid_certs: self.accept_invalid_certs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.default_model, "heuristic");
        assert_eq!(config.fetch_timeout_secs, 4);
        assert_eq!(config.concurrency, DEFAULT_CONCURRENCY);
        assert!(!config.accept_invalid_certs);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("HOOKLINE_MODEL", "random_forest"),
            ("HOOKLINE_MODEL_DIR", "/opt/models"),
            ("HOOKLINE_FETCH_TIMEOUT_SECS", "10"),
            ("HOOKLINE_ACCEPT_INVALID_CERTS", "yes"),
            ("HOOKLINE_CONCURRENCY", "0"),
        ])
        .unwrap();
        assert_eq!(config.default_model, "random_forest");
        assert_eq!(config.model_dir, PathBuf::from("/opt/models"));
        assert_eq!(config.fetch_options().timeout_secs, 10);
        assert!(config.accept_invalid_certs);
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        assert!(config_from(&[("HOOKLINE_FETCH_TIMEOUT_SECS", "soon")]).is_err());
        assert!(config_from(&[("HOOKLINE_FETCH_TIMEOUT_SECS", "0")]).is_err());
    }

    #[test]
    fn test_invalid_bool_rejected() {
        assert!(config_from(&[("HOOKLINE_ACCEPT_INVALID_CERTS", "maybe")]).is_err());
    }
}
