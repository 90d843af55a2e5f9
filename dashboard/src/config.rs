use payloads::{APIClient, ClientError, FileTokenStore, Session};
use std::{path::PathBuf, sync::Arc, time::Duration};

use crate::logs::DEFAULT_FILTER;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/apiic_api";

pub struct Config {
    /// Base of every backend path, without a trailing slash.
    pub api_base_url: String,
    /// File the session token is persisted to; `None` keeps it in memory.
    pub token_path: Option<PathBuf>,
    /// Default `limit` for new list stores.
    pub page_size: u32,
    pub request_timeout: Duration,
    pub log_filter: String,
}

impl Config {
    /// Read the config from the process environment, after loading `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        // a missing .env file is fine
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_base_url = var("API_BASE_URL")
            .or_else(|| var("NEXT_PUBLIC_API_URL"))
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let page_size = match var("PAGE_SIZE") {
            Some(raw) => parse_number("PAGE_SIZE", &raw)?,
            None => payloads::query::DEFAULT_PAGE_SIZE,
        };
        if page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number(
                "REQUEST_TIMEOUT_SECS",
                &raw,
            )?),
            None => payloads::api_client::DEFAULT_TIMEOUT,
        };

        Ok(Config {
            api_base_url,
            token_path: var("TOKEN_PATH").map(PathBuf::from),
            page_size,
            request_timeout,
            log_filter: var("LOG_FILTER")
                .unwrap_or_else(|| DEFAULT_FILTER.to_string()),
        })
    }

    /// A session backed by the configured token file, if any.
    pub fn session(&self) -> Session {
        match &self.token_path {
            Some(path) => Session::new(Arc::new(FileTokenStore::new(path))),
            None => Session::in_memory(),
        }
    }

    pub fn client(&self) -> Result<APIClient, ClientError> {
        APIClient::with_timeout(
            &self.api_base_url,
            self.session(),
            self.request_timeout,
        )
    }
}

fn parse_number<T: std::str::FromStr>(
    key: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    raw.parse().map_err(|_| ConfigError::InvalidNumber {
        key,
        value: raw.to_string(),
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    InvalidNumber { key: &'static str, value: String },
    #[error("PAGE_SIZE must be at least 1")]
    ZeroPageSize,
    #[error(transparent)]
    Client(#[from] ClientError),
}
