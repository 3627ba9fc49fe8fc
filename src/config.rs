use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const DEFAULT_TOKEN_PATH: &str = ".edux_token";
pub const DEFAULT_STUB_ADDR: &str = "127.0.0.1:5000";
pub const DEFAULT_DATABASE_URL: &str = "sqlite::memory:";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Settings shared by the terminal front-end and the local portal stub.
#[derive(Clone, Debug)]
pub struct PortalConfig {
    pub api_url: String,
    pub token_path: PathBuf,
    pub stub_addr: SocketAddr,
    pub database_url: String,
    pub http_timeout: Duration,
}

impl PortalConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = lookup("EDUX_API_URL")
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        if !api_url.starts_with("http://") && !api_url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "EDUX_API_URL must be an http(s) URL, got {}",
                api_url
            )));
        }

        let token_path = lookup("EDUX_TOKEN_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_PATH));

        let stub_addr = lookup("EDUX_STUB_ADDR")
            .unwrap_or_else(|| DEFAULT_STUB_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("EDUX_STUB_ADDR is invalid: {}", e)))?;

        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let http_timeout = match lookup("EDUX_HTTP_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                AppError::Config(format!("EDUX_HTTP_TIMEOUT_SECS is invalid: {}", e))
            })?,
            None => Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        };

        Ok(Self {
            api_url,
            token_path,
            stub_addr,
            database_url,
            http_timeout,
        })
    }
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_path: PathBuf::from(DEFAULT_TOKEN_PATH),
            stub_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
