//! Client configuration.
//!
//! A `ClientConfig` is built once and handed to `PetClient`; nothing mutates
//! it afterwards. Validation happens here so a malformed base URL is reported
//! before any request is built.

use std::env;
use std::time::Duration;

use crate::error::{ApiError, ApiResult};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v2";
pub const DEFAULT_RESOURCE_PATH: &str = "pet";

/// Immutable settings carried for the lifetime of a client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    base_url: String,
    resource_path: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl ClientConfig {
    /// Validate `base_url` and build a config with default settings.
    ///
    /// The URL must use the `http` or `https` scheme and name a host. A
    /// trailing slash is stripped.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let rest = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .ok_or_else(|| {
                ApiError::InvalidConfig(format!("base URL must be http(s): {base_url:?}"))
            })?;
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ApiError::InvalidConfig(format!(
                "base URL has no host: {base_url:?}"
            )));
        }
        Ok(Self {
            base_url: trimmed.to_string(),
            resource_path: DEFAULT_RESOURCE_PATH.to_string(),
            api_key: None,
            timeout: None,
        })
    }

    /// Build a config from `PETSTORE_BASE_URL`, `PETSTORE_API_KEY` and
    /// `PETSTORE_TIMEOUT_SECS`.
    pub fn from_env() -> ApiResult<Self> {
        let base_url =
            env::var("PETSTORE_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;
        if let Ok(key) = env::var("PETSTORE_API_KEY") {
            config = config.with_api_key(key);
        }
        if let Ok(secs) = env::var("PETSTORE_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                ApiError::InvalidConfig(format!("PETSTORE_TIMEOUT_SECS is not a number: {secs:?}"))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Resource path appended to the base URL. Surrounding slashes are removed.
    pub fn with_resource_path(mut self, path: &str) -> Self {
        self.resource_path = path.trim_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// `{base_url}/{resource_path}`
    pub fn collection_url(&self) -> String {
        if self.resource_path.is_empty() {
            self.base_url.clone()
        } else {
            format!("{}/{}", self.base_url, self.resource_path)
        }
    }
}
