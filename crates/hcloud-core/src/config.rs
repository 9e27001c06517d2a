//! Configuration for Hetzner Cloud clients.
//!
//! Each client owns its configuration; nothing here is process-wide, so clients
//! pointed at different endpoints or projects can coexist.

use crate::client::ClientConfig;
use crate::Error;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;
use validator::Validate;

/// Public Hetzner Cloud API endpoint, including the version prefix.
pub const DEFAULT_BASE_URL: &str = "https://api.hetzner.cloud/v1";

/// Largest page size accepted by list endpoints.
pub const MAX_PER_PAGE: u32 = 50;

/// Configuration for a Hetzner Cloud client instance.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, PartialEq, Eq)]
pub struct HcloudConfig {
    /// API base URL including the version prefix
    #[validate(url)]
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API token sent as a bearer credential
    #[serde(default, skip_serializing)]
    pub api_token: Option<String>,

    /// Prefix prepended to the library user agent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Page size used by paginated listings when the caller sets none
    #[validate(range(min = 1, max = 50))]
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_per_page() -> u32 {
    MAX_PER_PAGE
}

impl HcloudConfig {
    /// Create a new configuration for the given base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or validation fails.
    pub fn new(base_url: impl Into<String>) -> Result<Self, Error> {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
        .validated()
    }

    /// Validate a configuration obtained some other way (e.g. deserialized).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validated(self) -> Result<Self, Error> {
        self.validate()
            .map_err(|e| Error::ConfigError(format!("Invalid configuration: {e}")))?;
        Ok(self)
    }

    /// Set the API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the user agent prefix.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set request timeout in seconds.
    #[must_use]
    pub const fn with_timeout(mut self, seconds: u64) -> Self {
        self.request_timeout_secs = seconds;
        self
    }

    /// Set the default page size for paginated listings.
    #[must_use]
    pub const fn with_per_page(mut self, per_page: u32) -> Self {
        self.per_page = per_page;
        self
    }

    /// Get the request timeout as a Duration.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// HTTP client settings derived from this configuration.
    #[must_use]
    pub const fn http_config(&self) -> ClientConfig {
        ClientConfig::new().with_timeout(self.timeout())
    }

    /// Parse the base URL, ensuring it ends with `/`.
    ///
    /// Resource paths are joined relative to the result, so the version prefix
    /// (`/v1`) must survive the join.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL cannot be parsed.
    pub fn parse_base_url(&self) -> Result<Url, Error> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::ConfigError(format!("Invalid base URL: {e}")))?;
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }
}

impl Default for HcloudConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            user_agent: None,
            request_timeout_secs: default_request_timeout_secs(),
            per_page: default_per_page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_new() {
        let config = HcloudConfig::new("https://api.example.com/v1").unwrap();
        assert_eq!(config.base_url, "https://api.example.com/v1");
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.per_page, MAX_PER_PAGE);
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_config_default() {
        let config = HcloudConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_config_invalid_url() {
        let result = HcloudConfig::new("not a url");
        assert!(matches!(result, Err(Error::ConfigError(_))));
    }

    #[test]
    fn test_config_builder() {
        let config = HcloudConfig::default()
            .with_token("secret")
            .with_user_agent("my-tool/1.0")
            .with_timeout(60)
            .with_per_page(25);

        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.user_agent.as_deref(), Some("my-tool/1.0"));
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.http_config().timeout, Duration::from_secs(60));
        assert_eq!(config.per_page, 25);
    }

    #[test]
    fn test_config_validation_ranges() {
        assert!(HcloudConfig::default().with_per_page(0).validated().is_err());
        assert!(HcloudConfig::default().with_per_page(51).validated().is_err());
        assert!(HcloudConfig::default().with_timeout(0).validated().is_err());
        assert!(HcloudConfig::default().with_timeout(301).validated().is_err());
        assert!(HcloudConfig::default().with_per_page(50).validated().is_ok());
    }

    #[test]
    fn test_parse_base_url_appends_slash() {
        let config = HcloudConfig::new("https://api.example.com/v1").unwrap();
        let url = config.parse_base_url().unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/");
        assert_eq!(
            url.join("images").unwrap().as_str(),
            "https://api.example.com/v1/images"
        );

        let config = HcloudConfig::new("https://api.example.com/v1/").unwrap();
        assert_eq!(
            config.parse_base_url().unwrap().as_str(),
            "https://api.example.com/v1/"
        );
    }

    #[test]
    fn test_config_deserialization_defaults() {
        let config: HcloudConfig = serde_json::from_str(r#"{"api_token": "abc"}"#).unwrap();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.api_token.as_deref(), Some("abc"));
        assert_eq!(config.per_page, MAX_PER_PAGE);
        assert!(config.validated().is_ok());
    }

    #[test]
    fn test_token_is_never_serialized() {
        let config = HcloudConfig::default().with_token("secret");
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("secret"));
        assert!(!json.contains("api_token"));
    }
}
