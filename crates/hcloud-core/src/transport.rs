//! The HTTP seam.
//!
//! Resource operations only need a narrow surface: send a method, a path with its
//! query string and an optional JSON body, and get back status, headers and raw
//! body. [`Transport`] captures that surface; [`HttpTransport`] implements it with
//! `reqwest`. Connection and timeout failures are mapped to [`Error`] and returned
//! without further handling. Nothing here retries.

use crate::client::ClientConfig;
use crate::config::HcloudConfig;
use crate::{Error, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

const LIBRARY_AGENT: &str = concat!("hcloud-rust/", env!("CARGO_PKG_VERSION"));

/// A request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Path relative to the API base URL, including any query string.
    pub path: String,
    /// Optional JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no body.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
        }
    }

    /// `GET` request.
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// `POST` request with a JSON body.
    #[must_use]
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::POST, path).with_body(body)
    }

    /// `PUT` request with a JSON body.
    #[must_use]
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::PUT, path).with_body(body)
    }

    /// `DELETE` request.
    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A completed HTTP exchange as seen by the access layer.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Response status.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
    /// Raw response body.
    pub body: Bytes,
}

impl RawResponse {
    /// Assemble a response from its parts.
    #[must_use]
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// A response carrying a JSON body and no headers.
    #[must_use]
    pub fn from_json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, HeaderMap::new(), body.to_string())
    }

    /// Decode the body as JSON.
    ///
    /// An empty body (e.g. `204 No Content`) decodes as `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParseError`] if the body is not valid JSON.
    pub fn json(&self) -> Result<Value> {
        if self.body.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&self.body)
            .map_err(|err| Error::ParseError(format!("Invalid JSON response body: {err}")))
    }
}

/// Sends requests to the API.
///
/// Implementations must be safe to share between tasks; the access layer holds
/// them behind an `Arc`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one HTTP round trip.
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was received (connection failure,
    /// timeout). Non-2xx responses are returned as `Ok`.
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse>;
}

/// Builder for [`HttpTransport`].
#[derive(Debug)]
pub struct HttpTransportBuilder {
    base_url: Url,
    http_config: ClientConfig,
    token: Option<SecretString>,
    user_agent: Option<String>,
}

impl HttpTransportBuilder {
    /// Create a builder for the given API base URL (e.g. `https://api.hetzner.cloud/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the URL cannot be parsed.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let config = HcloudConfig {
            base_url: base_url.as_ref().to_string(),
            ..HcloudConfig::default()
        };
        Self::from_config(&config)
    }

    /// Create a builder from a full client configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the configuration does not validate.
    pub fn from_config(config: &HcloudConfig) -> Result<Self> {
        let config = config.clone().validated()?;
        Ok(Self {
            base_url: config.parse_base_url()?,
            http_config: config.http_config(),
            token: config.api_token.map(SecretString::from),
            user_agent: config.user_agent,
        })
    }

    /// Override the HTTP client configuration.
    #[must_use]
    pub fn with_http_config(mut self, config: ClientConfig) -> Self {
        self.http_config = config;
        self
    }

    /// Configure the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(SecretString::from(token.into()));
        self
    }

    /// Configure a user agent prefix.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<HttpTransport> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let mut builder = ClientBuilder::new()
            .timeout(self.http_config.timeout)
            .connect_timeout(self.http_config.connect_timeout)
            .user_agent(user_agent(self.user_agent.as_deref()))
            .default_headers(default_headers)
            .pool_idle_timeout(self.http_config.pool_idle_timeout)
            .pool_max_idle_per_host(self.http_config.pool_max_idle_per_host);

        if !self.http_config.enable_compression {
            builder = builder.no_gzip();
        }

        let http = builder
            .build()
            .map_err(|err| Error::ConfigError(format!("Failed to build HTTP client: {err}")))?;

        Ok(HttpTransport {
            http,
            base_url: self.base_url,
            token: self.token,
            enable_logging: self.http_config.enable_logging,
        })
    }
}

/// `User-Agent` value: the caller's prefix, if any, followed by the library agent.
fn user_agent(prefix: Option<&str>) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{prefix} {LIBRARY_AGENT}"),
        _ => LIBRARY_AGENT.to_string(),
    }
}

/// [`Transport`] backed by `reqwest`.
#[derive(Debug)]
pub struct HttpTransport {
    http: Client,
    base_url: Url,
    token: Option<SecretString>,
    enable_logging: bool,
}

impl HttpTransport {
    /// Create a transport for the given base URL with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be built.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        HttpTransportBuilder::new(base_url)?.build()
    }

    /// Start building a transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn builder(base_url: impl AsRef<str>) -> Result<HttpTransportBuilder> {
        HttpTransportBuilder::new(base_url)
    }

    /// Build a transport from a client configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the client cannot be built.
    pub fn from_config(config: &HcloudConfig) -> Result<Self> {
        HttpTransportBuilder::from_config(config)?.build()
    }

    /// Access the underlying base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> Result<Url> {
        let normalized = path.strip_prefix('/').unwrap_or(path);

        self.base_url
            .join(normalized)
            .map_err(|err| Error::InvalidEndpoint(format!("Invalid API path `{path}`: {err}")))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<RawResponse> {
        let url = self.build_url(&request.path)?;
        let mut builder = self.http.request(request.method.clone(), url);

        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        if self.enable_logging {
            info!(method = %request.method, path = %request.path, "hcloud request");
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        if self.enable_logging {
            debug!(status = status.as_u16(), bytes = body.len(), "hcloud response");
        }

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_transport(server: &MockServer) -> HttpTransport {
        HttpTransport::builder(format!("{}/v1", server.uri()))
            .unwrap()
            .with_token("test-token")
            .build()
            .unwrap()
    }

    #[test]
    fn user_agent_prefix() {
        assert_eq!(user_agent(None), LIBRARY_AGENT);
        assert_eq!(user_agent(Some("")), LIBRARY_AGENT);
        assert_eq!(
            user_agent(Some("my-tool/2.0")),
            format!("my-tool/2.0 {LIBRARY_AGENT}")
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = HttpTransport::new("::not-a-url::").unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn raw_response_json_handles_empty_body() {
        let response = RawResponse::new(StatusCode::NO_CONTENT, HeaderMap::new(), Bytes::new());
        assert_eq!(response.json().unwrap(), Value::Null);

        let response = RawResponse::new(StatusCode::OK, HeaderMap::new(), "<html>");
        assert!(matches!(response.json(), Err(Error::ParseError(_))));
    }

    #[tokio::test]
    async fn get_sends_auth_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/images"))
            .and(query_param("page", "2"))
            .and(header("authorization", "Bearer test-token"))
            .and(header("user-agent", LIBRARY_AGENT))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("RateLimit-Remaining", "3599")
                    .set_body_json(json!({ "images": [] })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let transport = test_transport(&server);
        let response = transport
            .execute(ApiRequest::get("images?page=2"))
            .await
            .unwrap();

        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json().unwrap(), json!({ "images": [] }));
        assert_eq!(response.headers["ratelimit-remaining"], "3599");
    }

    #[tokio::test]
    async fn post_sends_json_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/placement_groups"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "name": "pg", "type": "spread" })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let transport = test_transport(&server);
        let response = transport
            .execute(ApiRequest::post(
                "/placement_groups",
                json!({ "name": "pg", "type": "spread" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status, StatusCode::CREATED);
    }

    #[tokio::test]
    async fn error_statuses_are_returned_not_raised() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/images/42"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "error": { "code": "not_found", "message": "image not found" }
            })))
            .mount(&server)
            .await;

        let transport = test_transport(&server);
        let response = transport.execute(ApiRequest::get("images/42")).await.unwrap();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn connection_failure_surfaces_as_transport_error() {
        let transport = HttpTransport::builder("http://127.0.0.1:1/v1")
            .unwrap()
            .with_http_config(ClientConfig::new().with_logging(false))
            .build()
            .unwrap();

        let err = transport
            .execute(ApiRequest::get("images"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ServiceUnavailable(_) | Error::HttpError(_) | Error::Timeout(_)
        ));
    }
}
