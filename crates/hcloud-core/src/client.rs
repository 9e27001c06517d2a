//! Tuning for the `reqwest` client behind [`crate::HttpTransport`].
//!
//! Requests are sent exactly once; nothing in this module configures retries.

use std::time::Duration;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT: u64 = 30;

/// Default connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT: u64 = 10;

/// Seconds an idle pooled connection to the API host is kept open.
pub const DEFAULT_POOL_IDLE_TIMEOUT: u64 = 90;

/// Idle connections kept per host.
pub const DEFAULT_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// HTTP-level settings for the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-request deadline
    pub timeout: Duration,

    /// TCP/TLS connect deadline
    pub connect_timeout: Duration,

    /// How long idle pooled connections survive
    pub pool_idle_timeout: Duration,

    /// Idle pooled connections per host
    pub pool_max_idle_per_host: usize,

    /// Emit a `tracing` event per request and response
    pub enable_logging: bool,

    /// Accept gzip-compressed responses
    pub enable_compression: bool,
}

impl ClientConfig {
    /// Settings with the crate defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT),
            pool_idle_timeout: Duration::from_secs(DEFAULT_POOL_IDLE_TIMEOUT),
            pool_max_idle_per_host: DEFAULT_POOL_MAX_IDLE_PER_HOST,
            enable_logging: true,
            enable_compression: true,
        }
    }

    /// Override the request deadline.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the connect deadline.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Override the pool idle timeout.
    #[must_use]
    pub const fn with_pool_idle_timeout(mut self, timeout: Duration) -> Self {
        self.pool_idle_timeout = timeout;
        self
    }

    /// Override the number of idle connections kept per host.
    #[must_use]
    pub const fn with_pool_max_idle_per_host(mut self, max: usize) -> Self {
        self.pool_max_idle_per_host = max;
        self
    }

    /// Toggle request/response events.
    #[must_use]
    pub const fn with_logging(mut self, enabled: bool) -> Self {
        self.enable_logging = enabled;
        self
    }

    /// Toggle gzip.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.enable_compression = enabled;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}
