//! Tracker configuration
//!
//! Defines the connection and polling parameters for tracking remote jobs.

use std::time::Duration;

use kiln_client::GenerationClient;

/// Default service base URL
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8000";

/// Tracker configuration
///
/// The poll cadence is fixed for the lifetime of a job; it is configurable to
/// allow tuning for different deployments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Generation service base URL (e.g., "http://localhost:8000")
    pub service_url: String,

    /// Delay between status queries for an active job
    pub poll_interval: Duration,

    /// Upper bound on a single HTTP request
    pub request_timeout: Duration,
}

impl Config {
    /// Creates a new configuration with defaults
    pub fn new(service_url: String) -> Self {
        Self {
            service_url,
            poll_interval: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Creates configuration from environment variables
    ///
    /// Expected environment variables:
    /// - KILN_SERVICE_URL (optional, default: http://localhost:8000)
    /// - KILN_POLL_INTERVAL_MS (optional, milliseconds, default: 1000)
    /// - KILN_REQUEST_TIMEOUT_SECS (optional, seconds, default: 30)
    ///
    /// Each variable falls back to its own default.
    pub fn from_env() -> anyhow::Result<Self> {
        let service_url =
            std::env::var("KILN_SERVICE_URL").unwrap_or_else(|_| DEFAULT_SERVICE_URL.to_string());

        let poll_interval = std::env::var("KILN_POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(Duration::from_secs(1));

        let request_timeout = std::env::var("KILN_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));

        let config = Self {
            service_url,
            poll_interval,
            request_timeout,
        };
        config.validate()?;
        Ok(config)
    }

    /// Overrides the poll cadence
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Overrides the per-request timeout
    pub fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.service_url.is_empty() {
            anyhow::bail!("service_url cannot be empty");
        }

        if !self.service_url.starts_with("http://") && !self.service_url.starts_with("https://") {
            anyhow::bail!("service_url must start with http:// or https://");
        }

        if self.poll_interval.is_zero() {
            anyhow::bail!("poll_interval must be greater than 0");
        }

        if self.request_timeout.is_zero() {
            anyhow::bail!("request_timeout must be greater than 0");
        }

        Ok(())
    }

    /// Builds an HTTP client for the configured service
    pub fn client(&self) -> anyhow::Result<GenerationClient> {
        let http_client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .build()?;

        Ok(GenerationClient::with_client(
            self.service_url.clone(),
            http_client,
        ))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SERVICE_URL.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_url, DEFAULT_SERVICE_URL);
        assert_eq!(config.poll_interval, Duration::from_secs(1));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.service_url = String::new();
        assert!(config.validate().is_err());

        config.service_url = "localhost:8000".to_string();
        assert!(config.validate().is_err());

        config.service_url = "https://gen.example.com".to_string();
        assert!(config.validate().is_ok());

        config.poll_interval = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_poll_interval() {
        let config = Config::default().with_poll_interval(Duration::from_millis(250));
        assert_eq!(config.poll_interval, Duration::from_millis(250));
    }

    #[test]
    fn test_with_request_timeout() {
        let config = Config::default().with_request_timeout(Duration::from_secs(5));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert!(config.validate().is_ok());
        assert!(config.with_request_timeout(Duration::ZERO).validate().is_err());
    }

    #[test]
    fn test_client_uses_service_url() {
        let client = Config::new("http://gen.local:9000/".to_string())
            .client()
            .unwrap();
        assert_eq!(client.base_url(), "http://gen.local:9000");
    }
}
