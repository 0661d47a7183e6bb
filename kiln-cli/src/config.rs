//! Configuration module
//!
//! Resolves the tracker configuration for this invocation. Each value comes
//! from its flag, then its environment variable (filled in by clap), then the
//! tracker default.

use std::time::Duration;

use anyhow::Result;
use kiln_tracker::Config;

/// Values supplied on the command line or through the environment
#[derive(Debug, Default)]
pub struct Overrides {
    pub service_url: Option<String>,
    pub poll_interval_ms: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

/// Builds and validates the configuration for this invocation
pub fn load_config(overrides: Overrides) -> Result<Config> {
    let mut config = Config::default();

    if let Some(url) = overrides.service_url {
        config.service_url = url;
    }
    if let Some(ms) = overrides.poll_interval_ms {
        config = config.with_poll_interval(Duration::from_millis(ms));
    }
    if let Some(secs) = overrides.request_timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override() {
        let config = load_config(Overrides {
            service_url: Some("http://gen.local:9000".to_string()),
            poll_interval_ms: Some(250),
            request_timeout_secs: Some(5),
        })
        .unwrap();
        assert_eq!(config.service_url, "http://gen.local:9000");
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_each_value_falls_back_independently() {
        let config = load_config(Overrides {
            poll_interval_ms: Some(250),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(config.service_url, kiln_tracker::config::DEFAULT_SERVICE_URL);
        assert_eq!(config.poll_interval, Duration::from_millis(250));
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let bad_url = Overrides {
            service_url: Some("gen.local".to_string()),
            ..Default::default()
        };
        assert!(load_config(bad_url).is_err());

        let zero_interval = Overrides {
            poll_interval_ms: Some(0),
            ..Default::default()
        };
        assert!(load_config(zero_interval).is_err());

        let zero_timeout = Overrides {
            request_timeout_secs: Some(0),
            ..Default::default()
        };
        assert!(load_config(zero_timeout).is_err());
    }
}
