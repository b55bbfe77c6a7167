// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::errors::LoggerError;
use std::env;
use std::time::Duration;

pub const DEFAULT_INGEST_URL: &str = "https://remote-logger-dashboard.vercel.app";
pub const DEFAULT_BUFFER_SIZE: usize = 10;
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_millis(5000);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const VALID_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration for a [`RemoteLogger`](crate::logger::RemoteLogger)
#[derive(Debug, Clone)]
pub struct RemoteLoggerConfig {
    /// Identifies the log stream on the ingest service
    pub package_name: String,
    /// Enables authenticated mode; anonymous when absent
    pub password: Option<String>,
    /// Asks the auth endpoint to provision the account on first use
    pub is_new_account: bool,
    /// Destination label forwarded with every batch
    pub table_name: Option<String>,
    /// Number of buffered entries that triggers an immediate flush
    pub buffer_size: usize,
    /// Delay after the first buffered entry before a timed flush
    pub flush_interval: Duration,
    /// Base URL of the ingest service
    pub ingest_url: String,
    /// Per-request timeout for auth and submission calls
    pub request_timeout: Duration,
    /// HTTPS proxy URL
    pub https_proxy: Option<String>,
    /// Upper bound on queued entries while flushes are being skipped
    pub max_buffered_entries: Option<usize>,
    /// Log level for the process's own subscriber
    pub log_level: String,
}

impl Default for RemoteLoggerConfig {
    fn default() -> Self {
        Self {
            package_name: String::new(),
            password: None,
            is_new_account: false,
            table_name: None,
            buffer_size: DEFAULT_BUFFER_SIZE,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            ingest_url: DEFAULT_INGEST_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            https_proxy: None,
            max_buffered_entries: None,
            log_level: "info".to_string(),
        }
    }
}

impl RemoteLoggerConfig {
    pub fn new(package_name: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            ..Default::default()
        }
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, LoggerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, LoggerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let package_name = lookup("REMOTE_LOGGER_PACKAGE_NAME").unwrap_or_default();
        let password = lookup("REMOTE_LOGGER_PASSWORD").filter(|val| !val.is_empty());
        let is_new_account = lookup("REMOTE_LOGGER_NEW_ACCOUNT")
            .map(|val| val.to_lowercase() == "true")
            .unwrap_or(false);
        let table_name = lookup("REMOTE_LOGGER_TABLE_NAME").filter(|val| !val.is_empty());
        let buffer_size = lookup("REMOTE_LOGGER_BUFFER_SIZE")
            .and_then(|val| val.parse::<usize>().ok())
            .unwrap_or(defaults.buffer_size);
        let flush_interval = lookup("REMOTE_LOGGER_FLUSH_INTERVAL_MS")
            .and_then(|val| val.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.flush_interval);
        let ingest_url = lookup("REMOTE_LOGGER_INGEST_URL").unwrap_or(defaults.ingest_url);
        let request_timeout = lookup("REMOTE_LOGGER_TIMEOUT_MS")
            .and_then(|val| val.parse::<u64>().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.request_timeout);
        let https_proxy =
            lookup("REMOTE_LOGGER_PROXY_HTTPS").or_else(|| lookup("HTTPS_PROXY"));
        let max_buffered_entries = lookup("REMOTE_LOGGER_MAX_BUFFERED")
            .and_then(|val| val.parse::<usize>().ok());
        let log_level = lookup("REMOTE_LOGGER_LOG_LEVEL")
            .map(|val| val.to_lowercase())
            .unwrap_or(defaults.log_level);

        let config = Self {
            package_name,
            password,
            is_new_account,
            table_name,
            buffer_size,
            flush_interval,
            ingest_url,
            request_timeout,
            https_proxy,
            max_buffered_entries,
            log_level,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LoggerError> {
        if self.package_name.trim().is_empty() {
            return Err(LoggerError::InvalidConfig(
                "package name cannot be empty".to_string(),
            ));
        }

        if self.buffer_size == 0 {
            return Err(LoggerError::InvalidConfig(
                "buffer size must be at least 1".to_string(),
            ));
        }

        if self.flush_interval.is_zero() {
            return Err(LoggerError::InvalidConfig(
                "flush interval must be greater than 0".to_string(),
            ));
        }

        if self.ingest_url.trim().is_empty() {
            return Err(LoggerError::InvalidConfig(
                "ingest URL cannot be empty".to_string(),
            ));
        }

        if let Some(max) = self.max_buffered_entries {
            if max < self.buffer_size {
                return Err(LoggerError::InvalidConfig(format!(
                    "max buffered entries ({max}) must not be below buffer size ({})",
                    self.buffer_size
                )));
            }
        }

        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(LoggerError::InvalidConfig(format!(
                "Invalid log level '{}'. Must be one of: trace, debug, info, warn, error",
                self.log_level
            )));
        }

        Ok(())
    }

    /// Ingest base URL without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.ingest_url.trim().trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_new_config_is_valid() {
        let config = RemoteLoggerConfig::new("com.demo.app");
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_size, 10);
        assert_eq!(config.flush_interval, Duration::from_millis(5000));
        assert!(!config.is_new_account);
    }

    #[test]
    fn test_default_config_requires_package_name() {
        let config = RemoteLoggerConfig::default();
        assert!(config.validate().is_err());

        let config = RemoteLoggerConfig::new("   ");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_buffer_size() {
        let config = RemoteLoggerConfig {
            buffer_size: 0,
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_err());

        let config = RemoteLoggerConfig {
            buffer_size: 1,
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_flush_interval() {
        let config = RemoteLoggerConfig {
            flush_interval: Duration::ZERO,
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_buffered_entries() {
        let config = RemoteLoggerConfig {
            buffer_size: 10,
            max_buffered_entries: Some(5),
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_err());

        let config = RemoteLoggerConfig {
            buffer_size: 10,
            max_buffered_entries: Some(10),
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let config = RemoteLoggerConfig {
            log_level: "verbose".to_string(),
            ..RemoteLoggerConfig::new("app")
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_trims_trailing_slash() {
        let config = RemoteLoggerConfig {
            ingest_url: "http://127.0.0.1:1234/".to_string(),
            ..RemoteLoggerConfig::new("app")
        };
        assert_eq!(config.base_url(), "http://127.0.0.1:1234");
    }

    #[test]
    fn test_from_lookup_reads_all_values() {
        let config = RemoteLoggerConfig::from_lookup(lookup_from(&[
            ("REMOTE_LOGGER_PACKAGE_NAME", "com.demo.app"),
            ("REMOTE_LOGGER_PASSWORD", "secure-password-123"),
            ("REMOTE_LOGGER_NEW_ACCOUNT", "TRUE"),
            ("REMOTE_LOGGER_TABLE_NAME", "logs"),
            ("REMOTE_LOGGER_BUFFER_SIZE", "1"),
            ("REMOTE_LOGGER_FLUSH_INTERVAL_MS", "250"),
            ("REMOTE_LOGGER_INGEST_URL", "http://localhost:3000"),
            ("REMOTE_LOGGER_TIMEOUT_MS", "1500"),
            ("HTTPS_PROXY", "http://proxy:3128"),
            ("REMOTE_LOGGER_MAX_BUFFERED", "100"),
            ("REMOTE_LOGGER_LOG_LEVEL", "DEBUG"),
        ]))
        .expect("config should be valid");

        assert_eq!(config.package_name, "com.demo.app");
        assert_eq!(config.password.as_deref(), Some("secure-password-123"));
        assert!(config.is_new_account);
        assert_eq!(config.table_name.as_deref(), Some("logs"));
        assert_eq!(config.buffer_size, 1);
        assert_eq!(config.flush_interval, Duration::from_millis(250));
        assert_eq!(config.ingest_url, "http://localhost:3000");
        assert_eq!(config.request_timeout, Duration::from_millis(1500));
        assert_eq!(config.https_proxy.as_deref(), Some("http://proxy:3128"));
        assert_eq!(config.max_buffered_entries, Some(100));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_from_lookup_falls_back_on_unparseable_numbers() {
        let config = RemoteLoggerConfig::from_lookup(lookup_from(&[
            ("REMOTE_LOGGER_PACKAGE_NAME", "app"),
            ("REMOTE_LOGGER_BUFFER_SIZE", "lots"),
            ("REMOTE_LOGGER_FLUSH_INTERVAL_MS", "-5"),
        ]))
        .expect("config should be valid");

        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(config.flush_interval, DEFAULT_FLUSH_INTERVAL);
        assert!(config.password.is_none());
        assert_eq!(config.ingest_url, DEFAULT_INGEST_URL);
    }

    #[test]
    fn test_from_lookup_prefers_specific_proxy() {
        let config = RemoteLoggerConfig::from_lookup(lookup_from(&[
            ("REMOTE_LOGGER_PACKAGE_NAME", "app"),
            ("REMOTE_LOGGER_PROXY_HTTPS", "http://specific:1"),
            ("HTTPS_PROXY", "http://generic:2"),
        ]))
        .expect("config should be valid");
        assert_eq!(config.https_proxy.as_deref(), Some("http://specific:1"));
    }

    #[test]
    fn test_from_lookup_missing_package_name_fails() {
        let result = RemoteLoggerConfig::from_lookup(lookup_from(&[]));
        assert!(matches!(result, Err(LoggerError::InvalidConfig(_))));
    }
}
