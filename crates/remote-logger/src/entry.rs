// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Log entry model shipped to the ingest service.
//!
//! An entry is stamped when it is created, not when it is flushed, so the
//! timestamp reflects when the application emitted the event even if the
//! batch leaves the process much later.

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use std::fmt;

/// Severity of a single log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Info,
    Warn,
    Error,
    Debug,
}

impl LogLevel {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One structured log event.
///
/// Fields are private so an entry cannot be changed after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    level: LogLevel,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    meta: Option<serde_json::Value>,
    timestamp: String,
}

impl LogEntry {
    /// Creates an entry stamped with the current UTC time.
    #[must_use]
    pub fn new(level: LogLevel, message: impl Into<String>, meta: Option<serde_json::Value>) -> Self {
        Self {
            level,
            message: message.into(),
            meta,
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    #[must_use]
    pub fn level(&self) -> LogLevel {
        self.level
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn meta(&self) -> Option<&serde_json::Value> {
        self.meta.as_ref()
    }

    /// ISO-8601 creation time, e.g. `2025-03-01T12:00:00.123Z`.
    #[must_use]
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    #[test]
    fn test_level_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warn\"");
        assert_eq!(LogLevel::Debug.to_string(), "debug");
    }

    #[test]
    fn test_timestamp_is_iso8601_utc_millis() {
        let entry = LogEntry::new(LogLevel::Info, "hello", None);
        let ts = entry.timestamp();
        assert!(ts.ends_with('Z'), "timestamp {ts} should be UTC");
        assert_eq!(ts.len(), "2025-03-01T12:00:00.123Z".len());
        assert!(DateTime::parse_from_rfc3339(ts).is_ok());
    }

    #[test]
    fn test_meta_omitted_when_absent() {
        let entry = LogEntry::new(LogLevel::Error, "boom", None);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "boom");
        assert!(value.get("meta").is_none());
        assert!(value["timestamp"].is_string());
    }

    #[test]
    fn test_meta_passed_through_untouched() {
        let meta = json!({"user": {"id": 1, "name": "Test"}, "action": "login"});
        let entry = LogEntry::new(LogLevel::Info, "Complex object", Some(meta.clone()));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["meta"], meta);
        assert_eq!(entry.meta(), Some(&meta));
    }

    #[test]
    fn test_entry_serializes_only_wire_fields() {
        let entry = LogEntry::new(LogLevel::Warn, "careful", Some(json!({"code": 123})));
        let value = serde_json::to_value(&entry).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        assert_eq!(keys, ["level", "message", "meta", "timestamp"]);
    }
}
