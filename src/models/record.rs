use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::BTreeMap;

/// Severity of a log record, with the numeric codes used in the `level`
/// column. Ordering follows the codes, so threshold checks are plain
/// comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum Severity {
    Debug = 100,
    Info = 200,
    Notice = 250,
    Warning = 300,
    Error = 400,
    Critical = 500,
    Alert = 550,
    Emergency = 600,
}

impl Severity {
    /// Numeric code stored in the `level` column.
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Upper-case label stored in the `level_name` column. At most 10 bytes,
    /// matching the column capacity.
    pub fn name(&self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Notice => "NOTICE",
            Severity::Warning => "WARNING",
            Severity::Error => "ERROR",
            Severity::Critical => "CRITICAL",
            Severity::Alert => "ALERT",
            Severity::Emergency => "EMERGENCY",
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug => Severity::Debug,
            log::Level::Trace => Severity::Debug,
        }
    }
}

/// One structured log event: fixed fields plus a free-form context map.
///
/// The context keys a sink recognizes are `trace` (a string, typically a
/// stack trace) and `payload` (any JSON value). JSON `null` entries count as
/// absent. Other keys are carried but never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub channel: String,
    pub severity: Severity,
    pub message: String,
    pub timestamp: NaiveDateTime,
    pub context: BTreeMap<String, serde_json::Value>,
}

impl LogRecord {
    pub fn new(
        channel: impl Into<String>,
        severity: Severity,
        message: impl Into<String>,
        timestamp: NaiveDateTime,
    ) -> Self {
        LogRecord {
            channel: channel.into(),
            severity,
            message: message.into(),
            timestamp,
            context: BTreeMap::new(),
        }
    }

    /// Record timestamped with the current UTC wall clock.
    pub fn now(channel: impl Into<String>, severity: Severity, message: impl Into<String>) -> Self {
        Self::new(channel, severity, message, chrono::Utc::now().naive_utc())
    }

    pub fn with_context(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.context.insert(key.into(), value);
        self
    }

    /// The `trace` context entry, if present and a non-null string.
    pub fn trace(&self) -> Option<&str> {
        self.context.get("trace").and_then(|v| v.as_str())
    }

    /// The `payload` context entry, if present and non-null.
    pub fn payload(&self) -> Option<&serde_json::Value> {
        self.context.get("payload").filter(|v| !v.is_null())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_severity_codes_and_names() {
        assert_eq!(Severity::Debug.code(), 100);
        assert_eq!(Severity::Warning.code(), 300);
        assert_eq!(Severity::Emergency.code(), 600);
        assert_eq!(Severity::Error.name(), "ERROR");
        assert_eq!(Severity::Notice.name(), "NOTICE");
    }

    #[test]
    fn test_severity_ordering_follows_codes() {
        assert!(Severity::Debug < Severity::Info);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Alert < Severity::Emergency);
    }

    #[test]
    fn test_severity_names_fit_column_capacity() {
        let all = [
            Severity::Debug,
            Severity::Info,
            Severity::Notice,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
            Severity::Alert,
            Severity::Emergency,
        ];
        for severity in all {
            assert!(severity.name().len() <= 10);
        }
    }

    #[test]
    fn test_null_context_entries_count_as_absent() {
        let record = LogRecord::now("app", Severity::Info, "hello")
            .with_context("trace", json!(null))
            .with_context("payload", json!(null));

        assert_eq!(record.trace(), None);
        assert_eq!(record.payload(), None);
    }

    #[test]
    fn test_context_accessors() {
        let record = LogRecord::now("app", Severity::Error, "boom")
            .with_context("trace", json!("at main.rs:42"))
            .with_context("payload", json!({"a": 1}));

        assert_eq!(record.trace(), Some("at main.rs:42"));
        assert_eq!(record.payload(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_non_string_trace_is_ignored() {
        let record =
            LogRecord::now("app", Severity::Error, "boom").with_context("trace", json!(17));
        assert_eq!(record.trace(), None);
    }
}
