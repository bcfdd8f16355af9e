//! Log entry representation.
//!
//! A [`LogEntry`] is one structured event: a timestamp, a level, a message
//! template and an optional property bag. Entries are immutable once they
//! have been handed to the dispatcher queue.

use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// Property bag attached to an entry.
pub type Fields = Map<String, Value>;

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    /// RFC3339 UTC creation time, e.g. `2024-05-01T09:30:00Z`.
    pub timestamp: String,
    /// Level name as supplied by the caller (e.g. "Information").
    pub level: String,
    /// Human-readable message template.
    pub message_template: String,
    /// Structured properties, if any.
    pub fields: Option<Fields>,
}

impl LogEntry {
    /// Construct an entry stamped with the current UTC time.
    pub fn new(level: &str, message_template: &str, fields: Option<Fields>) -> Self {
        Self::at(Utc::now(), level, message_template, fields)
    }

    /// Construct an entry stamped with `time`.
    pub fn at(
        time: DateTime<Utc>,
        level: &str,
        message_template: &str,
        fields: Option<Fields>,
    ) -> Self {
        Self {
            timestamp: format_timestamp(time),
            level: level.to_owned(),
            message_template: message_template.to_owned(),
            fields,
        }
    }
}

/// Format `time` as RFC3339 with whole seconds and a `Z` suffix.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.level, self.message_template)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn timestamp_is_rfc3339_utc_seconds() {
        let time = Utc
            .with_ymd_and_hms(2024, 5, 1, 9, 30, 0)
            .single()
            .expect("valid time");
        let entry = LogEntry::at(time, "Information", "started", None);
        assert_eq!(entry.timestamp, "2024-05-01T09:30:00Z");
    }

    #[test]
    fn new_stamps_current_time() {
        let before = Utc::now();
        let entry = LogEntry::new("Debug", "tick", None);
        let parsed = DateTime::parse_from_rfc3339(&entry.timestamp).expect("rfc3339");
        assert!(parsed.timestamp() >= before.timestamp());
        assert!(entry.timestamp.ends_with('Z'));
    }

    #[test]
    fn display_renders_fallback_line() {
        let fields = json!({"version": "1.0.0"}).as_object().cloned();
        let entry = LogEntry::new("Information", "Application started", fields);
        assert_eq!(entry.to_string(), "Information - Application started");
    }
}
