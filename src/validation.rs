//! Required-field checks applied before an entry is queued.

use thiserror::Error;

use crate::log_entry::LogEntry;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was empty.
    #[error("missing required log entry field: {0}")]
    MissingField(&'static str),
}

/// Check that `timestamp`, `level` and `message_template` are present.
///
/// `fields` is never required.
pub fn validate(entry: &LogEntry) -> Result<(), ValidationError> {
    for (name, value) in [
        ("timestamp", &entry.timestamp),
        ("level", &entry.level),
        ("message_template", &entry.message_template),
    ] {
        if value.is_empty() {
            return Err(ValidationError::MissingField(name));
        }
    }
    Ok(())
}
