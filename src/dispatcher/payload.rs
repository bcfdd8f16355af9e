//! Wire payload for the Seq raw-events endpoint.
//!
//! Each request carries exactly one event:
//!
//! ```json
//! {"Events":[{"Timestamp":"...","Level":"...","MessageTemplate":"...","Properties":{...}}]}
//! ```
//!
//! The payload structs borrow from the [`LogEntry`] so serialisation does
//! not copy the entry's strings or property bag.

use serde::Serialize;

use crate::log_entry::{Fields, LogEntry};

#[derive(Debug, Serialize)]
pub(crate) struct RawEvents<'a> {
    #[serde(rename = "Events")]
    events: [SeqEvent<'a>; 1],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SeqEvent<'a> {
    timestamp: &'a str,
    level: &'a str,
    message_template: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    properties: Option<&'a Fields>,
}

impl<'a> From<&'a LogEntry> for RawEvents<'a> {
    fn from(entry: &'a LogEntry) -> Self {
        Self {
            events: [SeqEvent {
                timestamp: &entry.timestamp,
                level: &entry.level,
                message_template: &entry.message_template,
                properties: entry.fields.as_ref(),
            }],
        }
    }
}

/// Serialise `entry` into the JSON body of a raw-events request.
///
/// # Errors
///
/// Returns the `serde_json` error if serialisation fails.
pub fn serialise_payload(entry: &LogEntry) -> Result<String, serde_json::Error> {
    serde_json::to_string(&RawEvents::from(entry))
}
