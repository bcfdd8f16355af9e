//! Local diagnostics for entries that never reached Seq.
//!
//! The dispatcher never returns errors to producers. Every failure is turned
//! into a [`FailureReport`] and handed to a [`DiagnosticSink`]. The default
//! [`LogSink`] writes reports through the `log` facade; tests and embedding
//! applications can inject their own sink.

use std::fmt;

use log::warn;
use thiserror::Error;

use crate::log_entry::LogEntry;
use crate::validation::ValidationError;

/// Why an entry was lost.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    /// The entry failed validation and was never queued.
    #[error("validation failed for log entry: {0}")]
    Validation(#[from] ValidationError),
    /// The payload could not be serialised.
    #[error("failed to serialise log entry: {0}")]
    Serialization(String),
    /// The HTTP request could not be built (bad URL or header).
    #[error("failed to create HTTP request: {0}")]
    RequestConstruction(String),
    /// The request could not be sent or the response could not be read.
    #[error("failed to send log entry: {0}")]
    Transport(String),
    /// Seq answered with something other than 200 OK.
    #[error("Seq server responded with {status}. Response: {body}")]
    RemoteRejection { status: u16, body: String },
    /// The queue was full and the overflow policy rejected the entry.
    #[error("dispatcher queue is full")]
    QueueFull,
    /// The dispatcher had already been closed.
    #[error("dispatcher is closed")]
    Closed,
}

/// One lost entry together with the reason it was lost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailureReport {
    pub error: DispatchError,
    pub level: String,
    pub message_template: String,
}

impl FailureReport {
    pub fn new(error: DispatchError, entry: &LogEntry) -> Self {
        Self {
            error,
            level: entry.level.clone(),
            message_template: entry.message_template.clone(),
        }
    }
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; local log: {} - {}",
            self.error, self.level, self.message_template
        )
    }
}

/// Receives reports for entries that were not delivered.
///
/// Sinks are called from producer threads (validation, overflow, closed)
/// and from the worker thread (everything else), so they must be
/// `Send + Sync`. Implementations must not log through the dispatcher that
/// owns them.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, report: &FailureReport);
}

/// Sink writing every report as a `log` warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, report: &FailureReport) {
        warn!("seqlog: {report}");
    }
}

impl<F> DiagnosticSink for F
where
    F: Fn(&FailureReport) + Send + Sync,
{
    fn report(&self, report: &FailureReport) {
        self(report)
    }
}
