//! Asynchronous forwarding of structured log events to Seq.
//!
//! Producers call [`SeqDispatcher::log`]; entries are validated, queued and
//! delivered one at a time by a background worker to a Seq raw-events
//! endpoint. Delivery is best-effort: failures are reported to a
//! [`DiagnosticSink`] and never surface to the caller.
//!
//! ```no_run
//! use seqlog::SeqDispatcher;
//! use serde_json::json;
//!
//! let seq = SeqDispatcher::new("http://localhost:5341/api/events/raw", "", 100);
//! seq.log(
//!     "Information",
//!     "Application started",
//!     json!({"version": "1.0.0"}).as_object().cloned(),
//! );
//! seq.close();
//! ```

pub mod dispatcher;
pub mod level;
pub mod log_entry;
pub mod rate_limited_warner;
pub mod report;
pub mod validation;

#[cfg(test)]
mod test_utils;

pub use dispatcher::{
    BuildError, DispatcherBuilder, DispatcherConfig, EventRequest, EventTransport, OverflowPolicy,
    SeqDispatcher, TransportResponse, UreqTransport,
};
pub use level::{ParseLevelError, SeqLevel};
pub use log_entry::{Fields, LogEntry};
pub use report::{DiagnosticSink, DispatchError, FailureReport, LogSink};
pub use validation::{ValidationError, validate};
