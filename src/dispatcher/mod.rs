//! Background delivery of log entries to a Seq raw-events endpoint.
//!
//! [`SeqDispatcher`] owns a bounded queue and a single worker thread. The
//! worker serialises each entry as a one-event raw-events payload and POSTs
//! it with `ureq`.
//!
//! # Delivery semantics
//!
//! - **Order**: strict FIFO with one request in flight at a time.
//! - **Success**: HTTP 200 only.
//! - **Failures**: serialisation, request construction, transport errors
//!   and non-200 responses are reported to the
//!   [`DiagnosticSink`](crate::DiagnosticSink) and the entry is dropped.
//!   There is no retry.
//! - **Backpressure**: `log` blocks while the queue is full unless another
//!   [`OverflowPolicy`] is configured.
//! - **Shutdown**: `close` and `Drop` drain queued entries, bounded by the
//!   flush timeout.

mod builder;
mod config;
mod handle;
mod payload;
mod transport;
mod worker;


pub use builder::{BuildError, DispatcherBuilder};
pub use config::{
    DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONNECT_TIMEOUT, DEFAULT_FLUSH_TIMEOUT,
    DEFAULT_REQUEST_TIMEOUT, DispatcherConfig, OverflowPolicy,
};
pub use handle::SeqDispatcher;
pub use payload::serialise_payload;
pub use transport::{
    API_KEY_HEADER, CONTENT_TYPE_JSON, EventRequest, EventTransport, TransportResponse,
    UreqTransport,
};
