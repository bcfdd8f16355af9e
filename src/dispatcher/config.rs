//! Configuration consumed by the dispatcher lifecycle.
//!
//! [`DispatcherBuilder`](super::DispatcherBuilder) validates and assembles
//! these values before handing them to
//! [`SeqDispatcher`](super::SeqDispatcher).

use std::time::Duration;

use crate::rate_limited_warner::DEFAULT_WARN_INTERVAL;

/// Default bounded channel capacity.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;
/// Default connection timeout applied when establishing HTTP connections.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
/// Default timeout for a whole request, including reading the response.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default time `close` and `Drop` wait for the queue to drain.
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(30);

/// What `log` does when the queue is at capacity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Block the producer until the worker frees a slot.
    #[default]
    Block,
    /// Reject the entry immediately.
    Drop,
    /// Block for at most the given duration, then reject the entry.
    Timeout(Duration),
}

/// Configuration object describing how to construct a
/// [`SeqDispatcher`](super::SeqDispatcher).
#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Raw-events endpoint, e.g. `http://localhost:5341/api/events/raw`.
    pub url: String,
    /// Seq API key. `None` or an empty key sends no `X-Seq-ApiKey` header.
    pub api_key: Option<String>,
    /// Bounded channel capacity for the producer-consumer queue.
    pub capacity: usize,
    /// Behaviour of `log` when the queue is full.
    pub overflow_policy: OverflowPolicy,
    /// Timeout for establishing connections.
    pub connect_timeout: Duration,
    /// Timeout for a single request. `None` lets a send wait indefinitely.
    pub request_timeout: Option<Duration>,
    /// Time `close` and `Drop` wait for queued entries to be sent.
    pub flush_timeout: Duration,
    /// Interval between lost-entry summaries.
    pub warn_interval: Duration,
    /// Accept self-signed or otherwise invalid TLS certificates.
    pub accept_invalid_certs: bool,
}

impl DispatcherConfig {
    /// Configuration for `url` with every other setting at its default.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// The API key to send, if it is set and non-empty.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|key| !key.is_empty())
    }
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: None,
            capacity: DEFAULT_CHANNEL_CAPACITY,
            overflow_policy: OverflowPolicy::default(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            request_timeout: Some(DEFAULT_REQUEST_TIMEOUT),
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
            warn_interval: DEFAULT_WARN_INTERVAL,
            accept_invalid_certs: false,
        }
    }
}
