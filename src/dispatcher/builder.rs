//! Builder for [`SeqDispatcher`].
//!
//! Exposes the destination, API key, queue sizing, overflow policy and
//! timeouts. Values are validated before any thread is spawned.

use std::{sync::Arc, time::Duration};

use thiserror::Error;

use crate::report::DiagnosticSink;

use super::{
    config::{DispatcherConfig, OverflowPolicy},
    handle::SeqDispatcher,
    transport::EventTransport,
};

/// Errors that may occur while building a dispatcher.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuildError {
    /// Invalid user supplied configuration.
    #[error("invalid dispatcher configuration: {0}")]
    InvalidConfig(String),
}

macro_rules! ensure_positive {
    ($value:expr, $field:expr) => {{
        if $value == 0 {
            Err(BuildError::InvalidConfig(format!(
                "{} must be greater than zero",
                $field
            )))
        } else {
            Ok($value)
        }
    }};
}

macro_rules! option_setter {
    ($(#[$meta:meta])* $fn_name:ident, $field:ident, $ty:ty) => {
        $(#[$meta])*
        pub fn $fn_name(mut self, value: $ty) -> Self {
            self.$field = Some(value);
            self
        }
    };
}

/// Builder for constructing [`SeqDispatcher`] instances.
#[derive(Clone, Default)]
pub struct DispatcherBuilder {
    url: Option<String>,
    api_key: Option<String>,
    capacity: Option<usize>,
    overflow_policy: Option<OverflowPolicy>,
    connect_timeout_ms: Option<u64>,
    request_timeout_ms: Option<u64>,
    no_request_timeout: bool,
    flush_timeout_ms: Option<u64>,
    warn_interval: Option<Duration>,
    accept_invalid_certs: bool,
    sink: Option<Arc<dyn DiagnosticSink>>,
}

impl DispatcherBuilder {
    /// Create a new builder with no URL configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the raw-events endpoint URL (required).
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the Seq API key sent as `X-Seq-ApiKey`.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    option_setter!(
        #[doc = "Set the bounded queue capacity."]
        with_capacity,
        capacity,
        usize
    );
    option_setter!(
        #[doc = "Set what `log` does when the queue is full."]
        with_overflow_policy,
        overflow_policy,
        OverflowPolicy
    );
    option_setter!(
        #[doc = "Set the connect timeout in milliseconds."]
        with_connect_timeout_ms,
        connect_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the per-request timeout in milliseconds."]
        with_request_timeout_ms,
        request_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set how long `close` and `Drop` wait for the queue to drain, in milliseconds."]
        with_flush_timeout_ms,
        flush_timeout_ms,
        u64
    );
    option_setter!(
        #[doc = "Set the interval between lost-entry summaries."]
        with_warn_interval,
        warn_interval,
        Duration
    );

    /// Let a single request wait indefinitely.
    pub fn without_request_timeout(mut self) -> Self {
        self.no_request_timeout = true;
        self
    }

    /// Accept self-signed or otherwise invalid TLS certificates.
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Report lost entries to `sink` instead of the `log` facade.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    fn validate(&self) -> Result<(), BuildError> {
        self.validate_url()?;
        self.validate_timeouts()?;
        Ok(())
    }

    fn validate_url(&self) -> Result<(), BuildError> {
        match &self.url {
            None => Err(BuildError::InvalidConfig(
                "dispatcher requires a destination URL".into(),
            )),
            Some(url) if url.trim().is_empty() => Err(BuildError::InvalidConfig(
                "URL must not be empty".into(),
            )),
            _ => Ok(()),
        }
    }

    fn validate_timeouts(&self) -> Result<(), BuildError> {
        if let Some(timeout) = self.connect_timeout_ms {
            ensure_positive!(timeout, "connect_timeout_ms")?;
        }
        if let Some(timeout) = self.request_timeout_ms {
            if self.no_request_timeout {
                return Err(BuildError::InvalidConfig(
                    "request_timeout_ms conflicts with without_request_timeout".into(),
                ));
            }
            ensure_positive!(timeout, "request_timeout_ms")?;
        }
        if let Some(timeout) = self.flush_timeout_ms {
            ensure_positive!(timeout, "flush_timeout_ms")?;
        }
        if let Some(OverflowPolicy::Timeout(timeout)) = self.overflow_policy
            && timeout.is_zero()
        {
            return Err(BuildError::InvalidConfig(
                "overflow timeout must be greater than zero".into(),
            ));
        }
        Ok(())
    }

    /// Validate and assemble the configuration without starting a worker.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::InvalidConfig`] when the URL is missing or a
    /// timeout is zero.
    pub fn build_config(&self) -> Result<DispatcherConfig, BuildError> {
        self.validate()?;

        let defaults = DispatcherConfig::default();
        let request_timeout = if self.no_request_timeout {
            None
        } else {
            self.request_timeout_ms
                .map_or(defaults.request_timeout, |ms| {
                    Some(Duration::from_millis(ms))
                })
        };
        Ok(DispatcherConfig {
            url: self.url.clone().unwrap_or_default(),
            api_key: self.api_key.clone(),
            capacity: self.capacity.unwrap_or(defaults.capacity),
            overflow_policy: self.overflow_policy.unwrap_or(defaults.overflow_policy),
            connect_timeout: self
                .connect_timeout_ms
                .map_or(defaults.connect_timeout, Duration::from_millis),
            request_timeout,
            flush_timeout: self
                .flush_timeout_ms
                .map_or(defaults.flush_timeout, Duration::from_millis),
            warn_interval: self.warn_interval.unwrap_or(defaults.warn_interval),
            accept_invalid_certs: self.accept_invalid_certs,
        })
    }

    /// Build the dispatcher and start its worker.
    ///
    /// # Errors
    ///
    /// See [`build_config`](Self::build_config).
    pub fn build(&self) -> Result<SeqDispatcher, BuildError> {
        let config = self.build_config()?;
        Ok(match &self.sink {
            Some(sink) => SeqDispatcher::with_sink(config, Arc::clone(sink)),
            None => SeqDispatcher::with_config(config),
        })
    }

    /// Build the dispatcher around a caller-supplied transport.
    ///
    /// # Errors
    ///
    /// See [`build_config`](Self::build_config).
    pub fn build_with_transport(
        &self,
        transport: Box<dyn EventTransport>,
    ) -> Result<SeqDispatcher, BuildError> {
        let config = self.build_config()?;
        let sink = self
            .sink
            .clone()
            .unwrap_or_else(|| Arc::new(crate::report::LogSink));
        Ok(SeqDispatcher::with_transport(config, sink, transport))
    }
}

impl std::fmt::Debug for DispatcherBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatcherBuilder")
            .field("url", &self.url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("capacity", &self.capacity)
            .field("overflow_policy", &self.overflow_policy)
            .field("connect_timeout_ms", &self.connect_timeout_ms)
            .field("request_timeout_ms", &self.request_timeout_ms)
            .field("flush_timeout_ms", &self.flush_timeout_ms)
            .finish_non_exhaustive()
    }
}
