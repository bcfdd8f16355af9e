//! Public dispatcher type exported by the crate.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::Sender;
use log::warn;
use parking_lot::Mutex;

use crate::{
    level::SeqLevel,
    log_entry::{Fields, LogEntry},
    report::{DiagnosticSink, DispatchError, FailureReport, LogSink},
    validation::validate,
};

use super::{
    config::{DispatcherConfig, OverflowPolicy},
    transport::{EventTransport, UreqTransport},
    worker::{Command, enqueue_entry, flush_queue, spawn_worker},
};

/// Forwards log entries to a Seq raw-events endpoint from a background
/// worker thread.
///
/// `log` validates and enqueues; the worker serialises and POSTs entries one
/// at a time in FIFO order. Nothing is ever returned to the producer: lost
/// entries are handed to the configured [`DiagnosticSink`].
///
/// Dropping the dispatcher closes it, waiting up to the configured flush
/// timeout for queued entries to be sent.
pub struct SeqDispatcher {
    tx: Mutex<Option<Sender<Command>>>,
    handle: Mutex<Option<thread::JoinHandle<()>>>,
    sink: Arc<dyn DiagnosticSink>,
    overflow_policy: OverflowPolicy,
    flush_timeout: Duration,
}

impl SeqDispatcher {
    /// Start a dispatcher for `destination_url` with default settings.
    ///
    /// An empty `api_key` disables the `X-Seq-ApiKey` header.
    pub fn new(destination_url: &str, api_key: &str, queue_capacity: usize) -> Self {
        Self::with_config(DispatcherConfig {
            url: destination_url.to_owned(),
            api_key: Some(api_key.to_owned()),
            capacity: queue_capacity,
            ..DispatcherConfig::default()
        })
    }

    /// Start a dispatcher reporting failures through [`LogSink`].
    pub fn with_config(config: DispatcherConfig) -> Self {
        Self::with_sink(config, Arc::new(LogSink))
    }

    /// Start a dispatcher reporting failures through `sink`.
    pub fn with_sink(config: DispatcherConfig, sink: Arc<dyn DiagnosticSink>) -> Self {
        let transport = UreqTransport::new(&config);
        Self::with_transport(config, sink, Box::new(transport))
    }

    /// Start a dispatcher sending through a caller-supplied transport.
    pub fn with_transport(
        config: DispatcherConfig,
        sink: Arc<dyn DiagnosticSink>,
        transport: Box<dyn EventTransport>,
    ) -> Self {
        let (tx, handle) = spawn_worker(&config, Arc::clone(&sink), transport);
        Self {
            tx: Mutex::new(Some(tx)),
            handle: Mutex::new(Some(handle)),
            sink,
            overflow_policy: config.overflow_policy,
            flush_timeout: config.flush_timeout,
        }
    }

    /// Queue an event for delivery.
    ///
    /// The entry is stamped with the current UTC time and validated. Invalid
    /// entries are reported and dropped. Under [`OverflowPolicy::Block`] this
    /// blocks while the queue is full.
    pub fn log(&self, level: &str, message: &str, fields: Option<Fields>) {
        let entry = LogEntry::new(level, message, fields);
        if let Err(err) = validate(&entry) {
            self.sink.report(&FailureReport::new(err.into(), &entry));
            return;
        }
        let Some(tx) = self.sender() else {
            self.sink
                .report(&FailureReport::new(DispatchError::Closed, &entry));
            return;
        };
        if let Err(report) = enqueue_entry(&tx, entry, self.overflow_policy) {
            self.sink.report(&report);
        }
    }

    /// Queue an event at a [`SeqLevel`].
    pub fn log_at(&self, level: SeqLevel, message: &str, fields: Option<Fields>) {
        self.log(level.as_str(), message, fields);
    }

    pub fn verbose(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Verbose, message, fields);
    }

    pub fn debug(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Debug, message, fields);
    }

    pub fn information(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Information, message, fields);
    }

    pub fn warning(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Warning, message, fields);
    }

    pub fn error(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Error, message, fields);
    }

    pub fn fatal(&self, message: &str, fields: Option<Fields>) {
        self.log_at(SeqLevel::Fatal, message, fields);
    }

    /// Wait until every entry queued so far has been attempted.
    ///
    /// Returns `false` if the dispatcher is closed or `timeout` elapses
    /// first. Entries keep being accepted while a flush is pending.
    pub fn flush(&self, timeout: Duration) -> bool {
        let Some(tx) = self.sender() else {
            return false;
        };
        flush_queue(&tx, timeout)
    }

    /// Stop accepting entries and drain the queue, waiting up to the
    /// configured flush timeout.
    pub fn close(&self) -> bool {
        self.close_with_timeout(self.flush_timeout)
    }

    /// Stop accepting entries and drain the queue, waiting up to `timeout`.
    ///
    /// Returns `true` when the worker sent every queued entry and exited in
    /// time. On timeout the worker is detached and keeps draining in the
    /// background. Closing twice is a no-op returning `true`.
    pub fn close_with_timeout(&self, timeout: Duration) -> bool {
        let Some(tx) = self.tx.lock().take() else {
            return true;
        };
        let deadline = Instant::now() + timeout;
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        let acked = match tx.send_timeout(Command::Shutdown(ack_tx), timeout) {
            Ok(()) => ack_rx.recv_deadline(deadline).is_ok(),
            Err(_) => false,
        };
        drop(tx);
        if acked {
            self.join_worker();
        } else {
            warn!("seqlog: worker did not drain the queue within {timeout:?}; detaching");
            self.handle.lock().take();
        }
        acked
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.tx.lock().is_none()
    }

    fn sender(&self) -> Option<Sender<Command>> {
        self.tx.lock().clone()
    }

    fn join_worker(&self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };
        if handle.join().is_err() {
            warn!("seqlog: worker thread panicked");
        }
    }
}

impl Drop for SeqDispatcher {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for SeqDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeqDispatcher")
            .field("overflow_policy", &self.overflow_policy)
            .field("flush_timeout", &self.flush_timeout)
            .field("closed", &self.is_closed())
            .finish()
    }
}
