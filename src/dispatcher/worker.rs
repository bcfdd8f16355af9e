//! Worker thread driving HTTP I/O.
//!
//! A single worker drains the queue in FIFO order and performs one send at a
//! time. Failures are reported through the diagnostics sink and never stop
//! the loop.

use std::{
    sync::Arc,
    thread,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, Sender, TryRecvError, TrySendError, bounded};
use log::warn;

use crate::{
    log_entry::LogEntry,
    rate_limited_warner::RateLimitedWarner,
    report::{DiagnosticSink, DispatchError, FailureReport},
};

use super::{
    config::{DispatcherConfig, OverflowPolicy},
    payload::serialise_payload,
    transport::{EventRequest, EventTransport, TransportResponse},
};

/// The only status Seq returns for an accepted event.
pub(crate) const HTTP_OK: u16 = 200;

/// Commands processed by the worker thread.
#[derive(Debug)]
pub enum Command {
    Entry(LogEntry),
    Flush(Sender<()>),
    Shutdown(Sender<()>),
}

/// Spawns the worker thread and returns the producer side of its queue.
pub(crate) fn spawn_worker(
    config: &DispatcherConfig,
    sink: Arc<dyn DiagnosticSink>,
    transport: Box<dyn EventTransport>,
) -> (Sender<Command>, thread::JoinHandle<()>) {
    let (tx, rx) = bounded(config.capacity);
    let worker = Worker {
        url: config.url.clone(),
        api_key: config.effective_api_key().map(str::to_owned),
        transport,
        sink,
        warner: RateLimitedWarner::new(config.warn_interval),
    };
    let handle = thread::spawn(move || worker.run(rx));
    (tx, handle)
}

struct Worker {
    url: String,
    api_key: Option<String>,
    transport: Box<dyn EventTransport>,
    sink: Arc<dyn DiagnosticSink>,
    warner: RateLimitedWarner,
}

impl Worker {
    fn handle_entry(&mut self, entry: LogEntry) {
        if let Err(err) = self.deliver(&entry) {
            self.report_failure(err, &entry);
        }
    }

    fn deliver(&mut self, entry: &LogEntry) -> Result<(), DispatchError> {
        let body = serialise_payload(entry)
            .map_err(|err| DispatchError::Serialization(err.to_string()))?;
        let request = EventRequest::new(&self.url, self.api_key.as_deref(), body);
        let response = self.transport.post(&request)?;
        check_status(response)
    }

    fn report_failure(&self, err: DispatchError, entry: &LogEntry) {
        self.sink.report(&FailureReport::new(err, entry));
        self.warner.record_drop();
        self.warner.warn_if_due(|count| {
            warn!("seqlog: {count} log entries were not delivered to Seq");
        });
    }

    fn handle_flush(&self, ack: Sender<()>) {
        self.warner.flush(|count| {
            warn!("seqlog: {count} log entries were not delivered to Seq");
        });
        let _ = ack.send(());
    }

    fn drain_pending(&mut self, rx: &Receiver<Command>) {
        loop {
            match rx.try_recv() {
                Ok(Command::Entry(entry)) => self.handle_entry(entry),
                Ok(Command::Flush(ack)) | Ok(Command::Shutdown(ack)) => self.handle_flush(ack),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn run(mut self, rx: Receiver<Command>) {
        loop {
            match rx.recv() {
                Ok(Command::Entry(entry)) => self.handle_entry(entry),
                Ok(Command::Flush(ack)) => self.handle_flush(ack),
                Ok(Command::Shutdown(ack)) => {
                    self.drain_pending(&rx);
                    self.handle_flush(ack);
                    break;
                }
                Err(_) => {
                    self.drain_pending(&rx);
                    break;
                }
            }
        }
    }
}

/// Anything but 200 OK means the event was not accepted.
pub(crate) fn check_status(response: TransportResponse) -> Result<(), DispatchError> {
    if response.status == HTTP_OK {
        Ok(())
    } else {
        Err(DispatchError::RemoteRejection {
            status: response.status,
            body: response.body,
        })
    }
}

/// Enqueues an entry according to `policy`.
///
/// # Errors
///
/// Returns a report for the rejected entry when the queue is full
/// ([`DispatchError::QueueFull`], non-blocking policies only) or the worker
/// has gone away ([`DispatchError::Closed`]).
pub(crate) fn enqueue_entry(
    tx: &Sender<Command>,
    entry: LogEntry,
    policy: OverflowPolicy,
) -> Result<(), FailureReport> {
    let command = Command::Entry(entry);
    match policy {
        OverflowPolicy::Block => tx
            .send(command)
            .map_err(|err| rejection(DispatchError::Closed, err.into_inner())),
        OverflowPolicy::Drop => tx.try_send(command).map_err(|err| match err {
            TrySendError::Full(cmd) => rejection(DispatchError::QueueFull, cmd),
            TrySendError::Disconnected(cmd) => rejection(DispatchError::Closed, cmd),
        }),
        OverflowPolicy::Timeout(timeout) => {
            tx.send_timeout(command, timeout).map_err(|err| {
                let error = if err.is_timeout() {
                    DispatchError::QueueFull
                } else {
                    DispatchError::Closed
                };
                rejection(error, err.into_inner())
            })
        }
    }
}

fn rejection(error: DispatchError, command: Command) -> FailureReport {
    match command {
        Command::Entry(entry) => FailureReport::new(error, &entry),
        Command::Flush(_) | Command::Shutdown(_) => FailureReport {
            error,
            level: String::new(),
            message_template: String::new(),
        },
    }
}

/// Sends a flush marker and waits for the worker to reach it.
///
/// The deadline covers both sending the marker and receiving the
/// acknowledgement. Returns `true` when every entry queued before the marker
/// has been attempted within `timeout`.
pub(crate) fn flush_queue(tx: &Sender<Command>, timeout: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    let (ack_tx, ack_rx) = bounded(1);
    if tx.send_timeout(Command::Flush(ack_tx), timeout).is_err() {
        return false;
    }
    let remaining = deadline.saturating_duration_since(Instant::now());
    ack_rx.recv_timeout(remaining).is_ok()
}
