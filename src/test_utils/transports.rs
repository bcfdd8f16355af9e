//! In-memory transports for exercising the worker loop.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, bounded, unbounded};
use parking_lot::Mutex;

use crate::dispatcher::{EventRequest, EventTransport, TransportResponse};
use crate::report::DispatchError;

type Outcome = Result<TransportResponse, DispatchError>;

/// Records every request and answers from a script, then with 200 OK.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<EventRequest>>>,
    script: Arc<Mutex<VecDeque<Outcome>>>,
    delay: Option<Duration>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer the next requests with `outcomes`, in order.
    pub fn with_script(outcomes: Vec<Outcome>) -> Self {
        Self {
            script: Arc::new(Mutex::new(outcomes.into())),
            ..Self::default()
        }
    }

    /// Sleep for `delay` before answering each request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<EventRequest> {
        self.requests.lock().clone()
    }

    /// The `MessageTemplate` of every request body, in send order.
    pub fn messages(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .map(|req| {
                let body: serde_json::Value =
                    serde_json::from_str(&req.body).expect("request body is JSON");
                body["Events"][0]["MessageTemplate"]
                    .as_str()
                    .expect("message template")
                    .to_owned()
            })
            .collect()
    }

    pub fn boxed(&self) -> Box<dyn EventTransport> {
        Box::new(self.clone())
    }
}

impl EventTransport for RecordingTransport {
    fn post(&mut self, request: &EventRequest) -> Outcome {
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        self.requests.lock().push(request.clone());
        self.script.lock().pop_front().unwrap_or(Ok(ok()))
    }
}

/// A 200 OK response with an empty body.
pub fn ok() -> TransportResponse {
    TransportResponse {
        status: 200,
        body: String::new(),
    }
}

/// Transport that blocks every request until the test opens the gate.
///
/// `started` receives the message template of each request as soon as the
/// worker enters `post`, so tests know when an entry has left the queue.
pub struct GatedTransport {
    inner: RecordingTransport,
    gate: Receiver<()>,
    started: Sender<String>,
}

/// Test-side controls for a [`GatedTransport`].
pub struct Gate {
    open: Sender<()>,
    pub started: Receiver<String>,
}

impl Gate {
    /// Let one blocked request complete.
    pub fn release_one(&self) {
        self.open.send(()).expect("gated transport alive");
    }

    /// Let `n` requests complete.
    pub fn release(&self, n: usize) {
        for _ in 0..n {
            self.release_one();
        }
    }
}

impl GatedTransport {
    pub fn new(inner: RecordingTransport) -> (Box<dyn EventTransport>, Gate) {
        let (open, gate) = unbounded();
        let (started_tx, started) = bounded(64);
        let transport = Self {
            inner,
            gate,
            started: started_tx,
        };
        (Box::new(transport), Gate { open, started })
    }
}

impl EventTransport for GatedTransport {
    fn post(&mut self, request: &EventRequest) -> Outcome {
        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap_or_default();
        let message = body["Events"][0]["MessageTemplate"]
            .as_str()
            .unwrap_or_default()
            .to_owned();
        let _ = self.started.send(message);
        if self.gate.recv().is_err() {
            return Err(DispatchError::Transport("gate dropped".into()));
        }
        self.inner.post(request)
    }
}
