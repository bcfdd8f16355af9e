//! A sink that accumulates failure reports in memory for test assertions.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::report::{DiagnosticSink, DispatchError, FailureReport};

/// Sink that stores every report it receives for later inspection.
#[derive(Clone, Default)]
pub struct CollectingSink {
    reports: Arc<Mutex<Vec<FailureReport>>>,
}

impl CollectingSink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a snapshot of all reports received so far.
    pub fn reports(&self) -> Vec<FailureReport> {
        self.reports.lock().clone()
    }

    /// Return just the errors, in arrival order.
    pub fn errors(&self) -> Vec<DispatchError> {
        self.reports.lock().iter().map(|r| r.error.clone()).collect()
    }

    /// Share this sink with a dispatcher.
    pub fn shared(&self) -> Arc<dyn DiagnosticSink> {
        Arc::new(self.clone())
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, report: &FailureReport) {
        self.reports.lock().push(report.clone());
    }
}
