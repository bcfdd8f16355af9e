//! Sends two events to a local Seq instance.
//!
//! ```sh
//! SEQ_URL=http://localhost:5341/api/events/raw SEQ_API_KEY=... \
//!     cargo run --example send_events
//! ```

use seqlog::SeqDispatcher;
use serde_json::json;

fn main() {
    let url = std::env::var("SEQ_URL")
        .unwrap_or_else(|_| "http://localhost:5341/api/events/raw".to_owned());
    let api_key = std::env::var("SEQ_API_KEY").unwrap_or_default();

    let seq = SeqDispatcher::new(&url, &api_key, 100);
    seq.log(
        "Information",
        "Application started",
        json!({"version": "1.0.0"}).as_object().cloned(),
    );
    seq.log(
        "Error",
        "An error occurred",
        json!({
            "error": "example error message",
            "userID": "12345",
            "operation": "data processing",
            "duration": "120ms",
            "severity": "high",
            "details": {"module": "user-service", "method": "POST"},
        })
        .as_object()
        .cloned(),
    );

    if !seq.close() {
        eprintln!("some events were still queued when the dispatcher shut down");
    }
}
