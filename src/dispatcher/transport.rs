//! HTTP transport used by the dispatcher worker.
//!
//! The worker builds an [`EventRequest`] per entry and hands it to an
//! [`EventTransport`]. [`UreqTransport`] is the production implementation;
//! tests substitute their own to simulate slow or failing networks.

use std::sync::Arc;

use log::warn;
use native_tls::TlsConnector;
use ureq::{Agent, AgentBuilder, ErrorKind};

use crate::report::DispatchError;

use super::config::DispatcherConfig;

/// Content type of every raw-events request.
pub const CONTENT_TYPE_JSON: &str = "application/json";
/// Header carrying the Seq API key.
pub const API_KEY_HEADER: &str = "X-Seq-ApiKey";

/// A POST request ready to be sent.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EventRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: String,
}

impl EventRequest {
    /// Build a raw-events request, adding the API key header when `api_key`
    /// is present.
    pub fn new(url: &str, api_key: Option<&str>, body: String) -> Self {
        let mut headers = vec![("Content-Type", CONTENT_TYPE_JSON.to_owned())];
        if let Some(key) = api_key {
            headers.push((API_KEY_HEADER, key.to_owned()));
        }
        Self {
            url: url.to_owned(),
            headers,
            body,
        }
    }

    /// Look up a header value by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and fully-read body of a response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns the server's answer.
///
/// Any HTTP status counts as a response; only failures to build or send the
/// request are errors. Implementations must consume the response body
/// before returning so no connection state leaks into the next request.
pub trait EventTransport: Send {
    fn post(&mut self, request: &EventRequest) -> Result<TransportResponse, DispatchError>;
}

/// Transport backed by a pooled `ureq` agent.
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new(config: &DispatcherConfig) -> Self {
        let mut builder = AgentBuilder::new().timeout_connect(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        if config.accept_invalid_certs {
            match insecure_connector() {
                Ok(connector) => builder = builder.tls_connector(Arc::new(connector)),
                Err(err) => warn!("seqlog: failed to build TLS connector, using defaults: {err}"),
            }
        }
        Self {
            agent: builder.build(),
        }
    }

    fn send(&self, request: &EventRequest) -> Result<ureq::Response, Box<ureq::Error>> {
        let mut req = self.agent.post(&request.url);
        for (name, value) in &request.headers {
            req = req.set(name, value);
        }
        req.send_string(&request.body).map_err(Box::new)
    }
}

impl EventTransport for UreqTransport {
    fn post(&mut self, request: &EventRequest) -> Result<TransportResponse, DispatchError> {
        match self.send(request) {
            Ok(response) => Ok(read_response(response)),
            Err(err) => match *err {
                ureq::Error::Status(_, response) => Ok(read_response(response)),
                ureq::Error::Transport(transport) => Err(classify_transport(&transport)),
            },
        }
    }
}

impl std::fmt::Debug for UreqTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UreqTransport").finish_non_exhaustive()
    }
}

fn insecure_connector() -> Result<TlsConnector, native_tls::Error> {
    TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
}

/// Read the body to the end so the agent can reuse the connection.
fn read_response(response: ureq::Response) -> TransportResponse {
    let status = response.status();
    let body = response
        .into_string()
        .unwrap_or_else(|err| format!("<unreadable response body: {err}>"));
    TransportResponse { status, body }
}

/// Separate requests that could never be built from network failures.
fn classify_transport(err: &ureq::Transport) -> DispatchError {
    match err.kind() {
        ErrorKind::InvalidUrl | ErrorKind::UnknownScheme | ErrorKind::BadHeader => {
            DispatchError::RequestConstruction(err.to_string())
        }
        _ => DispatchError::Transport(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;
    use std::time::Duration;

    fn config() -> DispatcherConfig {
        DispatcherConfig {
            connect_timeout: Duration::from_secs(1),
            request_timeout: Some(Duration::from_secs(1)),
            ..DispatcherConfig::default()
        }
    }

    #[test]
    fn request_carries_json_content_type() {
        let request = EventRequest::new("http://seq/api/events/raw", None, "{}".into());
        assert_eq!(request.header("content-type"), Some(CONTENT_TYPE_JSON));
        assert_eq!(request.header(API_KEY_HEADER), None);
    }

    #[test]
    fn request_carries_api_key_when_present() {
        let request = EventRequest::new("http://seq/api/events/raw", Some("k3y"), "{}".into());
        assert_eq!(request.header("x-seq-apikey"), Some("k3y"));
    }

    #[test]
    fn invalid_url_is_a_construction_error() {
        let mut transport = UreqTransport::new(&config());
        let request = EventRequest::new("not a url", None, "{}".into());
        let err = transport.post(&request).expect_err("invalid url");
        assert!(matches!(err, DispatchError::RequestConstruction(_)), "{err:?}");
    }

    #[test]
    fn refused_connection_is_a_transport_error() {
        let addr = {
            let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
            listener.local_addr().expect("addr")
        };
        let mut transport = UreqTransport::new(&config());
        let request = EventRequest::new(&format!("http://{addr}/api/events/raw"), None, "{}".into());
        let err = transport.post(&request).expect_err("nothing listening");
        assert!(matches!(err, DispatchError::Transport(_)), "{err:?}");
    }
}
