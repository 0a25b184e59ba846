//! Transport drivers.
//!
//! # Design
//! A driver is the only component that touches the network. It receives a
//! finished [`HttpRequest`] and hands back an [`HttpResponse`] for every status
//! code, 4xx and 5xx included. Interpreting the status is the caller's job.
//! The one failure a driver must classify is a timeout, reported as
//! [`TransportError::Timeout`] so strict calls can translate it.

use std::io;
use std::time::Duration;

use thiserror::Error;
use tracing::trace;
use ureq::http;

use crate::http::{Headers, HttpRequest, HttpResponse};

/// Failures raised by a driver before a complete response was received.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TransportError::Timeout(_))
    }
}

/// Executes requests against the network.
///
/// Implementations must be safe to share between threads; one driver instance
/// is referenced by every request built from the same client configuration.
pub trait Transport: Send + Sync {
    /// Short identifier used in logs and `Debug` output.
    fn name(&self) -> &'static str;

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking driver backed by `ureq`.
///
/// Builds a fresh agent per call so the request's own open and read timeouts
/// apply. Redirects are followed with ureq's defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn name(&self) -> &'static str {
        "ureq"
    }

    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeouts = AgentTimeouts::for_request(request);
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_connect(Some(timeouts.connect))
            .timeout_recv_response(Some(timeouts.recv_response))
            .timeout_recv_body(Some(timeouts.recv_body))
            .build()
            .new_agent();

        let mut builder = http::Request::builder()
            .method(request.method().as_str())
            .uri(request.url());
        for (name, value) in request.headers() {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let result = match request.body() {
            Some(body) => builder
                .body(body)
                .map_err(|e| TransportError::Other(e.to_string()))
                .and_then(|req| agent.run(req).map_err(from_ureq)),
            None => builder
                .body(())
                .map_err(|e| TransportError::Other(e.to_string()))
                .and_then(|req| agent.run(req).map_err(from_ureq)),
        };
        let mut response = result?;

        let status = response.status();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        // Read without ureq's default 10 MiB body limit.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_string()
            .map_err(from_ureq)?;
        trace!(status = status.as_u16(), bytes = body.len(), "ureq response read");

        Ok(HttpResponse {
            status: status.as_u16(),
            headers,
            body,
            message: status.canonical_reason().unwrap_or_default().to_string(),
        })
    }
}

/// Per-call agent timeouts derived from a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AgentTimeouts {
    connect: Duration,
    recv_response: Duration,
    recv_body: Duration,
}

impl AgentTimeouts {
    fn for_request(request: &HttpRequest) -> Self {
        Self {
            connect: request.open_timeout(),
            recv_response: request.read_timeout(),
            recv_body: request.read_timeout(),
        }
    }
}

fn from_ureq(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(kind) => TransportError::Timeout(kind.to_string()),
        ureq::Error::Io(e) if e.kind() == io::ErrorKind::TimedOut => {
            TransportError::Timeout(e.to_string())
        }
        ureq::Error::Io(e) if is_connection_refusal(e.kind()) => {
            TransportError::Connection(e.to_string())
        }
        ureq::Error::ConnectionFailed | ureq::Error::HostNotFound => {
            TransportError::Connection(err.to_string())
        }
        other => TransportError::Other(other.to_string()),
    }
}

fn is_connection_refusal(kind: io::ErrorKind) -> bool {
    matches!(
        kind,
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
    )
}
