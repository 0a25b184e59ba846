//! Error types for the client.
//!
//! # Design
//! Strict calls produce two error kinds of their own, `Diagnostic` for a
//! failing status and `Timeout` for a driver timeout. Both keep the full
//! request (and response) so an error reporter can describe the failed call
//! without re-running it. [`ErrorContext`] is the stable, serializable shape
//! of that description:
//!
//! ```text
//! {title, client_request: {url, method, headers, body},
//!         client_response: {code, headers, body}}
//! ```
//!
//! `client_response` is absent for timeouts. Other driver failures pass
//! through unchanged as `Transport`.

use serde::Serialize;
use thiserror::Error;

use crate::http::{Headers, HttpMethod, HttpRequest, HttpResponse};
use crate::json::ParsedBody;
use crate::transport::TransportError;

/// Errors returned by [`Client`](crate::Client) strict calls and payload
/// conversion.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Diagnostic(Box<DiagnosticError>),

    #[error(transparent)]
    Timeout(Box<TimeoutError>),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("payload serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Diagnostic context for strict-call errors; `None` for the rest.
    pub fn context(&self) -> Option<ErrorContext> {
        match self {
            ClientError::Diagnostic(err) => Some(err.context()),
            ClientError::Timeout(err) => Some(err.context()),
            ClientError::Transport(_) | ClientError::Serialization(_) => None,
        }
    }

    /// [`context`](Self::context) rendered as JSON.
    pub fn metadata(&self) -> Option<serde_json::Value> {
        self.context().and_then(|ctx| serde_json::to_value(ctx).ok())
    }

    pub fn title(&self) -> Option<&str> {
        match self {
            ClientError::Diagnostic(err) => Some(err.title()),
            ClientError::Timeout(err) => Some(err.title()),
            ClientError::Transport(_) | ClientError::Serialization(_) => None,
        }
    }
}

/// A strict call received a failing status that was not skipped.
#[derive(Debug, Error)]
#[error("{}: {} {} returned {}", .request.title(), .request.method(), .request.url(), .response.status)]
pub struct DiagnosticError {
    pub request: HttpRequest,
    pub response: HttpResponse,
}

impl DiagnosticError {
    pub fn title(&self) -> &str {
        self.request.title()
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext {
            title: self.title().to_string(),
            client_request: RequestReport::from(&self.request),
            client_response: Some(ResponseReport::from(&self.response)),
        }
    }
}

impl From<DiagnosticError> for ClientError {
    fn from(err: DiagnosticError) -> Self {
        ClientError::Diagnostic(Box::new(err))
    }
}

/// A strict call's driver timed out and timeouts were not skipped.
#[derive(Debug, Error)]
#[error("{}: {} {} timed out: {reason}", .request.title(), .request.method(), .request.url())]
pub struct TimeoutError {
    pub request: HttpRequest,
    pub reason: String,
}

impl TimeoutError {
    pub fn title(&self) -> &str {
        self.request.title()
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext {
            title: self.title().to_string(),
            client_request: RequestReport::from(&self.request),
            client_response: None,
        }
    }
}

impl From<TimeoutError> for ClientError {
    fn from(err: TimeoutError) -> Self {
        ClientError::Timeout(Box::new(err))
    }
}

/// Metadata attached to strict-call errors for error reporters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorContext {
    pub title: String,
    pub client_request: RequestReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_response: Option<ResponseReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestReport {
    pub url: String,
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<ParsedBody>,
}

impl From<&HttpRequest> for RequestReport {
    fn from(request: &HttpRequest) -> Self {
        Self {
            url: request.url().to_string(),
            method: request.method(),
            headers: request.headers().clone(),
            body: request.body().map(ParsedBody::parse),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseReport {
    pub code: u16,
    pub headers: Headers,
    pub body: ParsedBody,
}

impl From<&HttpResponse> for ResponseReport {
    fn from(response: &HttpResponse) -> Self {
        Self {
            code: response.status,
            headers: response.headers.clone(),
            body: ParsedBody::parse(&response.body),
        }
    }
}
