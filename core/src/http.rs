//! HTTP request and response values.
//!
//! # Design
//! `HttpRequest` is produced only by [`RequestBuilder`](crate::RequestBuilder)
//! and is immutable afterwards: its fields are private and the one change the
//! dispatcher needs, applying the call's verb, goes through
//! [`HttpRequest::with_method`], which consumes the value and returns a new one.
//! `HttpResponse` is plain data filled in by a transport driver.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::transport::Transport;

/// Header map with case-sensitive keys, iterated in key order.
pub type Headers = BTreeMap<String, String>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully-populated outbound request.
///
/// Carries the human-readable `title` used in diagnostics and the driver that
/// will execute it, so a request can be dispatched without any other context.
#[derive(Clone)]
pub struct HttpRequest {
    pub(crate) title: String,
    pub(crate) url: String,
    pub(crate) method: HttpMethod,
    pub(crate) headers: Headers,
    pub(crate) body: Option<String>,
    pub(crate) open_timeout: Duration,
    pub(crate) read_timeout: Duration,
    pub(crate) driver: Arc<dyn Transport>,
}

impl HttpRequest {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    /// Time allowed for establishing the connection.
    pub fn open_timeout(&self) -> Duration {
        self.open_timeout
    }

    /// Time allowed for receiving the response once connected.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn driver(&self) -> &Arc<dyn Transport> {
        &self.driver
    }

    /// Return the same request with `method` replaced.
    pub fn with_method(self, method: HttpMethod) -> Self {
        Self { method, ..self }
    }
}

impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpRequest")
            .field("title", &self.title)
            .field("url", &self.url)
            .field("method", &self.method)
            .field("headers", &self.headers)
            .field("body", &self.body)
            .field("open_timeout", &self.open_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("driver", &self.driver.name())
            .finish()
    }
}

/// An HTTP response described as plain data.
///
/// Returned by a [`Transport`] driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
    /// Canonical reason phrase for `status` (not the server's own wording);
    /// empty for unregistered codes.
    pub message: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
