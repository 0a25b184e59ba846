//! Request builder.
//!
//! # Design
//! A `RequestBuilder` collects per-call arguments and resolves them against a
//! borrowed [`ClientConfig`] when finished. The finisher picks the body
//! encoding and forces the matching `Content-Type`:
//!
//! | finisher  | body when no explicit `body`         | content type                        |
//! |-----------|--------------------------------------|-------------------------------------|
//! | [`form`]  | `data` passed through as text        | `application/x-www-form-urlencoded` |
//! | [`json`]  | `data` serialized to a JSON string   | `application/json`                  |
//! | [`text`]  | `data` passed through as text        | `text/plain`                        |
//!
//! There is no form encoder: callers that need `a=1&b=2` supply it
//! pre-encoded. An explicit `body` always wins over `data`.
//!
//! [`form`]: RequestBuilder::form
//! [`json`]: RequestBuilder::json
//! [`text`]: RequestBuilder::text

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

use crate::config::{ClientConfig, DEFAULT_TIMEOUT};
use crate::error::ClientError;
use crate::http::{Headers, HttpMethod, HttpRequest};
use crate::transport::Transport;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const TEXT_CONTENT_TYPE: &str = "text/plain";

/// Data handed to the builder in place of a ready-made body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Text(String),
    Json(Value),
}

impl Payload {
    /// Convert any serializable value into a JSON payload.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, ClientError> {
        Ok(Payload::Json(serde_json::to_value(value)?))
    }

    /// The payload as-is. JSON strings yield their contents, other JSON
    /// values their compact text.
    fn into_raw(self) -> String {
        match self {
            Payload::Text(text) | Payload::Json(Value::String(text)) => text,
            Payload::Json(value) => value.to_string(),
        }
    }

    fn into_json(self) -> String {
        match self {
            Payload::Text(text) => Value::String(text).to_string(),
            Payload::Json(value) => value.to_string(),
        }
    }
}

impl From<String> for Payload {
    fn from(text: String) -> Self {
        Payload::Text(text)
    }
}

impl From<&str> for Payload {
    fn from(text: &str) -> Self {
        Payload::Text(text.to_string())
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Payload::Json(value)
    }
}

/// Collects the arguments of one request.
#[derive(Clone)]
pub struct RequestBuilder<'a> {
    config: &'a ClientConfig,
    title: String,
    url: String,
    method: Option<HttpMethod>,
    headers: Headers,
    body: Option<String>,
    data: Option<Payload>,
    open_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    driver: Option<Arc<dyn Transport>>,
}

impl<'a> RequestBuilder<'a> {
    pub fn new(config: &'a ClientConfig, title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            config,
            title: title.into(),
            url: url.into(),
            method: None,
            headers: Headers::new(),
            body: None,
            data: None,
            open_timeout: None,
            read_timeout: None,
            driver: None,
        }
    }

    pub fn method(mut self, method: HttpMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Ready-made request body. Takes precedence over [`data`](Self::data).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn data(mut self, data: impl Into<Payload>) -> Self {
        self.data = Some(data.into());
        self
    }

    pub fn open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = Some(timeout);
        self
    }

    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = Some(timeout);
        self
    }

    pub fn driver(mut self, driver: Arc<dyn Transport>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Finish as a form request.
    pub fn form(mut self) -> HttpRequest {
        let body = self.body.take().or_else(|| self.data.take().map(Payload::into_raw));
        self.finish(FORM_CONTENT_TYPE, body)
    }

    /// Finish as a JSON request.
    pub fn json(mut self) -> HttpRequest {
        let body = self.body.take().or_else(|| self.data.take().map(Payload::into_json));
        self.finish(JSON_CONTENT_TYPE, body)
    }

    /// Finish as a plain-text request.
    pub fn text(mut self) -> HttpRequest {
        let body = self.body.take().or_else(|| self.data.take().map(Payload::into_raw));
        self.finish(TEXT_CONTENT_TYPE, body)
    }

    fn finish(self, content_type: &str, body: Option<String>) -> HttpRequest {
        let mut headers = self.headers;
        headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
        headers.insert(CONTENT_TYPE.to_string(), content_type.to_string());

        HttpRequest {
            title: self.title,
            url: self.url,
            method: self.method.unwrap_or(self.config.method()),
            headers,
            body,
            open_timeout: self
                .open_timeout
                .or(self.config.open_timeout())
                .unwrap_or(DEFAULT_TIMEOUT),
            read_timeout: self
                .read_timeout
                .or(self.config.read_timeout())
                .unwrap_or(DEFAULT_TIMEOUT),
            driver: self.driver.unwrap_or_else(|| Arc::clone(self.config.driver())),
        }
    }
}
