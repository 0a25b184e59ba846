//! Client: request building and dispatch.
//!
//! # Design
//! `Client` pairs an immutable [`ClientConfig`] with an [`ErrorHandler`] and
//! carries no other state, so one instance can be shared across threads.
//! Every verb comes in two flavors:
//!
//! - soft (`get`, `post`, ...): returns the driver's response whatever its
//!   status; driver failures come back as [`TransportError`].
//! - strict (`get_strict`, `post_strict`, ...): runs the soft call, then lets
//!   the handler turn failing statuses and timeouts into [`ClientError`]s.
//!
//! The verb is applied with [`HttpRequest::with_method`] right before the
//! request is handed to its driver.

use tracing::debug;

use crate::builder::RequestBuilder;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::handler::ErrorHandler;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::transport::TransportError;

/// Synchronous HTTP client with soft and strict calls.
#[derive(Debug, Clone, Default)]
pub struct Client {
    config: ClientConfig,
    handler: ErrorHandler,
}

impl Client {
    pub fn new(config: ClientConfig, handler: ErrorHandler) -> Self {
        Self { config, handler }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn handler(&self) -> &ErrorHandler {
        &self.handler
    }

    /// Start building a request against this client's defaults.
    pub fn request(&self, title: impl Into<String>, url: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config, title, url)
    }

    /// Soft call with an explicit verb.
    pub fn send(&self, request: HttpRequest, method: HttpMethod) -> Result<HttpResponse, TransportError> {
        let (_, outcome) = self.dispatch(request, method);
        outcome
    }

    /// Strict call with an explicit verb.
    ///
    /// `Ok(None)` means the driver timed out and timeouts are skipped.
    pub fn send_strict(
        &self,
        request: HttpRequest,
        method: HttpMethod,
    ) -> Result<Option<HttpResponse>, ClientError> {
        let (request, outcome) = self.dispatch(request, method);
        self.handler.handle(request, outcome)
    }

    pub fn get(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, HttpMethod::Get)
    }

    pub fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, HttpMethod::Post)
    }

    pub fn put(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, HttpMethod::Put)
    }

    pub fn patch(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, HttpMethod::Patch)
    }

    pub fn delete(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.send(request, HttpMethod::Delete)
    }

    pub fn get_strict(&self, request: HttpRequest) -> Result<Option<HttpResponse>, ClientError> {
        self.send_strict(request, HttpMethod::Get)
    }

    pub fn post_strict(&self, request: HttpRequest) -> Result<Option<HttpResponse>, ClientError> {
        self.send_strict(request, HttpMethod::Post)
    }

    pub fn put_strict(&self, request: HttpRequest) -> Result<Option<HttpResponse>, ClientError> {
        self.send_strict(request, HttpMethod::Put)
    }

    pub fn patch_strict(&self, request: HttpRequest) -> Result<Option<HttpResponse>, ClientError> {
        self.send_strict(request, HttpMethod::Patch)
    }

    pub fn delete_strict(&self, request: HttpRequest) -> Result<Option<HttpResponse>, ClientError> {
        self.send_strict(request, HttpMethod::Delete)
    }

    fn dispatch(
        &self,
        request: HttpRequest,
        method: HttpMethod,
    ) -> (HttpRequest, Result<HttpResponse, TransportError>) {
        let request = request.with_method(method);
        debug!(
            title = request.title(),
            method = %method,
            url = request.url(),
            driver = request.driver().name(),
            "dispatching request"
        );
        let outcome = request.driver().execute(&request);
        match &outcome {
            Ok(response) => debug!(title = request.title(), status = response.status, "request completed"),
            Err(err) => debug!(title = request.title(), error = %err, "request failed in transport"),
        }
        (request, outcome)
    }
}
