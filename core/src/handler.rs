//! Strict-call error handling.
//!
//! # Design
//! An `ErrorHandler` turns the outcome of a dispatched request into the
//! result of a strict call. Each failure category is checked against its own
//! kind of [`Skip`] entry: driver timeouts against [`Skip::Timeout`], failing
//! statuses against [`Skip::Status`]. A skipped failure degrades to a normal
//! return. Driver failures other than timeouts are never skippable.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::error::{ClientError, DiagnosticError, TimeoutError};
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::TransportError;

/// One suppressed error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Skip {
    Status(u16),
    Timeout,
}

impl From<u16> for Skip {
    fn from(code: u16) -> Self {
        Skip::Status(code)
    }
}

impl fmt::Display for Skip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Skip::Status(code) => write!(f, "{code}"),
            Skip::Timeout => f.write_str("timeout"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid skip entry {0:?}: expected a status code or \"timeout\"")]
pub struct ParseSkipError(String);

impl FromStr for Skip {
    type Err = ParseSkipError;

    /// Accepts `"timeout"` or a status code such as `"404"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("timeout") {
            return Ok(Skip::Timeout);
        }
        match s.parse::<u16>() {
            Ok(code) if (100..=599).contains(&code) => Ok(Skip::Status(code)),
            _ => Err(ParseSkipError(s.to_string())),
        }
    }
}

/// The error kinds a handler suppresses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipList(HashSet<Skip>);

impl SkipList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skips_status(&self, code: u16) -> bool {
        self.0.contains(&Skip::Status(code))
    }

    pub fn skips_timeout(&self) -> bool {
        self.0.contains(&Skip::Timeout)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Skip> for SkipList {
    fn from_iter<I: IntoIterator<Item = Skip>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Skip; N]> for SkipList {
    fn from(entries: [Skip; N]) -> Self {
        entries.into_iter().collect()
    }
}

/// Receives every error a handler raises, before it is returned.
///
/// Suppressed failures are not reported.
pub trait Reporter: Send + Sync {
    fn report(&self, error: &ClientError);
}

/// Reports errors as `tracing` events carrying the error metadata as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn report(&self, err: &ClientError) {
        let metadata = err.metadata().map(|m| m.to_string()).unwrap_or_default();
        error!(error = %err, %metadata, "client request failed");
    }
}

/// Applies a skip-list to strict-call outcomes.
#[derive(Clone, Default)]
pub struct ErrorHandler {
    skip: SkipList,
    reporter: Option<Arc<dyn Reporter>>,
}

impl ErrorHandler {
    pub fn new(skip: SkipList) -> Self {
        Self {
            skip,
            reporter: None,
        }
    }

    pub fn with_reporter(self, reporter: Arc<dyn Reporter>) -> Self {
        Self {
            reporter: Some(reporter),
            ..self
        }
    }

    pub fn skip_list(&self) -> &SkipList {
        &self.skip
    }

    /// Decide the strict result for `request` given the driver's outcome.
    ///
    /// Returns `Ok(None)` only when a timeout was skipped.
    pub fn handle(
        &self,
        request: HttpRequest,
        outcome: Result<HttpResponse, TransportError>,
    ) -> Result<Option<HttpResponse>, ClientError> {
        let response = match outcome {
            Ok(response) => response,
            Err(TransportError::Timeout(reason)) => {
                if self.skip.skips_timeout() {
                    info!(title = request.title(), url = request.url(), "timeout skipped");
                    return Ok(None);
                }
                return Err(self.raise(TimeoutError { request, reason }.into()));
            }
            Err(other) => return Err(other.into()),
        };

        if response.is_success() {
            return Ok(Some(response));
        }
        if self.skip.skips_status(response.status) {
            info!(
                title = request.title(),
                url = request.url(),
                status = response.status,
                "failing status skipped"
            );
            return Ok(Some(response));
        }
        Err(self.raise(DiagnosticError { request, response }.into()))
    }

    fn raise(&self, err: ClientError) -> ClientError {
        warn!(error = %err, "strict call failed");
        if let Some(reporter) = &self.reporter {
            reporter.report(&err);
        }
        err
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHandler")
            .field("skip", &self.skip)
            .field("reporter", &self.reporter.is_some())
            .finish()
    }
}
