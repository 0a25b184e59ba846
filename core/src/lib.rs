//! Synchronous HTTP client toolkit with strict and soft calls.
//!
//! # Overview
//! Requests are built from per-call arguments and client defaults, then sent
//! through a pluggable [`Transport`] driver. Soft calls hand back whatever the
//! driver returned. Strict calls translate failing statuses and timeouts into
//! [`ClientError`]s carrying enough context to report the failed call, unless
//! the client's [`ErrorHandler`] is configured to skip them.
//!
//! # Design
//! - [`ClientConfig`] is immutable and owned by each [`Client`]; timeouts fall
//!   back from call argument to config to a 60 second default.
//! - [`HttpRequest`] cannot be changed after it is built; the dispatch verb
//!   is applied with [`HttpRequest::with_method`].
//! - The skip-list is a set of [`Skip`] entries, `Status(code)` or `Timeout`.
//! - Error metadata parses bodies leniently into [`ParsedBody`].
//!
//! ```no_run
//! use courier_core::{Client, ClientConfig, ErrorHandler, Skip, SkipList};
//! use serde_json::json;
//!
//! let client = Client::new(
//!     ClientConfig::default(),
//!     ErrorHandler::new(SkipList::from([Skip::Status(404)])),
//! );
//! let request = client
//!     .request("Create user", "https://api.example.com/users")
//!     .data(json!({"name": "ada"}))
//!     .json();
//! match client.post_strict(request) {
//!     Ok(response) => println!("{:?}", response.map(|r| r.status)),
//!     Err(err) => eprintln!("{err}: {:?}", err.metadata()),
//! }
//! ```

pub mod builder;
pub mod client;
pub mod config;
pub mod error;
pub mod handler;
pub mod http;
pub mod json;
pub mod transport;

pub use builder::{Payload, RequestBuilder};
pub use client::Client;
pub use config::{ClientConfig, ClientSettings, DEFAULT_TIMEOUT};
pub use error::{ClientError, DiagnosticError, ErrorContext, TimeoutError};
pub use handler::{ErrorHandler, Reporter, Skip, SkipList, TracingReporter};
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse};
pub use json::ParsedBody;
pub use transport::{Transport, TransportError, UreqTransport};
