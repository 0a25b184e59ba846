//! Per-client defaults.
//!
//! # Design
//! A `ClientConfig` is built once and owned by a [`Client`](crate::Client);
//! nothing mutates it afterwards. Timeout overrides are optional so the
//! builder can tell "configured" apart from "use the hard-coded default".

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::http::HttpMethod;
use crate::transport::{Transport, UreqTransport};

/// Fallback for both timeouts when neither the call nor the config sets one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Immutable defaults applied to every request a client builds.
#[derive(Clone)]
pub struct ClientConfig {
    driver: Arc<dyn Transport>,
    open_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
    method: HttpMethod,
}

impl ClientConfig {
    pub fn new(driver: Arc<dyn Transport>) -> Self {
        Self {
            driver,
            open_timeout: None,
            read_timeout: None,
            method: HttpMethod::Get,
        }
    }

    /// Build a config from deserialized settings, keeping the default driver.
    pub fn from_settings(settings: &ClientSettings) -> Self {
        let mut config = Self::default().with_method(settings.method);
        config.open_timeout = settings.open_timeout_secs.map(Duration::from_secs);
        config.read_timeout = settings.read_timeout_secs.map(Duration::from_secs);
        config
    }

    pub fn with_driver(self, driver: Arc<dyn Transport>) -> Self {
        Self { driver, ..self }
    }

    pub fn with_open_timeout(self, timeout: Duration) -> Self {
        Self {
            open_timeout: Some(timeout),
            ..self
        }
    }

    pub fn with_read_timeout(self, timeout: Duration) -> Self {
        Self {
            read_timeout: Some(timeout),
            ..self
        }
    }

    pub fn with_method(self, method: HttpMethod) -> Self {
        Self { method, ..self }
    }

    pub fn driver(&self) -> &Arc<dyn Transport> {
        &self.driver
    }

    pub fn open_timeout(&self) -> Option<Duration> {
        self.open_timeout
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(Arc::new(UreqTransport))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("driver", &self.driver.name())
            .field("open_timeout", &self.open_timeout)
            .field("read_timeout", &self.read_timeout)
            .field("method", &self.method)
            .finish()
    }
}

/// Serializable subset of [`ClientConfig`], for loading defaults from a file
/// or environment-provided JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSettings {
    pub open_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub method: HttpMethod,
}
