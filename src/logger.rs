//! Logging capability owned by the client
//!
//! The client reports through a [`Logger`] it holds rather than through a
//! process-wide logger, so tests can observe exactly what was reported.
//! [`TracingLogger`] is the default and forwards to `tracing`.
//! [`MemoryLogger`] is only built for tests and the `test-util` feature.

#[cfg(any(test, feature = "test-util"))]
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

pub trait Logger: Send + Sync {
    fn warn(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `tracing` macros under the `coinmarketcap_client` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn warn(&self, message: &str) {
        warn!(target: "coinmarketcap_client", "{}", message);
    }

    fn info(&self, message: &str) {
        info!(target: "coinmarketcap_client", "{}", message);
    }

    fn error(&self, message: &str) {
        error!(target: "coinmarketcap_client", "{}", message);
    }
}

#[cfg(any(test, feature = "test-util"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Warn,
    Info,
    Error,
}

#[cfg(any(test, feature = "test-util"))]
/// Keeps every message in memory, in order
#[derive(Debug, Clone, Default)]
pub struct MemoryLogger {
    entries: Arc<Mutex<Vec<(LogLevel, String)>>>,
}

#[cfg(any(test, feature = "test-util"))]
impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages logged at `level`
    pub fn messages(&self, level: LogLevel) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn push(&self, level: LogLevel, message: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, message.to_string()));
        }
    }
}

#[cfg(any(test, feature = "test-util"))]
impl Logger for MemoryLogger {
    fn warn(&self, message: &str) {
        self.push(LogLevel::Warn, message);
    }

    fn info(&self, message: &str) {
        self.push(LogLevel::Info, message);
    }

    fn error(&self, message: &str) {
        self.push(LogLevel::Error, message);
    }
}
