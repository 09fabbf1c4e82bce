//! Error handling for framewire
//!
//! This module defines the crate-level error type and a Result alias used
//! by configuration loading and the binary. Port and graph failures have
//! their own types in [`crate::graph::error`] and convert into this one.

use crate::graph::error::{GraphError, PortError};
use thiserror::Error;

/// Main error type for framewire operations
#[derive(Error, Debug)]
pub enum FramewireError {
    /// Errors raised while wiring, validating or running a graph
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors raised by a single port operation
    #[error("Port error: {0}")]
    Port(#[from] PortError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<FramewireError>,
    },
}

impl FramewireError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        FramewireError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

impl From<serde_json::Error> for FramewireError {
    fn from(err: serde_json::Error) -> Self {
        FramewireError::Serialization(err.to_string())
    }
}

/// Result type alias for framewire operations
pub type Result<T> = std::result::Result<T, FramewireError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<FramewireError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
