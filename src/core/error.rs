//! Error types for skychart
//!
//! This module provides structured error handling using thiserror.
//! Every failure is fatal for the generation pass it occurs in: there is no
//! partial output and no retry.

use thiserror::Error;

/// Result type alias for chart generation
pub type Result<T> = std::result::Result<T, ChartError>;

/// Errors that can occur while generating a chart
#[derive(Error, Debug)]
pub enum ChartError {
    /// Invalid configuration, detected before any randomness is consumed
    #[error("Invalid configuration: {message}")]
    Configuration { message: String },

    /// A pool (candidate stars, names) ran dry while more items were required
    #[error("{resource} exhausted: {message}")]
    ResourceExhaustion {
        resource: &'static str,
        message: String,
    },

    /// Internal-consistency failure in the constellation graph
    #[error("Graph invariant violated: {message}")]
    GraphInvariant { message: String },

    /// IO error while reading configuration or name lists
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or writing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<ChartError>,
    },
}

impl ChartError {
    /// Wrap an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ChartError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        ChartError::Configuration {
            message: message.into(),
        }
    }

    /// Create a resource exhaustion error
    pub fn exhausted(resource: &'static str, message: impl Into<String>) -> Self {
        ChartError::ResourceExhaustion {
            resource,
            message: message.into(),
        }
    }

    /// Create a graph invariant error
    pub fn graph_invariant(message: impl Into<String>) -> Self {
        ChartError::GraphInvariant {
            message: message.into(),
        }
    }

    /// The innermost error, skipping context wrappers
    pub fn root(&self) -> &ChartError {
        match self {
            ChartError::WithContext { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, ctx: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, ctx: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(ctx))
    }
}
