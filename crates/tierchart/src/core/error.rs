//! Core error types for chart layout
//!
//! Every stage of the pipeline reports failures through [`ChartError`].

use thiserror::Error;

use super::NodeId;

/// Result alias used by the layout stages
pub type Result<T> = std::result::Result<T, ChartError>;

/// Core error types for chart layout
#[derive(Error, Debug)]
pub enum ChartError {
    /// The input tree or the configuration cannot be laid out
    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    /// The external measurement service failed; the run is aborted
    #[error("Measurement failed for node {node}: {source}")]
    MeasurementFailure {
        node: NodeId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// A later stage found state an earlier stage should have produced
    #[error("Layout invariant violated: {message}")]
    InvariantViolation { message: String },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ChartError {
    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a new invariant violation
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation {
            message: message.into(),
        }
    }

    /// Wrap a measurement service failure for `node`
    pub fn measurement(node: NodeId, source: anyhow::Error) -> Self {
        Self::MeasurementFailure {
            node,
            source: source.into(),
        }
    }
}
