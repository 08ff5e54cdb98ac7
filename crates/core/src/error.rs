//! Error types for Curbside

use thiserror::Error;

/// Main error type for Curbside operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// A vertex kept by simplification could not be located in the source ring.
    #[error("coordinate reconciliation failed for block {block_id}: ({x}, {y}) not found after ring position {position}")]
    Reconciliation {
        block_id: String,
        x: f64,
        y: f64,
        position: usize,
    },

    #[error("block {block_id} is not a single contiguous polygon")]
    NonContiguousBlock { block_id: String },

    #[error("empty geometry for {what} {id}")]
    EmptyGeometry { what: &'static str, id: String },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),
}

impl Error {
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for Curbside operations
pub type Result<T> = std::result::Result<T, Error>;
