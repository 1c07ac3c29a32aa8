//! Error type of `rustles`
//!
//! The numerical kernels themselves never fail; degenerate states are
//! guarded inside the kernels and invalid inputs propagate as NaN.
//! Errors cover configuration, array shapes and the ordering of the
//! dynamic pipeline passes.
use crate::closure::PipelineStage;
use thiserror::Error;

/// Result type used throughout this crate
pub type Result<T> = std::result::Result<T, LesError>;

/// Collection of errors
#[derive(Debug, Error)]
pub enum LesError {
    /// Configuration file could not be read
    #[error("Error while reading configuration file {path:?}: {source}")]
    ConfigIo {
        /// Path of the configuration file
        path: String,
        /// Underlying io error
        #[source]
        source: std::io::Error,
    },
    /// Configuration could not be parsed
    #[error("Error while parsing configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
    /// Configuration could not be written
    #[error("Error while serializing configuration: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),
    /// Configuration value out of range
    #[error("Invalid parameter {name}: {value} ({reason})")]
    InvalidParameter {
        /// Name of the parameter
        name: &'static str,
        /// Rejected value
        value: f64,
        /// What is expected instead
        reason: &'static str,
    },
    /// Array does not match the grid
    #[error("Shape mismatch for {name}: expected {expected:?}, got {found:?}")]
    ShapeMismatch {
        /// Name of the array
        name: &'static str,
        /// Shape required by grid and layout
        expected: Vec<usize>,
        /// Shape of the supplied array
        found: Vec<usize>,
    },
    /// Dynamic pipeline pass called out of order
    #[error("Pass requires pipeline stage {expected}, found {found}")]
    StageOrder {
        /// Stage(s) the pass can start from
        expected: &'static str,
        /// Current stage
        found: PipelineStage,
    },
}
