//! Error types for export planning operations.
//!
//! Errors are split by origin: [`ConfigError`] for rejected configuration,
//! [`SourceError`] for document providers, and [`ExportError`] for export
//! sinks. [`PackmatchError`] is the umbrella type returned by the pipeline.

use thiserror::Error;

/// A configuration value was rejected during validation.
///
/// Produced by [`PipelineConfig::validate`](crate::config::PipelineConfig::validate)
/// before a run starts. The pipeline never begins work with an invalid
/// configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The export scale factor must be positive and finite.
    #[error("Scale must be positive and finite (got {0})")]
    InvalidScale(f64),

    /// A distance threshold must be positive and finite.
    #[error("{name} must be positive and finite (got {value})")]
    InvalidDistance {
        /// Which threshold was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// The tie-detection epsilon must be non-negative and finite.
    #[error("Tie epsilon must be non-negative and finite (got {0})")]
    InvalidTieEpsilon(f64),

    /// The identifier run-length bounds are zero or inverted.
    #[error("Invalid identifier bounds: {0}")]
    InvalidIdentBounds(String),

    /// The tag vocabulary has no entries, so no group could ever match.
    #[error("Tag vocabulary must contain at least one entry")]
    EmptyVocabulary,
}

/// A document provider failed to produce a usable document.
///
/// All source errors are fatal: the pipeline refuses to run on a document
/// it could not fully load and validate.
#[derive(Error, Debug)]
pub enum SourceError {
    /// File I/O error while reading the document.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document payload was not valid JSON for the expected schema.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A group carries a degenerate or non-finite bounding box.
    #[error("Group '{path}' has invalid geometry: {reason}")]
    InvalidGeometry {
        /// Slash-joined path of the offending group.
        path: String,
        /// What was wrong with the box.
        reason: String,
    },

    /// A text label carries a non-finite anchor position.
    #[error("Label {index} has invalid position: {reason}")]
    InvalidLabel {
        /// Zero-based index of the label in document order.
        index: usize,
        /// What was wrong with the position.
        reason: String,
    },
}

/// An export sink failed while materializing or finalizing assets.
///
/// Per-item failures are recorded in the run report and do not stop the run;
/// a failure from [`ExportSink::finish`](crate::sink::ExportSink::finish) is
/// process-level and aborts with an error.
#[derive(Error, Debug)]
pub enum ExportError {
    /// File I/O error while writing export artifacts.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the export manifest failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The sink refused a specific asset.
    #[error("Sink rejected '{name}': {reason}")]
    Rejected {
        /// Final asset name the sink was asked to export.
        name: String,
        /// Sink-supplied reason.
        reason: String,
    },
}

/// Umbrella error for a full pipeline run.
#[derive(Error, Debug)]
pub enum PackmatchError {
    /// Configuration was rejected before the run started.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The document provider failed.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// The export sink failed at process level.
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Type alias for [`Result<T, PackmatchError>`].
///
/// # Examples
///
/// ```rust
/// use packmatch_core::{PackmatchError, Result};
///
/// fn checked(scale: f64) -> Result<f64> {
///     if scale > 0.0 {
///         Ok(scale)
///     } else {
///         Err(packmatch_core::ConfigError::InvalidScale(scale).into())
///     }
/// }
///
/// assert!(checked(2.0).is_ok());
/// assert!(matches!(checked(0.0), Err(PackmatchError::Config(_))));
/// ```
pub type Result<T> = std::result::Result<T, PackmatchError>;
