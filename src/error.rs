//! Unified error handling for camino-atlas.
//!
//! Segmentation and summarization are pure and deterministic, so every error
//! here is surfaced synchronously to the caller; there is nothing to retry.
//! The caller decides whether a bad route group aborts the run or is skipped.

use std::path::PathBuf;

/// Unified error type for camino-atlas operations.
#[derive(Debug, thiserror::Error)]
pub enum AtlasError {
    /// A route group with no tracks was handed to the core.
    #[error("route group is empty")]
    EmptyRouteGroup,

    /// A route group mixed tracks from different routes.
    #[error("route group mixes route names: expected '{expected}', found '{found}'")]
    MixedRouteNames { expected: String, found: String },

    /// A catalog record carried neither a date nor a day number.
    #[error("track '{path}' has neither a date nor a day number")]
    MissingOrderKey { path: String },

    /// A GPX file parsed cleanly but contained no track points.
    #[error("no track points found in '{}'", path.display())]
    EmptyTrace { path: PathBuf },

    /// A catalog track has no loaded trace to draw.
    #[error("no trace loaded for catalog path '{path}'")]
    TraceNotFound { path: String },

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for camino-atlas operations.
pub type Result<T> = std::result::Result<T, AtlasError>;
