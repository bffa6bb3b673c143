//! Error types for Floodline

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloodlineError {
    // Input layer errors
    #[error("Layer '{layer}' has no CRS defined. Set one (e.g. EPSG:4326) before running")]
    MissingCrs { layer: String },

    #[error("Layer '{layer}' has no usable geometry")]
    EmptyLayer { layer: String },

    #[error("Unsupported vector format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("{format} error: {message}")]
    Format { format: String, message: String },

    // Projection errors
    #[error("Projection failed: {reason}")]
    Projection { reason: String },

    // Network errors
    #[error("Overpass request failed: {0}")]
    Http(#[from] reqwest::Error),

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FloodlineError>;
