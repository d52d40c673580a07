//! Error types shared across the crate.

use thiserror::Error;

/// Boxed error produced by an external collaborator (detector, frame source).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum Error {
    /// The frame source could not be opened or read.
    #[error("frame source unavailable: {0}")]
    InputUnavailable(#[source] BoxError),

    /// The inference backend failed on a frame.
    #[error("inference failed: {0}")]
    Inference(#[source] BoxError),

    /// A raw output layer is too narrow to hold box, objectness and scores.
    #[error("output layer {layer} has {columns} columns, expected at least 6")]
    MalformedOutput { layer: usize, columns: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("class names: {0}")]
    ClassNames(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
