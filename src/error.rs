use crate::extraction::ExtractionError;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Yuntu
#[derive(Error, Debug)]
pub enum YuntuError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation errors
    #[error("Configuration validation failed: {errors:?}")]
    ConfigValidation { errors: Vec<ValidationError> },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Invalid configuration value
    #[error("Invalid configuration value at {path}: {message}")]
    InvalidConfigValue { path: String, message: String },

    /// Canvas with a non-positive (or non-finite) dimension
    #[error("Invalid canvas size {width}x{height}: both dimensions must be positive")]
    InvalidCanvas { width: f64, height: f64 },

    /// Malformed input handed to the layout engine
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Generation requested with neither source text nor inclusions
    #[error("Nothing to generate: provide source text or at least one inclusion")]
    EmptyInput,

    /// Upstream keyword extraction failed
    #[error("Keyword extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// Layout run abandoned because a newer request superseded it
    #[error("Layout run was cancelled")]
    Cancelled,

    /// IO errors
    #[error("IO error: {context}: {source}")]
    Io {
        source: std::io::Error,
        context: String,
    },

    /// TOML deserialization errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization errors
    #[error("TOML serialization error: {0}")]
    TomlSerialization(#[from] toml::ser::Error),

    /// JSON errors
    #[error("JSON error: {context}: {source}")]
    Json {
        source: serde_json::Error,
        context: String,
    },

    /// Generic errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Configuration validation error
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Path to the configuration key that failed validation
    pub path: String,
    /// Error message describing the validation failure
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type for Yuntu operations
pub type Result<T> = std::result::Result<T, YuntuError>;
