//! Core error types for fridge-core.
//!
//! Errors are layered with thiserror: configuration and upload failures have
//! their own enums and fold into [`CoreError`] through `#[from]`.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for fridge-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Recognition upload errors
    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    /// No item with the given id in the current list
    #[error("Unknown item: {0}")]
    UnknownItem(String),

    /// A recognition result arrived for an upload that has been superseded
    #[error("Discarding stale recognition result (ticket {ticket}, latest {latest})")]
    StaleUpload { ticket: u64, latest: u64 },

    /// Upload requested with an empty photo queue
    #[error("No photos to upload")]
    NoPhoto,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the recognition upload call.
#[derive(Error, Debug)]
pub enum UploadError {
    /// The image file could not be read
    #[error("Failed to read image {path}: {source}")]
    ReadImage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Network or protocol failure before a response was received
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-2xx status
    #[error("Recognition service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body was not `{ "items": [string] }`
    #[error("Malformed recognition response: {0}")]
    Decode(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
