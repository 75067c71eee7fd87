//! Error types for slide extraction and presentation upload.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while extracting or uploading slides.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to open, read, or write a local file.
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// An input file or folder does not exist.
    #[error("Input not found: {}", .0.display())]
    MissingInput(PathBuf),

    /// The input exists but yields nothing to work on.
    #[error("Nothing to process: {0}")]
    EmptyInput(String),

    /// Failed to parse the HTML document.
    #[error("HTML parsing error: {0}")]
    HtmlParseError(String),

    /// The OAuth client secret file is missing (first run).
    #[error("OAuth client secret not found: {}", .0.display())]
    MissingClientSecret(PathBuf),

    /// No cached or refreshable credential exists and interactive
    /// authorization is not available.
    #[error("Authorization required: {0}")]
    AuthRequired(String),

    /// The authorization server rejected a request or returned garbage.
    #[error("OAuth error: {0}")]
    AuthError(String),

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// A remote API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to serialize or deserialize JSON.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}
