//! Error types for roster fetching, rendering and display

use thiserror::Error;

/// Result type alias for roster operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while fetching, rendering or displaying a roster
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to fetch a remote resource
    #[error("Network error: {0}")]
    Network(String),

    /// A payload could not be decoded
    #[error("Failed to parse {what}: {reason}")]
    Parse { what: String, reason: String },

    /// Rows of one class are not contiguous in the roster
    #[error("Roster is not grouped by class: '{class}' reappears at row {index}")]
    UngroupedRoster { class: String, index: usize },

    /// Failed to lay out or draw a table
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Failed to encode a raster into an image blob
    #[error("Encoding failed: {0}")]
    Encode(String),

    /// Failed to load or parse a font
    #[error("Font error: {0}")]
    Font(String),

    /// The requested output format is not compiled in
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    pub(crate) fn parse(what: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Error::Parse {
            what: what.into(),
            reason: err.to_string(),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Encode(err.to_string())
    }
}

#[cfg(feature = "http")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Network(err.to_string())
    }
}
