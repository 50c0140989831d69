//! Error types for docmd library.

use std::io;
use thiserror::Error;

/// Result type alias for docmd operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during conversion.
///
/// Every variant is recoverable at the granularity of a single conversion:
/// the caller reports the message and may start a new conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is empty or not recognized.
    #[error("Unknown input format")]
    UnknownFormat,

    /// The input was recognized but cannot be decoded.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// File import is restricted to Markdown and rich-document extensions.
    #[error("Unsupported file extension: {0} (expected .md, .doc or .docx)")]
    UnsupportedExtension(String),

    /// No input, so no format could be determined.
    #[error("Could not determine the input format; enter some content or import a file")]
    DetectionAmbiguous,

    /// The requested conversion direction cannot be performed on this input.
    #[error("{0}")]
    UnsupportedDirection(String),

    /// An external collaborator (packager or extractor) rejected the input.
    #[error("{name} failed: {message}")]
    Collaborator {
        /// Collaborator name
        name: String,
        /// Failure description
        message: String,
    },

    /// Error reading or writing the ZIP container.
    #[error("ZIP error: {0}")]
    Zip(String),

    /// Error reading or writing WordprocessingML.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error during rendering (Markdown, HTML, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Build a collaborator failure.
    pub fn collaborator(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Collaborator {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Whether the error came from an external collaborator.
    pub fn is_collaborator(&self) -> bool {
        matches!(self, Error::Collaborator { .. } | Error::Zip(_) | Error::Xml(_))
    }

    /// Whether a new conversion may be started after this error.
    ///
    /// Always true: every failure is scoped to the request that raised it.
    pub fn is_recoverable(&self) -> bool {
        true
    }
}

#[cfg(feature = "docx")]
impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Zip(err.to_string()),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::Xml(err.to_string())
    }
}
