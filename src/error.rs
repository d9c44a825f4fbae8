//! Error types for docstruct.
//!
//! Parsing has exactly one fatal path: the container cannot be opened or
//! decoded. Everything that goes wrong with a single element is downgraded
//! to a warning at the point where it happens.

use std::io;
use thiserror::Error;

/// Result type alias for docstruct operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a whole parse.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading the input file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not a readable ZIP container.
    #[error("Invalid .docx container: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The container opened but its main document part could not be decoded.
    #[error("Failed to decode document: {0}")]
    Docx(#[from] docx_rs::ReaderError),

    /// The file is not a Word document.
    #[error("{0}")]
    InvalidFormat(String),

    /// The configuration file could not be read or written.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure to turn one embedded picture into an [`Image`](crate::document::Image).
///
/// These never abort a parse; the image associator logs them and moves on.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageResolutionError {
    #[error("relationship {0} is not defined by the document part")]
    MissingRelationship(String),

    #[error("relationship {id} points at {target}, which is not an image")]
    NotAnImage { id: String, target: String },

    #[error("image target {0} does not exist")]
    TargetNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidFormat("not a docx".to_string());
        assert_eq!(err.to_string(), "not a docx");

        let err = ImageResolutionError::MissingRelationship("rId9".to_string());
        assert_eq!(
            err.to_string(),
            "relationship rId9 is not defined by the document part"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
