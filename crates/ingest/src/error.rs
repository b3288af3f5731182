use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning an uploaded document into context chunks
#[derive(Error, Debug)]
pub enum LoaderError {
    /// The document path does not exist
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    /// Extension we do not know how to read
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The file exists but its contents cannot be decoded
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Underlying filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<zip::result::ZipError> for LoaderError {
    fn from(e: zip::result::ZipError) -> Self {
        LoaderError::Malformed(format!("zip: {}", e))
    }
}

impl From<quick_xml::Error> for LoaderError {
    fn from(e: quick_xml::Error) -> Self {
        LoaderError::Malformed(format!("xml: {}", e))
    }
}
