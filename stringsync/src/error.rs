//! All error types for the stringsync crate.
//!
//! These are returned from every fallible operation (parsing, batch handling, file writes).

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("XML parse error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    #[error("invalid resource: {0}")]
    InvalidResource(String),

    #[error("invalid data: {0}")]
    DataMismatch(String),

    #[error("invalid batch file {}: {source}", path.display())]
    InvalidBatch {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("batch serialization error: {0}")]
    Batch(#[from] serde_json::Error),

    #[error("invalid options: {0}")]
    InvalidOptions(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Creates a new malformed-batch error for the file at `path`.
    pub fn invalid_batch(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Error::InvalidBatch {
            path: path.into(),
            source,
        }
    }

    /// Whether this error means one of the documents could not be parsed.
    pub fn is_malformed_document(&self) -> bool {
        matches!(
            self,
            Error::XmlParse(_) | Error::InvalidResource(_) | Error::DataMismatch(_)
        )
    }
}

impl From<quick_xml::events::attributes::AttrError> for Error {
    fn from(value: quick_xml::events::attributes::AttrError) -> Self {
        Error::DataMismatch(value.to_string())
    }
}
