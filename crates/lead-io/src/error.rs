use std::io;
use std::path::PathBuf;

/// Errors produced while reading or writing documents.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// The input document could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The input document is not valid JSON or lacks a `leads` array of
    /// objects.
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// An output document could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An output document could not be encoded.
    #[error("failed to encode {path}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience alias for document I/O results.
pub type IoResult<T> = Result<T, IoError>;
