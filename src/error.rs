//! Error type shared by every part of folio
//!
//! Merge mismatches are never errors; everything here is either I/O,
//! a malformed request, or a refused edit-mode action.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file under the site root failed
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The edit store body or file is not valid JSON of the expected shape
    #[error("invalid edit store: {0}")]
    Store(#[from] serde_json::Error),

    /// A requested path would resolve outside the site root
    #[error("path escapes the site root: {0}")]
    PathEscapesRoot(String),

    /// Decoding or re-encoding an image failed
    #[error("{path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("incorrect password")]
    WrongPassword,

    #[error("edit mode is not active")]
    NotEditing,

    /// A field, gallery or flag name given on the command line is not known
    #[error("unknown {kind} `{value}`")]
    Unknown { kind: &'static str, value: String },

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Error::Unknown {
            kind,
            value: value.into(),
        }
    }
}
