use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::charm::ParseError;

/// Result type for bundle operations
pub type Result<T> = std::result::Result<T, BundleError>;

/// Broad classification of a [`BundleError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The backing file could not be opened or stat'ed.
    SourceOpen,
    /// The bytes are not a readable zip archive.
    InvalidArchive,
    /// `metadata.yaml` or `config.yaml` is absent.
    MissingEntry,
    /// A metadata or configuration document failed to parse.
    ParseFailure,
    /// A single entry could not be written during expansion.
    ExtractFailure,
}

/// Error type for reading and expanding bundles
#[derive(Debug, Error)]
pub enum BundleError {
    #[error("cannot open bundle {}: {}", .path.display(), .source)]
    SourceOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid zip archive: {0}")]
    InvalidArchive(String),

    #[error("bundle file not found: {0}")]
    MissingEntry(String),

    #[error("{source}")]
    Parse {
        entry: String,
        #[source]
        source: ParseError,
    },

    #[error("cannot extract {entry}: {source}")]
    Extract {
        entry: String,
        #[source]
        source: io::Error,
    },
}

impl BundleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BundleError::SourceOpen { .. } => ErrorKind::SourceOpen,
            BundleError::InvalidArchive(_) => ErrorKind::InvalidArchive,
            BundleError::MissingEntry(_) => ErrorKind::MissingEntry,
            BundleError::Parse { .. } => ErrorKind::ParseFailure,
            BundleError::Extract { .. } => ErrorKind::ExtractFailure,
        }
    }

    /// Name of the archive entry the error concerns, if any.
    pub fn entry(&self) -> Option<&str> {
        match self {
            BundleError::MissingEntry(entry)
            | BundleError::Parse { entry, .. }
            | BundleError::Extract { entry, .. } => Some(entry),
            BundleError::SourceOpen { .. } | BundleError::InvalidArchive(_) => None,
        }
    }

    pub(crate) fn source_open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BundleError::SourceOpen {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn extract(entry: &str, source: io::Error) -> Self {
        BundleError::Extract {
            entry: entry.to_string(),
            source,
        }
    }
}

/// Errors raised while walking zip structures.
///
/// These never reach callers directly; the bundle layer maps them onto
/// [`BundleError::InvalidArchive`] or [`BundleError::Extract`] depending on
/// whether the failure is fatal.
#[derive(Debug, Error)]
pub enum ZipError {
    #[error("{0}")]
    Format(String),

    #[error("unsupported compression method: {0}")]
    UnsupportedCompression(u16),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ZipError {
    pub(crate) fn format(msg: impl Into<String>) -> Self {
        ZipError::Format(msg.into())
    }
}

impl From<ZipError> for io::Error {
    fn from(err: ZipError) -> Self {
        match err {
            ZipError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::InvalidData, other),
        }
    }
}

impl From<ZipError> for BundleError {
    fn from(err: ZipError) -> Self {
        BundleError::InvalidArchive(err.to_string())
    }
}
