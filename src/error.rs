//! Errors raised while building, filtering or packing a dictionary.
//!
//! Every variant is fatal to a single run. Nothing is retried and no partial
//! output file is left behind.

use std::fmt;
use std::path::Path;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running a conversion
#[derive(Debug)]
pub enum Error {
    /// Input file missing or unreadable
    SourceRead(String),
    /// Malformed backup XML, or the `<smses>` root is missing
    SourceParse(String),
    /// Destination unwritable (permissions, missing directory, ...)
    OutputWrite(String),
    /// Zip container error
    Archive(String),
    /// Bad configuration file or override value
    Config(String),
}

impl Error {
    pub(crate) fn source_read(path: &Path, err: impl fmt::Display) -> Self {
        Error::SourceRead(format!("{}: {}", path.display(), err))
    }

    pub(crate) fn output_write(path: &Path, err: impl fmt::Display) -> Self {
        Error::OutputWrite(format!("{}: {}", path.display(), err))
    }

    /// Map a quick-xml failure, keeping I/O problems apart from syntax ones.
    pub(crate) fn from_xml(err: quick_xml::Error, position: usize) -> Self {
        match err {
            quick_xml::Error::Io(io) => Error::SourceRead(io.to_string()),
            other => Error::SourceParse(format!("at byte {}: {}", position, other)),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SourceRead(msg) => write!(f, "Source read error: {}", msg),
            Error::SourceParse(msg) => write!(f, "Source parse error: {}", msg),
            Error::OutputWrite(msg) => write!(f, "Output write error: {}", msg),
            Error::Archive(msg) => write!(f, "Archive error: {}", msg),
            Error::Config(msg) => write!(f, "Config error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}
