//! Error type shared by every storage and analysis operation.

use std::fmt;
use std::io;

use thiserror::Error;

/// The result type used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Which kind of persisted entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Corpus,
    Lexicon,
    Report,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EntityKind::Corpus => write!(f, "corpus"),
            EntityKind::Lexicon => write!(f, "lexicon"),
            EntityKind::Report => write!(f, "report"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    /// A referenced corpus, lexicon or report does not exist in storage.
    #[error("{kind} \"{name}\" does not exist")]
    NotFound { kind: EntityKind, name: String },

    /// A name is already taken by an entity of the same kind.
    #[error("{kind} \"{name}\" already exists")]
    AlreadyExists { kind: EntityKind, name: String },

    /// The report is being run and cannot be deleted or read.
    #[error("report \"{0}\" is currently running")]
    InUse(String),

    /// Malformed input rejected before any work starts.
    #[error("invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    /// Reading or writing one of the TSV tables failed.
    #[error("table i/o failed: {0}")]
    Table(#[from] csv::Error),

    /// A corpus document record could not be encoded or decoded.
    #[error("document record: {0}")]
    Json(#[from] serde_json::Error),

    /// Persisted configuration (TOML) could not be parsed or written.
    #[error("{0}")]
    Format(String),
}

impl Error {
    pub(crate) fn not_found(kind: EntityKind, name: &str) -> Self {
        Error::NotFound {
            kind,
            name: name.to_owned(),
        }
    }

    pub(crate) fn already_exists(kind: EntityKind, name: &str) -> Self {
        Error::AlreadyExists {
            kind,
            name: name.to_owned(),
        }
    }

    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    /// True for failures of the backing store or of an output sink.
    pub fn is_io(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Table(_) | Error::Json(_))
    }
}
