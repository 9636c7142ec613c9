use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the three source files an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Orders,
    Metadata,
    Pbi,
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Orders => write!(f, "orders"),
            Self::Metadata => write!(f, "metadata"),
            Self::Pbi => write!(f, "PBI"),
        }
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    /// The file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be tokenized as delimited text (encoding or structure).
    #[error("failed to parse {kind} file: {message}")]
    Parse { kind: FileKind, message: String },

    /// The file parsed but its content is unusable (missing columns, no valid rows).
    #[error("{0}")]
    Validation(String),

    /// The blocking parse task panicked or was cancelled.
    #[error("ingestion task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IngestError {
    pub(crate) fn parse(kind: FileKind, message: impl fmt::Display) -> Self {
        Self::Parse {
            kind,
            message: message.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
