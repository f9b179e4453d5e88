// File: src/error.rs
//! Error types shared by every stage of the deck pipeline.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias defaulting to [`DeckError`].
pub type Result<T, E = DeckError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum DeckError {
    /// An input or output file could not be read or written.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON input (word order, decomposition table) was malformed.
    #[error("Invalid JSON in '{path}': {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A line-oriented source (CC-CEDICT, pinyin table) contained a line we cannot parse.
    #[error("Parse error in '{path}' at line {line}: {reason}")]
    Parse {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// Encoding or decoding the source snapshot failed.
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] bincode::Error),

    /// Writing the deck package failed after the temp file was created.
    #[error("Could not persist '{path}': {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },

    /// Building the SQLite collection inside a package failed.
    #[error("Collection error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Writing the package archive failed.
    #[error("Package archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A component was found among its own ancestors while expanding a character.
    #[error("Decomposition cycle detected: {}", path.join(" -> "))]
    DecompositionCycle { path: Vec<String> },

    /// Expansion went deeper than the configured limit.
    #[error("Decomposition of '{character}' exceeded the depth limit of {limit}")]
    DepthLimitExceeded { character: String, limit: usize },
}

impl DeckError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DeckError::Io { path: path.into(), source }
    }
}
