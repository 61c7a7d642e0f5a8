// FILE: crates/library/src/error.rs

use chaptershelf_core::{AppError, BookId, ChapterRejection};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Invalid chapter: {0}")]
    ChapterRejected(#[from] ChapterRejection),

    #[error("Chapter index {index} out of bounds ({len} chapters)")]
    ChapterIndexOutOfBounds { index: usize, len: usize },

    #[error("Book '{title}' cannot be saved: {}", problems.join("; "))]
    IncompleteBook { title: String, problems: Vec<String> },

    #[error("Book not found: {0}")]
    BookNotFound(String),

    #[error("Book id '{query}' matches {matches} books")]
    AmbiguousId { query: String, matches: usize },

    #[error("Book already in library: {0}")]
    DuplicateBook(BookId),

    #[error("Library file {path} is corrupted: {reason}")]
    Corrupted { path: PathBuf, reason: String },

    #[error("Failed to serialize library: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("IO error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;

impl From<LibraryError> for AppError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::ChapterRejected(rejection) => AppError::ChapterRejected(rejection),
            LibraryError::ChapterIndexOutOfBounds { index, len } => {
                AppError::ChapterIndexOutOfBounds { index, len }
            }
            LibraryError::IncompleteBook { title, problems } => AppError::IncompleteBook {
                title,
                problems: problems.join("; "),
            },
            LibraryError::BookNotFound(id) => AppError::BookNotFound { id },
            LibraryError::AmbiguousId { query, matches } => AppError::InvalidArgument {
                argument: query,
                reason: format!("matches {} books, use a longer prefix", matches),
            },
            LibraryError::DuplicateBook(id) => AppError::InvalidArgument {
                argument: id.to_string(),
                reason: "book already in library".to_string(),
            },
            LibraryError::Corrupted { path, reason } => AppError::StorageCorrupted { path, reason },
            LibraryError::Serialize(source) => AppError::serialization("library", source),
            LibraryError::Io { path, source } => AppError::IoError {
                message: path.display().to_string(),
                source,
            },
        }
    }
}
