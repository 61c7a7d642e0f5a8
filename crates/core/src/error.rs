//! Error types and severity tiers for ChapterShelf
//!
//! Errors carry a severity tier:
//! - **Recoverable**: bad input the user can correct (a rejected chapter, an incomplete book)
//! - **Degraded**: an operation failed but the library stays usable (missing book, I/O hiccup)
//! - **Fatal**: persisted data can no longer be trusted (corrupted library file)

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Error severity classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Error can be recovered from locally
    Recoverable,
    /// Operation failed but the app can continue
    Degraded,
    /// Critical error requiring user action
    Fatal,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Recoverable => write!(f, "Recoverable"),
            Self::Degraded => write!(f, "Degraded"),
            Self::Fatal => write!(f, "Fatal"),
        }
    }
}

/// Why the chapter validator refused a candidate chapter
///
/// Rules are checked in declaration order; the first failing rule wins.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChapterRejection {
    /// Title is empty after trimming
    #[error("Chapter title cannot be empty")]
    EmptyTitle,

    /// `end_time` is not strictly after `start_time` (includes NaN bounds)
    #[error("Chapter end ({end_time}s) must be after its start ({start_time}s)")]
    NonPositiveDuration { start_time: f64, end_time: f64 },

    /// Bounds fall outside `[0, total_duration]`
    #[error("Chapter {start_time}s-{end_time}s lies outside the audio (0s-{total_duration}s)")]
    OutOfRange {
        start_time: f64,
        end_time: f64,
        total_duration: f64,
    },
}

/// Main error type for ChapterShelf
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Validation Errors =====
    /// A chapter was rejected by the validator
    #[error("Invalid chapter: {0}")]
    ChapterRejected(#[from] ChapterRejection),

    /// A book is missing its title, source or chapters
    #[error("Incomplete book '{title}': {problems}")]
    IncompleteBook { title: String, problems: String },

    /// A chapter index does not exist in the book
    #[error("Chapter index {index} out of bounds (book has {len} chapters)")]
    ChapterIndexOutOfBounds { index: usize, len: usize },

    // ===== Library Errors =====
    /// No book with the given id
    #[error("Book not found: {id}")]
    BookNotFound { id: String },

    /// Library file could not be parsed
    #[error("Library file corrupted at {path}: {reason}")]
    StorageCorrupted { path: PathBuf, reason: String },

    /// Serialising or deserialising library data failed
    #[error("Serialization error: {message}")]
    SerializationError {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    // ===== File System Errors =====
    /// Reading or writing the library file failed
    #[error("I/O error: {message}")]
    IoError {
        message: String,
        #[source]
        source: io::Error,
    },

    // ===== Generic Errors =====
    /// Invalid argument provided
    #[error("Invalid argument: {argument} - {reason}")]
    InvalidArgument { argument: String, reason: String },
}

impl AppError {
    /// Returns the severity level of this error
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::ChapterRejected(_)
            | Self::IncompleteBook { .. }
            | Self::ChapterIndexOutOfBounds { .. }
            | Self::InvalidArgument { .. } => ErrorSeverity::Recoverable,

            Self::StorageCorrupted { .. } => ErrorSeverity::Fatal,

            _ => ErrorSeverity::Degraded,
        }
    }

    /// Returns a user-friendly error message suitable for display in the UI
    pub fn user_message(&self) -> String {
        match self {
            Self::ChapterRejected(ChapterRejection::EmptyTitle) => {
                "Give the chapter a title.".to_string()
            }
            Self::ChapterRejected(ChapterRejection::NonPositiveDuration { .. }) => {
                "The chapter must end after it starts.".to_string()
            }
            Self::ChapterRejected(ChapterRejection::OutOfRange { .. }) => {
                "The chapter must fit inside the audio file.".to_string()
            }
            Self::IncompleteBook { .. } => {
                "A book needs a title, an audio file and at least one chapter.".to_string()
            }
            Self::ChapterIndexOutOfBounds { .. } => "That chapter does not exist.".to_string(),
            Self::BookNotFound { .. } => "The requested book was not found.".to_string(),
            Self::StorageCorrupted { .. } => {
                "Your library file could not be read and was left untouched. Fix or move it, then try again.".to_string()
            }
            Self::SerializationError { .. } => "Library data could not be read.".to_string(),
            Self::IoError { .. } => "A file operation failed. Please try again.".to_string(),
            Self::InvalidArgument { .. } => "Invalid input provided.".to_string(),
        }
    }

    /// Helper to create a serialization error from any error type
    pub fn serialization<E: std::error::Error + Send + Sync + 'static>(
        message: impl Into<String>,
        source: E,
    ) -> Self {
        Self::SerializationError {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Convenience type alias for Results using AppError
pub type Result<T> = std::result::Result<T, AppError>;
