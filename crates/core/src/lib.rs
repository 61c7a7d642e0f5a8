//! ChapterShelf core
//!
//! Domain model shared by every other crate: audiobooks, chapters, playback
//! values, the chapter validator and the error taxonomy.

pub mod error;
pub mod types;
pub mod validation;

// Re-export commonly used types
pub use error::{AppError, ChapterRejection, ErrorSeverity, Result};
pub use types::{
    format_time, AudioBook, BookId, BookSummary, Chapter, ChapterId, PlaybackRate, Timestamp,
    Validator, Volume,
};
pub use validation::{ChapterCandidate, ChapterValidator};
