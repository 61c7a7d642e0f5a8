//! Audiobook and chapter domain models

use crate::types::{format_time, Timestamp, Validator};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an audiobook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookId(Uuid);

impl BookId {
    /// Creates a new random BookId
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a BookId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Returns the BookId as a string
    pub fn as_string(&self) -> String {
        self.0.to_string()
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for BookId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier for a chapter, unique within its book's chapter list
///
/// Built from the creation time and the insertion index, e.g.
/// `chapter-1718000000000-3`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterId(String);

impl ChapterId {
    /// Builds the id for a chapter created at `created` in slot `index`
    pub fn generate(created: Timestamp, index: usize) -> Self {
        Self(format!("chapter-{}-{}", created.as_millis(), index))
    }

    /// Wraps an existing id string (e.g. one read back from storage)
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ChapterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named segment of an audiobook's timeline, in seconds
///
/// `end_time` is exclusive. Chapters of one book may overlap or leave gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    pub title: String,
    pub start_time: f64,
    pub end_time: f64,
}

impl Chapter {
    /// Creates a chapter without validating it
    ///
    /// Use [`crate::ChapterValidator`] for anything that comes from user input.
    pub fn new(id: ChapterId, title: impl Into<String>, start_time: f64, end_time: f64) -> Self {
        Self {
            id,
            title: title.into(),
            start_time,
            end_time,
        }
    }

    /// Returns the chapter length in seconds
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// Checks if a given absolute position falls within this chapter
    pub fn contains(&self, position: f64) -> bool {
        position >= self.start_time && position < self.end_time
    }

    /// Chapter length formatted for a chapter list row
    pub fn formatted_duration(&self) -> String {
        format_time(self.duration())
    }
}

/// An audiobook in the library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioBook {
    pub id: BookId,
    pub title: String,
    /// Reference to the underlying media resource
    pub audio_source: String,
    pub cover_source: Option<String>,
    /// Length of the media resource in seconds, as reported by the transport
    pub total_duration: f64,
    /// Chapters in authored order
    pub chapters: Vec<Chapter>,
    pub added_date: Timestamp,
}

impl AudioBook {
    /// Creates a new book with no chapters
    pub fn new(title: impl Into<String>, audio_source: impl Into<String>, total_duration: f64) -> Self {
        Self {
            id: BookId::new(),
            title: title.into(),
            audio_source: audio_source.into(),
            cover_source: None,
            total_duration,
            chapters: Vec::new(),
            added_date: Timestamp::now(),
        }
    }

    /// Sets the cover image reference
    pub fn with_cover(mut self, cover_source: impl Into<String>) -> Self {
        self.cover_source = Some(cover_source.into());
        self
    }

    /// Appends a chapter
    pub fn with_chapter(mut self, chapter: Chapter) -> Self {
        self.chapters.push(chapter);
        self
    }

    /// A book is playable once it has a title, a source and at least one chapter
    pub fn is_playable(&self) -> bool {
        self.is_valid()
    }

    /// Returns the chapter at `index`, if any
    pub fn chapter(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Returns the number of chapters
    pub fn chapter_count(&self) -> usize {
        self.chapters.len()
    }

    /// Card-view summary of this book
    pub fn summary(&self) -> BookSummary {
        BookSummary {
            id: self.id,
            title: self.title.clone(),
            duration: format_time(self.total_duration),
            chapter_count: self.chapters.len(),
            has_cover: self.cover_source.is_some(),
        }
    }
}

impl Validator for AudioBook {
    fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.title.trim().is_empty() {
            errors.push("Title cannot be empty".to_string());
        }

        if self.audio_source.trim().is_empty() {
            errors.push("Audio source is required".to_string());
        }

        if self.chapters.is_empty() {
            errors.push("At least one chapter is required".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Display record for a book in the library grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookSummary {
    pub id: BookId,
    pub title: String,
    pub duration: String,
    pub chapter_count: usize,
    pub has_cover: bool,
}
