// FILE: crates/media-engine/src/chapters.rs
//! Chapter navigation for the loaded book

use chaptershelf_core::Chapter;

/// A book's chapters plus the index of the current one
///
/// Chapters stay in authored order; nothing here sorts or repairs them.
/// The index is always 0 for an empty list and always in bounds otherwise.
#[derive(Debug, Clone, Default)]
pub struct ChapterList {
    chapters: Vec<Chapter>,
    current_index: usize,
}

impl ChapterList {
    /// Creates a list positioned on the first chapter
    pub fn new(chapters: Vec<Chapter>) -> Self {
        Self {
            chapters,
            current_index: 0,
        }
    }

    /// Returns the total number of chapters
    pub fn len(&self) -> usize {
        self.chapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chapters.is_empty()
    }

    /// Gets a chapter by index
    pub fn get(&self, index: usize) -> Option<&Chapter> {
        self.chapters.get(index)
    }

    /// Gets the current chapter; `None` only when the list is empty
    pub fn current(&self) -> Option<&Chapter> {
        self.chapters.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Jumps to a chapter by index, returning its start time
    ///
    /// Out-of-range indices leave the current chapter unchanged.
    pub fn select(&mut self, index: usize) -> Option<f64> {
        let start_time = self.chapters.get(index)?.start_time;
        self.current_index = index;
        Some(start_time)
    }

    /// Index of the following chapter, if any
    pub fn next_index(&self) -> Option<usize> {
        let next = self.current_index + 1;
        (next < self.chapters.len()).then_some(next)
    }

    /// Index of the preceding chapter, if any
    pub fn previous_index(&self) -> Option<usize> {
        if self.chapters.is_empty() {
            return None;
        }
        self.current_index.checked_sub(1)
    }

    pub fn has_next(&self) -> bool {
        self.next_index().is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous_index().is_some()
    }

    /// Returns all chapters
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    /// Returns formatted chapter position (e.g., "3/15")
    pub fn position_label(&self) -> String {
        if self.chapters.is_empty() {
            "No chapters".to_string()
        } else {
            format!("{}/{}", self.current_index + 1, self.chapters.len())
        }
    }
}
