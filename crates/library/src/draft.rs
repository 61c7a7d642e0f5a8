// FILE: crates/library/src/draft.rs
//! Add/edit book forms
//!
//! A [`BookDraft`] holds the fields of the add or edit dialog while the user
//! works on them. Chapters go through the [`ChapterValidator`] as they are
//! entered; the finished draft becomes an [`AudioBook`] with [`BookDraft::build`].

use crate::error::{LibraryError, LibraryResult};
use chaptershelf_core::{
    AudioBook, BookId, Chapter, ChapterCandidate, ChapterRejection, ChapterValidator, Timestamp,
    Validator,
};
use log::debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookDraft {
    /// Set when editing an existing book
    original: Option<(BookId, Timestamp)>,
    title: String,
    audio_source: Option<String>,
    cover_source: Option<String>,
    total_duration: f64,
    chapters: Vec<Chapter>,
}

impl BookDraft {
    /// Empty draft for a new book
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit draft pre-filled from `book`; building it keeps the book's id
    pub fn from_book(book: &AudioBook) -> Self {
        Self {
            original: Some((book.id, book.added_date)),
            title: book.title.clone(),
            audio_source: Some(book.audio_source.clone()),
            cover_source: book.cover_source.clone(),
            total_duration: book.total_duration,
            chapters: book.chapters.clone(),
        }
    }

    pub fn is_edit(&self) -> bool {
        self.original.is_some()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn audio_source(&self) -> Option<&str> {
        self.audio_source.as_deref()
    }

    /// Replaces the audio source and the duration the transport reported for it
    ///
    /// Existing chapters are kept as they are, even if they no longer fit.
    pub fn set_audio_source(&mut self, source: impl Into<String>, duration: f64) {
        let source = source.into();
        debug!("Draft audio source set to {} ({}s)", source, duration);
        self.audio_source = Some(source);
        self.total_duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
    }

    pub fn cover_source(&self) -> Option<&str> {
        self.cover_source.as_deref()
    }

    pub fn set_cover_source(&mut self, cover: Option<String>) {
        self.cover_source = cover;
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    fn validator(&self) -> ChapterValidator {
        ChapterValidator::new(self.total_duration)
    }

    /// Checks chapter fields without adding them, for enabling a save button
    pub fn check_chapter(
        &self,
        title: &str,
        start_time: f64,
        end_time: f64,
    ) -> Result<(), ChapterRejection> {
        self.validator()
            .check(&ChapterCandidate::new(title, start_time, end_time))
    }

    /// Validates and appends a chapter, returning it
    pub fn add_chapter(
        &mut self,
        title: impl Into<String>,
        start_time: f64,
        end_time: f64,
    ) -> LibraryResult<&Chapter> {
        let candidate = ChapterCandidate::new(title, start_time, end_time);
        let chapter = self.validator().accept(candidate, &self.chapters)?;
        self.chapters.push(chapter);
        Ok(&self.chapters[self.chapters.len() - 1])
    }

    /// Re-validates and replaces the chapter at `index`, keeping its id
    pub fn edit_chapter(
        &mut self,
        index: usize,
        title: impl Into<String>,
        start_time: f64,
        end_time: f64,
    ) -> LibraryResult<&Chapter> {
        let len = self.chapters.len();
        if index >= len {
            return Err(LibraryError::ChapterIndexOutOfBounds { index, len });
        }

        let candidate = ChapterCandidate::new(title, start_time, end_time);
        self.validator().check(&candidate)?;

        let chapter = &mut self.chapters[index];
        chapter.title = candidate.title;
        chapter.start_time = candidate.start_time;
        chapter.end_time = candidate.end_time;
        Ok(&*chapter)
    }

    /// Removes a chapter; neighbouring chapters keep their bounds
    pub fn remove_chapter(&mut self, index: usize) -> LibraryResult<Chapter> {
        let len = self.chapters.len();
        if index >= len {
            return Err(LibraryError::ChapterIndexOutOfBounds { index, len });
        }
        Ok(self.chapters.remove(index))
    }

    /// Title, audio source and at least one chapter
    pub fn can_save(&self) -> bool {
        self.to_book().is_valid()
    }

    /// Turns the draft into a book
    ///
    /// New drafts get a fresh id and today's date; edit drafts keep both.
    pub fn build(&self) -> LibraryResult<AudioBook> {
        let book = self.to_book();
        book.validate()
            .map_err(|problems| LibraryError::IncompleteBook {
                title: book.title.clone(),
                problems,
            })?;
        Ok(book)
    }

    fn to_book(&self) -> AudioBook {
        let mut book = AudioBook::new(
            self.title.trim(),
            self.audio_source.clone().unwrap_or_default(),
            self.total_duration,
        );
        if let Some((id, added_date)) = self.original {
            book.id = id;
            book.added_date = added_date;
        }
        book.cover_source = self.cover_source.clone();
        book.chapters = self.chapters.clone();
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_draft() -> BookDraft {
        let mut draft = BookDraft::new();
        draft.set_title("North and South");
        draft.set_audio_source("north.mp3", 600.0);
        draft
    }

    #[test]
    fn test_new_draft_cannot_save() {
        let draft = BookDraft::new();
        assert!(!draft.can_save());
        assert!(matches!(
            draft.build(),
            Err(LibraryError::IncompleteBook { .. })
        ));
    }

    #[test]
    fn test_needs_a_chapter() {
        let mut draft = ready_draft();
        assert!(!draft.can_save());

        draft.add_chapter("Opening", 0.0, 120.0).unwrap();
        assert!(draft.can_save());
    }

    #[test]
    fn test_rejected_chapter_not_added() {
        let mut draft = ready_draft();
        let result = draft.add_chapter("Backwards", 50.0, 10.0);
        assert!(matches!(
            result,
            Err(LibraryError::ChapterRejected(
                ChapterRejection::NonPositiveDuration { .. }
            ))
        ));
        assert!(draft.chapters().is_empty());
    }

    #[test]
    fn test_check_chapter_uses_duration() {
        let draft = ready_draft();
        assert!(draft.check_chapter("Fits", 0.0, 600.0).is_ok());
        assert!(matches!(
            draft.check_chapter("Too long", 0.0, 601.0),
            Err(ChapterRejection::OutOfRange { .. })
        ));
        assert_eq!(
            draft.check_chapter("  ", 0.0, 10.0),
            Err(ChapterRejection::EmptyTitle)
        );
    }

    #[test]
    fn test_chapter_ids_are_unique() {
        let mut draft = ready_draft();
        let a = draft.add_chapter("A", 0.0, 10.0).unwrap().id.clone();
        let b = draft.add_chapter("B", 10.0, 20.0).unwrap().id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn test_edit_keeps_id() {
        let mut draft = ready_draft();
        let id = draft.add_chapter("Part", 0.0, 10.0).unwrap().id.clone();

        let edited = draft.edit_chapter(0, "Part One", 0.0, 30.0).unwrap();

        assert_eq!(edited.id, id);
        assert_eq!(edited.title, "Part One");
        assert_eq!(edited.end_time, 30.0);
    }

    #[test]
    fn test_invalid_edit_leaves_chapter_alone() {
        let mut draft = ready_draft();
        draft.add_chapter("Part", 0.0, 10.0).unwrap();

        assert!(draft.edit_chapter(0, "Part", 10.0, 10.0).is_err());
        assert!(matches!(
            draft.edit_chapter(3, "Part", 0.0, 5.0),
            Err(LibraryError::ChapterIndexOutOfBounds { index: 3, len: 1 })
        ));
        assert_eq!(draft.chapters()[0].end_time, 10.0);
    }

    #[test]
    fn test_remove_does_not_repair_neighbours() {
        let mut draft = ready_draft();
        draft.add_chapter("One", 0.0, 100.0).unwrap();
        draft.add_chapter("Two", 100.0, 200.0).unwrap();
        draft.add_chapter("Three", 200.0, 300.0).unwrap();

        let removed = draft.remove_chapter(1).unwrap();

        assert_eq!(removed.title, "Two");
        assert_eq!(draft.chapters()[0].end_time, 100.0);
        assert_eq!(draft.chapters()[1].start_time, 200.0);
    }

    #[test]
    fn test_edit_draft_keeps_identity() {
        let mut draft = ready_draft();
        draft.add_chapter("One", 0.0, 100.0).unwrap();
        let original = draft.build().unwrap();

        let mut edit = BookDraft::from_book(&original);
        assert!(edit.is_edit());
        edit.set_title("North & South");
        let rebuilt = edit.build().unwrap();

        assert_eq!(rebuilt.id, original.id);
        assert_eq!(rebuilt.added_date, original.added_date);
        assert_eq!(rebuilt.title, "North & South");
    }

    #[test]
    fn test_replacing_source_refreshes_duration() {
        let mut draft = ready_draft();
        draft.add_chapter("One", 0.0, 500.0).unwrap();

        draft.set_audio_source("short.mp3", 300.0);

        assert_eq!(draft.total_duration(), 300.0);
        assert_eq!(draft.chapters().len(), 1);
        assert!(draft.add_chapter("Late", 400.0, 450.0).is_err());
    }

    #[test]
    fn test_new_drafts_get_distinct_ids() {
        let mut draft = ready_draft();
        draft.add_chapter("One", 0.0, 100.0).unwrap();
        let first = draft.build().unwrap();
        let second = draft.build().unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_cover_is_optional() {
        let mut draft = ready_draft();
        draft.add_chapter("One", 0.0, 100.0).unwrap();
        draft.set_cover_source(Some("cover.jpg".to_string()));
        assert_eq!(draft.build().unwrap().cover_source.as_deref(), Some("cover.jpg"));
    }
}
