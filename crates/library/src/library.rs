// FILE: crates/library/src/library.rs
//! The in-memory book list

use crate::error::{LibraryError, LibraryResult};
use chaptershelf_core::{
    AudioBook, BookId, BookSummary, ChapterCandidate, ChapterRejection, ChapterValidator, Validator,
};
use log::{debug, info};

/// Books in the order they were added
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    books: Vec<AudioBook>,
    require_cover: bool,
}

impl Library {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a library from stored books without re-checking them
    pub fn from_books(books: Vec<AudioBook>) -> Self {
        Self {
            books,
            require_cover: false,
        }
    }

    /// Makes a cover image mandatory for books added or updated from now on
    pub fn with_cover_required(mut self, required: bool) -> Self {
        self.require_cover = required;
        self
    }

    pub fn books(&self) -> &[AudioBook] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn get(&self, id: BookId) -> Option<&AudioBook> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Finds a book by full id or by a unique id prefix
    pub fn find(&self, query: &str) -> LibraryResult<&AudioBook> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Err(LibraryError::BookNotFound(query));
        }

        let mut matches = self
            .books
            .iter()
            .filter(|book| book.id.as_string().starts_with(&query));

        match (matches.next(), matches.count()) {
            (Some(book), 0) => Ok(book),
            (Some(_), others) => Err(LibraryError::AmbiguousId {
                query,
                matches: others + 1,
            }),
            (None, _) => Err(LibraryError::BookNotFound(query)),
        }
    }

    /// Appends a complete book
    pub fn add(&mut self, book: AudioBook) -> LibraryResult<()> {
        self.check_complete(&book)?;
        if self.get(book.id).is_some() {
            return Err(LibraryError::DuplicateBook(book.id));
        }

        info!("Added '{}' to library", book.title);
        self.books.push(book);
        Ok(())
    }

    /// Replaces the book with the same id, keeping its position
    pub fn update(&mut self, book: AudioBook) -> LibraryResult<()> {
        self.check_complete(&book)?;
        let slot = self
            .books
            .iter_mut()
            .find(|existing| existing.id == book.id)
            .ok_or_else(|| LibraryError::BookNotFound(book.id.to_string()))?;

        debug!("Updated '{}'", book.title);
        *slot = book;
        Ok(())
    }

    pub fn remove(&mut self, id: BookId) -> LibraryResult<AudioBook> {
        let index = self
            .books
            .iter()
            .position(|book| book.id == id)
            .ok_or_else(|| LibraryError::BookNotFound(id.to_string()))?;

        let book = self.books.remove(index);
        info!("Removed '{}' from library", book.title);
        Ok(book)
    }

    /// Card-view records for every book
    pub fn summaries(&self) -> Vec<BookSummary> {
        self.books.iter().map(AudioBook::summary).collect()
    }

    /// Sum of every book's length in seconds
    pub fn total_duration(&self) -> f64 {
        self.books.iter().map(|book| book.total_duration).sum()
    }

    fn check_complete(&self, book: &AudioBook) -> LibraryResult<()> {
        check_chapters(book)?;

        let mut problems = match book.validate() {
            Ok(()) => Vec::new(),
            Err(problems) => problems,
        };
        if self.require_cover && book.cover_source.is_none() {
            problems.push("Cover image is required".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::IncompleteBook {
                title: book.title.clone(),
                problems,
            })
        }
    }
}

/// Runs every chapter of `book` back through the chapter rules
pub(crate) fn check_chapters(book: &AudioBook) -> Result<(), ChapterRejection> {
    let validator = ChapterValidator::new(book.total_duration);
    book.chapters.iter().try_for_each(|chapter| {
        validator.check(&ChapterCandidate::new(
            chapter.title.as_str(),
            chapter.start_time,
            chapter.end_time,
        ))
    })
}
