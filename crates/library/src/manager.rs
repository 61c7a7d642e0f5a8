// FILE: crates/library/src/manager.rs
//! Library plus its store
//!
//! Every change is applied to a copy of the library and written through
//! before it becomes visible, so memory and disk never disagree.

use crate::draft::BookDraft;
use crate::error::LibraryResult;
use crate::library::Library;
use crate::store::{BookStore, JsonFileStore};
use chaptershelf_core::{AudioBook, BookId};
use log::{info, warn};
use std::path::Path;

/// Library plus its store; every change is written through
pub struct LibraryManager<S: BookStore = JsonFileStore> {
    library: Library,
    store: S,
}

impl LibraryManager<JsonFileStore> {
    /// Opens the JSON library at `path`, creating nothing until the first save
    pub fn open(path: impl AsRef<Path>) -> LibraryResult<Self> {
        Self::with_store(JsonFileStore::new(path.as_ref()))
    }
}

impl<S: BookStore> LibraryManager<S> {
    /// Loads every book from `store`
    pub fn with_store(store: S) -> LibraryResult<Self> {
        let library = Library::from_books(store.load()?);
        info!("Library opened with {} books", library.len());
        Ok(Self { library, store })
    }

    /// Makes a cover image mandatory for new and updated books
    pub fn require_cover(mut self, required: bool) -> Self {
        self.library = self.library.with_cover_required(required);
        self
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn books(&self) -> &[AudioBook] {
        self.library.books()
    }

    pub fn get_book(&self, id: BookId) -> Option<&AudioBook> {
        self.library.get(id)
    }

    /// Looks a book up by full id or unique id prefix
    pub fn find_book(&self, query: &str) -> LibraryResult<&AudioBook> {
        self.library.find(query)
    }

    pub fn add_book(&mut self, book: AudioBook) -> LibraryResult<BookId> {
        let id = book.id;
        self.commit(|library| library.add(book))?;
        Ok(id)
    }

    pub fn update_book(&mut self, book: AudioBook) -> LibraryResult<()> {
        self.commit(|library| library.update(book))
    }

    pub fn delete_book(&mut self, id: BookId) -> LibraryResult<AudioBook> {
        self.commit(|library| library.remove(id))
    }

    /// Saves an add or edit dialog: edit drafts update, new drafts add
    pub fn save_draft(&mut self, draft: &BookDraft) -> LibraryResult<BookId> {
        let book = draft.build()?;
        let id = book.id;
        if draft.is_edit() {
            self.update_book(book)?;
        } else {
            self.add_book(book)?;
        }
        Ok(id)
    }

    /// Applies `change` to a copy, saves it, then swaps it in
    fn commit<T>(
        &mut self,
        change: impl FnOnce(&mut Library) -> LibraryResult<T>,
    ) -> LibraryResult<T> {
        let mut next = self.library.clone();
        let value = change(&mut next)?;

        if let Err(e) = self.store.save(next.books()) {
            warn!("Library not saved, keeping previous state: {}", e);
            return Err(e);
        }

        self.library = next;
        Ok(value)
    }
}
