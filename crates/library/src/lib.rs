//! ChapterShelf Library Management
//!
//! The book list the player reads from: add/edit drafts, the in-memory
//! library and its JSON file store.

pub mod draft;
pub mod error;
pub mod library;
pub mod manager;
pub mod store;

pub use draft::BookDraft;
pub use error::{LibraryError, LibraryResult};
pub use library::Library;
pub use manager::LibraryManager;
pub use store::{BookStore, JsonFileStore, LIBRARY_FORMAT_VERSION};
