// FILE: crates/library/src/store.rs
//! Library persistence
//!
//! The library is one JSON document. Writes go through a temporary file in
//! the same directory and an atomic rename, so a crash never leaves a
//! half-written library behind.

use crate::error::{LibraryError, LibraryResult};
use crate::library::check_chapters;
use chaptershelf_core::AudioBook;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Current library file format version
pub const LIBRARY_FORMAT_VERSION: u32 = 1;

/// Where the book list lives between runs
pub trait BookStore {
    /// Reads every stored book; an absent store yields an empty list
    fn load(&self) -> LibraryResult<Vec<AudioBook>>;

    /// Replaces the stored list with `books`
    fn save(&self, books: &[AudioBook]) -> LibraryResult<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct LibraryFile {
    version: u32,
    books: Vec<AudioBook>,
}

/// Stores the library as pretty-printed JSON at a fixed path
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> LibraryError {
        LibraryError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn corrupted(&self, reason: impl Into<String>) -> LibraryError {
        LibraryError::Corrupted {
            path: self.path.clone(),
            reason: reason.into(),
        }
    }

    /// Creates a temporary file in the same directory as the library file
    fn create_temp_file(&self) -> LibraryResult<NamedTempFile> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        if !dir.exists() {
            fs::create_dir_all(dir).map_err(|e| self.io_error(e))?;
            log::info!("Created library directory: {}", dir.display());
        }

        NamedTempFile::new_in(dir).map_err(|e| self.io_error(e))
    }
}

impl BookStore for JsonFileStore {
    fn load(&self) -> LibraryResult<Vec<AudioBook>> {
        if !self.path.exists() {
            log::info!(
                "Library file not found at {}, starting empty",
                self.path.display()
            );
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;

        // An empty file means an interrupted write elsewhere, not an empty library
        if contents.trim().is_empty() {
            return Err(self.corrupted("file is empty"));
        }

        let file: LibraryFile =
            serde_json::from_str(&contents).map_err(|e| self.corrupted(e.to_string()))?;

        if file.version > LIBRARY_FORMAT_VERSION {
            return Err(self.corrupted(format!(
                "format version {} is newer than supported version {}",
                file.version, LIBRARY_FORMAT_VERSION
            )));
        }

        for book in &file.books {
            check_chapters(book).map_err(|rejection| {
                self.corrupted(format!("book '{}' has a bad chapter: {}", book.title, rejection))
            })?;
        }

        log::debug!(
            "Loaded {} books from {}",
            file.books.len(),
            self.path.display()
        );
        Ok(file.books)
    }

    fn save(&self, books: &[AudioBook]) -> LibraryResult<()> {
        let file = LibraryFile {
            version: LIBRARY_FORMAT_VERSION,
            books: books.to_vec(),
        };
        let json = serde_json::to_string_pretty(&file).map_err(LibraryError::Serialize)?;

        let mut temp_file = self.create_temp_file()?;
        temp_file
            .write_all(json.as_bytes())
            .map_err(|e| self.io_error(e))?;
        temp_file.flush().map_err(|e| self.io_error(e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| self.io_error(e.error))?;

        log::debug!("Saved {} books to {}", books.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaptershelf_core::{Chapter, ChapterId, Timestamp};
    use tempfile::TempDir;

    fn setup_test_dir() -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let path = temp_dir.path().join("library.json");
        (temp_dir, path)
    }

    fn sample_book() -> AudioBook {
        AudioBook::new("Emma", "emma.mp3", 120.0)
            .with_cover("emma.jpg")
            .with_chapter(Chapter::new(
                ChapterId::generate(Timestamp::from_millis(9), 0),
                "Volume I",
                0.0,
                120.0,
            ))
    }

    #[test]
    fn test_missing_file_is_empty_library() {
        let (_temp_dir, path) = setup_test_dir();
        let store = JsonFileStore::new(path);
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let (_temp_dir, path) = setup_test_dir();
        let store = JsonFileStore::new(path);
        let book = sample_book();

        store.save(std::slice::from_ref(&book)).unwrap();

        assert_eq!(store.load().unwrap(), vec![book]);
    }

    #[test]
    fn test_save_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("library.json");
        let store = JsonFileStore::new(path.clone());

        store.save(&[]).unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_empty_file_is_corrupted() {
        let (_temp_dir, path) = setup_test_dir();
        fs::write(&path, "  \n").unwrap();

        let result = JsonFileStore::new(path).load();

        assert!(matches!(result, Err(LibraryError::Corrupted { .. })));
    }

    #[test]
    fn test_invalid_json_is_corrupted() {
        let (_temp_dir, path) = setup_test_dir();
        fs::write(&path, "{ not json").unwrap();

        let result = JsonFileStore::new(path).load();

        assert!(matches!(result, Err(LibraryError::Corrupted { .. })));
    }

    #[test]
    fn test_bad_chapter_is_corrupted() {
        let (_temp_dir, path) = setup_test_dir();
        let store = JsonFileStore::new(path);
        let mut book = sample_book();
        book.chapters[0].start_time = 50.0;
        book.chapters[0].end_time = 10.0;
        store.save(&[book]).unwrap();

        let result = store.load();

        assert!(matches!(
            result,
            Err(LibraryError::Corrupted { ref reason, .. }) if reason.contains("Emma")
        ));
    }

    #[test]
    fn test_newer_format_is_refused() {
        let (_temp_dir, path) = setup_test_dir();
        fs::write(&path, r#"{"version": 99, "books": []}"#).unwrap();

        let result = JsonFileStore::new(path).load();

        assert!(matches!(result, Err(LibraryError::Corrupted { .. })));
    }
}
