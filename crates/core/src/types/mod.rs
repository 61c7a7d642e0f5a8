//! Domain types for ChapterShelf
//!
//! - `book`: AudioBook and Chapter types
//! - `playback`: Volume and playback rate values
//! - `common`: Timestamps, time formatting and the `Validator` trait

mod book;
mod common;
mod playback;

pub use book::{AudioBook, BookId, BookSummary, Chapter, ChapterId};
pub use common::{format_time, Timestamp, Validator};
pub use playback::{PlaybackRate, Volume};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_types_are_exported() {
        let _book_id: BookId = BookId::new();
        let _chapter_id: ChapterId = ChapterId::generate(Timestamp::now(), 0);
        let _volume = Volume::default();
        let _rate = PlaybackRate::default();
    }

    #[test]
    fn test_book_round_trips_through_json() {
        let book = AudioBook::new("Dune", "file:///dune.mp3", 90.0).with_chapter(Chapter::new(
            ChapterId::generate(Timestamp::from_millis(5), 0),
            "Intro",
            0.0,
            30.0,
        ));

        let json = serde_json::to_string(&book).unwrap();
        let back: AudioBook = serde_json::from_str(&json).unwrap();
        assert_eq!(back, book);
    }
}
