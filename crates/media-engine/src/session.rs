//! Playback session state

use crate::chapters::ChapterList;
use crate::tracker::ChapterProgress;
use crate::transport::{EventSubscription, MediaTransport};
use chaptershelf_core::{AudioBook, BookId, Chapter, PlaybackRate, Volume};
use log::debug;

/// Where the controller is in its state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    /// No book loaded
    Idle,
    /// Book loaded and paused
    Ready,
    /// Book loaded and the transport is advancing
    Playing,
}

/// Defaults applied to the transport whenever a book is loaded
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerSettings {
    pub volume: Volume,
    pub playback_rate: PlaybackRate,
}

/// Ephemeral state for one open player and one book
///
/// Owns the transport subscription, so notifications stop arriving once the
/// session is ended with [`PlaybackSession::end`] or dropped.
#[derive(Debug)]
pub struct PlaybackSession {
    book_id: BookId,
    title: String,
    chapters: ChapterList,
    pub(crate) is_playing: bool,
    pub(crate) absolute_time: f64,
    pub(crate) duration: f64,
    pub(crate) volume: Volume,
    pub(crate) playback_rate: PlaybackRate,
    subscription: EventSubscription,
}

impl PlaybackSession {
    /// Attaches `book` to the transport and applies the player defaults
    ///
    /// The subscription is taken before the source is attached so the
    /// metadata notification for the new source is not missed. Position is
    /// left wherever the transport puts a fresh source.
    pub fn start<T: MediaTransport + ?Sized>(
        transport: &mut T,
        book: &AudioBook,
        settings: PlayerSettings,
    ) -> Self {
        let subscription = EventSubscription::attach(transport);
        transport.attach_source(&book.audio_source);
        transport.set_volume(settings.volume.value());
        transport.set_playback_rate(settings.playback_rate.value());

        let reported = transport.duration();
        let duration = if reported.is_finite() && reported > 0.0 {
            reported
        } else {
            book.total_duration
        };

        Self {
            book_id: book.id,
            title: book.title.clone(),
            chapters: ChapterList::new(book.chapters.clone()),
            is_playing: false,
            absolute_time: transport.current_time(),
            duration,
            volume: settings.volume,
            playback_rate: settings.playback_rate,
            subscription,
        }
    }

    /// Stops playback, unsubscribes and releases the source
    pub fn end<T: MediaTransport + ?Sized>(self, transport: &mut T) {
        transport.pause();
        self.subscription.detach(transport);
        transport.release();
        debug!("Ended playback session for '{}'", self.title);
    }

    pub fn book_id(&self) -> BookId {
        self.book_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn chapters(&self) -> &ChapterList {
        &self.chapters
    }

    pub(crate) fn chapters_mut(&mut self) -> &mut ChapterList {
        &mut self.chapters
    }

    pub fn current_chapter(&self) -> Option<&Chapter> {
        self.chapters.current()
    }

    pub fn current_chapter_index(&self) -> usize {
        self.chapters.current_index()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Mirrors the transport's last reported position
    pub fn absolute_time(&self) -> f64 {
        self.absolute_time
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn volume(&self) -> Volume {
        self.volume
    }

    pub fn playback_rate(&self) -> PlaybackRate {
        self.playback_rate
    }

    pub fn state(&self) -> PlayerState {
        if self.is_playing {
            PlayerState::Playing
        } else {
            PlayerState::Ready
        }
    }

    pub fn progress(&self) -> ChapterProgress {
        ChapterProgress::compute(self.absolute_time, self.current_chapter())
    }

    pub(crate) fn subscription(&self) -> &EventSubscription {
        &self.subscription
    }
}
