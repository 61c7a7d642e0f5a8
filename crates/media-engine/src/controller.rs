//! Chapter transition controller
//!
//! Owns the [`PlaybackSession`] and turns user commands and transport
//! notifications into transport commands. Playback never runs past the end
//! of the current chapter: every time update is checked against the chapter
//! boundary and the transport is paused when it is reached.

use crate::error::{CommandOutcome, EngineError, EngineResult};
use crate::session::{PlaybackSession, PlayerSettings, PlayerState};
use crate::tracker::{seek_target, ChapterProgress};
use crate::transport::{MediaTransport, MetadataLoaded, TimeUpdate, TransportEvent};
use crate::view::PlayerView;
use chaptershelf_core::{AudioBook, PlaybackRate, Volume};
use log::{debug, info, warn};

/// What a single transport notification did to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// No session was open
    Ignored,
    /// Session position or duration was refreshed
    Tracked,
    /// The chapter end was reached and the transport was paused
    BoundaryStop,
}

pub struct ChapterController<T: MediaTransport> {
    transport: T,
    settings: PlayerSettings,
    session: Option<PlaybackSession>,
}

impl<T: MediaTransport> ChapterController<T> {
    pub fn new(transport: T) -> Self {
        Self::with_settings(transport, PlayerSettings::default())
    }

    pub fn with_settings(transport: T, settings: PlayerSettings) -> Self {
        Self {
            transport,
            settings,
            session: None,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Mutable access for driving the transport, e.g. advancing a simulated clock
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn settings(&self) -> PlayerSettings {
        self.settings
    }

    pub fn session(&self) -> Option<&PlaybackSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> PlayerState {
        self.session
            .as_ref()
            .map_or(PlayerState::Idle, PlaybackSession::state)
    }

    /// Chapter-relative progress; all zeros when idle
    pub fn progress(&self) -> ChapterProgress {
        match &self.session {
            Some(session) => session.progress(),
            None => ChapterProgress::compute(0.0, None),
        }
    }

    /// Derived display values, `None` when idle
    pub fn view(&self) -> Option<PlayerView> {
        self.session.as_ref().map(PlayerView::from_session)
    }

    /// Opens `book` in a fresh session on the first chapter
    ///
    /// Any previous session is torn down first so two sources never play at
    /// once. The transport position is not moved.
    pub fn load_book(&mut self, book: &AudioBook) -> CommandOutcome {
        if let Some(previous) = self.session.take() {
            previous.end(&mut self.transport);
        }

        let session = PlaybackSession::start(&mut self.transport, book, self.settings);
        info!(
            "Loaded '{}' ({} chapters)",
            book.title,
            session.chapters().len()
        );
        self.session = Some(session);
        CommandOutcome::Applied
    }

    /// Ends the session and releases the transport
    pub fn close(&mut self) -> CommandOutcome {
        let result = self.session.take().ok_or(EngineError::NoBookLoaded).map(|session| {
            info!("Closing player for '{}'", session.title());
            session.end(&mut self.transport);
        });
        self.outcome("close", result)
    }

    /// Pauses when playing; otherwise plays from inside the current chapter
    ///
    /// A transport position outside `[start, end)` of the current chapter is
    /// moved to the chapter start before play is issued.
    pub fn toggle_play_pause(&mut self) -> CommandOutcome {
        self.pump();
        let result = self.try_toggle_play_pause();
        self.outcome("toggle play/pause", result)
    }

    /// Jumps to `percent` (0 - 100) of the current chapter without changing play state
    pub fn seek(&mut self, percent: f64) -> CommandOutcome {
        self.pump();
        let result = self.try_seek(percent);
        self.outcome("seek", result)
    }

    /// Makes `index` the current chapter, seeks to its start and plays
    pub fn select_chapter(&mut self, index: usize) -> CommandOutcome {
        self.pump();
        let result = self.try_select_chapter(index);
        self.outcome("select chapter", result)
    }

    pub fn skip_forward(&mut self) -> CommandOutcome {
        self.pump();
        let result = self.session_ref().and_then(|session| {
            if session.chapters().is_empty() {
                return Err(EngineError::NoCurrentChapter);
            }
            session.chapters().next_index().ok_or(EngineError::NoNextChapter)
        });
        let result = result.and_then(|index| self.try_select_chapter(index));
        self.outcome("skip forward", result)
    }

    pub fn skip_backward(&mut self) -> CommandOutcome {
        self.pump();
        let result = self.session_ref().and_then(|session| {
            if session.chapters().is_empty() {
                return Err(EngineError::NoCurrentChapter);
            }
            session
                .chapters()
                .previous_index()
                .ok_or(EngineError::NoPreviousChapter)
        });
        let result = result.and_then(|index| self.try_select_chapter(index));
        self.outcome("skip backward", result)
    }

    /// Sets output volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f64) -> CommandOutcome {
        let result = self.try_set_volume(volume);
        self.outcome("set volume", result)
    }

    /// Sets the playback speed multiplier
    pub fn set_playback_rate(&mut self, rate: f64) -> CommandOutcome {
        let result = self.try_set_playback_rate(rate);
        self.outcome("set playback rate", result)
    }

    /// Applies every notification the transport delivered since the last call
    ///
    /// Returns the number of boundary stops that happened.
    pub fn pump(&mut self) -> usize {
        let events = match &self.session {
            Some(session) => session.subscription().drain(),
            None => return 0,
        };

        events
            .into_iter()
            .map(|event| match event {
                TransportEvent::TimeUpdate(update) => self.on_time_update(update),
                TransportEvent::MetadataLoaded(loaded) => self.on_metadata_loaded(loaded),
            })
            .filter(|outcome| *outcome == TickOutcome::BoundaryStop)
            .count()
    }

    /// Tracks a time update and enforces the chapter boundary
    ///
    /// The pause is issued only while playing, so a run of updates past the
    /// end produces exactly one stop.
    pub fn on_time_update(&mut self, update: TimeUpdate) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };

        if update.current_time.is_finite() {
            session.absolute_time = update.current_time;
        }
        if update.duration.is_finite() && update.duration > 0.0 {
            session.duration = update.duration;
        }

        let end_time = match session.current_chapter() {
            Some(chapter) => chapter.end_time,
            None => return TickOutcome::Tracked,
        };

        if session.is_playing && update.current_time >= end_time {
            self.transport.pause();
            session.is_playing = false;
            debug!(
                "Reached end of chapter {} at {:.2}s",
                session.current_chapter_index() + 1,
                update.current_time
            );
            return TickOutcome::BoundaryStop;
        }

        TickOutcome::Tracked
    }

    /// Refreshes the session duration
    pub fn on_metadata_loaded(&mut self, loaded: MetadataLoaded) -> TickOutcome {
        let Some(session) = self.session.as_mut() else {
            return TickOutcome::Ignored;
        };

        if loaded.duration.is_finite() && loaded.duration > 0.0 {
            session.duration = loaded.duration;
        }
        TickOutcome::Tracked
    }

    fn try_toggle_play_pause(&mut self) -> EngineResult<()> {
        let session = self.session.as_mut().ok_or(EngineError::NoBookLoaded)?;

        if session.is_playing {
            self.transport.pause();
            session.is_playing = false;
            debug!("Paused at {:.2}s", session.absolute_time);
            return Ok(());
        }

        let chapter = session.current_chapter().ok_or(EngineError::NoCurrentChapter)?;
        let position = self.transport.current_time();
        if !chapter.contains(position) {
            let start_time = chapter.start_time;
            debug!(
                "Position {:.2}s outside '{}', restarting chapter at {:.2}s",
                position, chapter.title, start_time
            );
            self.transport.set_current_time(start_time);
            session.absolute_time = start_time;
        }

        self.transport.play();
        session.is_playing = true;
        Ok(())
    }

    fn try_seek(&mut self, percent: f64) -> EngineResult<()> {
        let session = self.session.as_mut().ok_or(EngineError::NoBookLoaded)?;
        let chapter = session.current_chapter().ok_or(EngineError::NoCurrentChapter)?;
        if percent.is_nan() {
            return Err(EngineError::InvalidSeek(percent));
        }

        let target = seek_target(percent.clamp(0.0, 100.0), chapter);
        self.transport.set_current_time(target);
        session.absolute_time = target;
        debug!("Seeked to {:.2}s", target);
        Ok(())
    }

    fn try_select_chapter(&mut self, index: usize) -> EngineResult<()> {
        let session = self.session.as_mut().ok_or(EngineError::NoBookLoaded)?;
        let len = session.chapters().len();
        let start_time = session
            .chapters_mut()
            .select(index)
            .ok_or(EngineError::OutOfBoundsIndex { index, len })?;

        self.transport.set_current_time(start_time);
        self.transport.play();
        session.absolute_time = start_time;
        session.is_playing = true;
        debug!("Playing chapter {} from {:.2}s", index + 1, start_time);
        Ok(())
    }

    fn try_set_volume(&mut self, value: f64) -> EngineResult<()> {
        let session = self.session.as_mut().ok_or(EngineError::NoBookLoaded)?;
        let volume = Volume::new(value).map_err(|reason| {
            warn!("{}", reason);
            EngineError::InvalidVolume(value)
        })?;

        self.transport.set_volume(volume.value());
        session.volume = volume;
        Ok(())
    }

    fn try_set_playback_rate(&mut self, value: f64) -> EngineResult<()> {
        let session = self.session.as_mut().ok_or(EngineError::NoBookLoaded)?;
        let rate = PlaybackRate::new(value).map_err(|reason| {
            warn!("{}", reason);
            EngineError::InvalidPlaybackRate(value)
        })?;

        self.transport.set_playback_rate(rate.value());
        session.playback_rate = rate;
        Ok(())
    }

    fn session_ref(&self) -> EngineResult<&PlaybackSession> {
        self.session.as_ref().ok_or(EngineError::NoBookLoaded)
    }

    fn outcome(&self, command: &str, result: EngineResult<()>) -> CommandOutcome {
        if let Err(reason) = &result {
            debug!("Ignored {}: {}", command, reason);
        }
        result.into()
    }
}
