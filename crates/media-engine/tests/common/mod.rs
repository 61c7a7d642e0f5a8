//! Shared fixtures for media-engine integration tests

#![allow(dead_code)]

use chaptershelf_core::{AudioBook, Chapter, ChapterId, Timestamp};
use chaptershelf_media_engine::{
    ListenerId, Listeners, MediaTransport, MetadataLoaded, TimeUpdate, TransportEvent,
};
use crossbeam_channel::Sender;

/// A command the controller issued to the transport
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Attach(String),
    Release,
    Play,
    Pause,
    Seek(f64),
    SetVolume(f64),
    SetRate(f64),
    Subscribe,
    Unsubscribe,
}

/// Transport double that records every command and emits on demand
#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub commands: Vec<Command>,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub rate: f64,
    listeners: Listeners,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self {
            volume: 1.0,
            rate: 1.0,
            ..Self::default()
        }
    }

    /// Delivers a time update at `current_time` to every listener
    pub fn emit_time(&mut self, current_time: f64) {
        self.current_time = current_time;
        self.listeners.emit(TransportEvent::TimeUpdate(TimeUpdate {
            current_time,
            duration: self.duration,
        }));
    }

    pub fn emit_metadata(&mut self, duration: f64) {
        self.duration = duration;
        self.listeners
            .emit(TransportEvent::MetadataLoaded(MetadataLoaded { duration }));
    }

    pub fn count(&self, command: &Command) -> usize {
        self.commands.iter().filter(|c| *c == command).count()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }
}

impl MediaTransport for RecordingTransport {
    fn attach_source(&mut self, source: &str) {
        self.commands.push(Command::Attach(source.to_string()));
        self.current_time = 0.0;
    }

    fn release(&mut self) {
        self.commands.push(Command::Release);
    }

    fn play(&mut self) {
        self.commands.push(Command::Play);
    }

    fn pause(&mut self) {
        self.commands.push(Command::Pause);
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, seconds: f64) {
        self.commands.push(Command::Seek(seconds));
        self.current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.commands.push(Command::SetVolume(volume));
        self.volume = volume;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.commands.push(Command::SetRate(rate));
        self.rate = rate;
    }

    fn subscribe(&mut self, sink: Sender<TransportEvent>) -> ListenerId {
        self.commands.push(Command::Subscribe);
        self.listeners.add(sink)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.commands.push(Command::Unsubscribe);
        self.listeners.remove(id);
    }
}

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn chapter(index: usize, title: &str, start: f64, end: f64) -> Chapter {
    Chapter::new(
        ChapterId::generate(Timestamp::from_millis(1_700_000_000_000), index),
        title,
        start,
        end,
    )
}

/// Intro 0-30, Body 30-90
pub fn two_chapter_book() -> AudioBook {
    AudioBook::new("Middlemarch", "middlemarch.mp3", 90.0)
        .with_chapter(chapter(0, "Intro", 0.0, 30.0))
        .with_chapter(chapter(1, "Body", 30.0, 90.0))
}

/// A single chapter spanning 10-20 of a 60 second file
pub fn bounded_book() -> AudioBook {
    AudioBook::new("Short Story", "short.mp3", 60.0).with_chapter(chapter(0, "Middle", 10.0, 20.0))
}
