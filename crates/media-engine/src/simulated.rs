//! Clock-driven transport with no audio output
//!
//! Used by the command-line player and by tests. Time only moves when
//! [`SimulatedTransport::advance`] is called.

use crate::transport::{
    ListenerId, Listeners, MediaTransport, MetadataLoaded, TimeUpdate, TransportEvent,
};
use crossbeam_channel::Sender;
use log::debug;
use std::collections::HashMap;

#[derive(Debug)]
pub struct SimulatedTransport {
    known_sources: HashMap<String, f64>,
    source: Option<String>,
    position: f64,
    duration: f64,
    playing: bool,
    volume: f64,
    rate: f64,
    listeners: Listeners,
}

impl SimulatedTransport {
    pub fn new() -> Self {
        Self {
            known_sources: HashMap::new(),
            source: None,
            position: 0.0,
            duration: 0.0,
            playing: false,
            volume: 1.0,
            rate: 1.0,
            listeners: Listeners::new(),
        }
    }

    /// Declares the length a source will report once attached
    ///
    /// Sources that were never registered report a duration of zero, like a
    /// media element whose metadata has not loaded.
    pub fn register_source(&mut self, source: impl Into<String>, duration: f64) {
        self.known_sources.insert(source.into(), duration);
    }

    /// Builder form of [`Self::register_source`]
    pub fn with_source(mut self, source: impl Into<String>, duration: f64) -> Self {
        self.register_source(source, duration);
        self
    }

    /// Moves the clock forward by `elapsed` wall-clock seconds
    ///
    /// While playing, the position advances by `elapsed * playback_rate` and a
    /// time update is emitted. Reaching the end of the resource stops playback.
    pub fn advance(&mut self, elapsed: f64) {
        if !self.playing || self.source.is_none() || !(elapsed > 0.0) {
            return;
        }

        self.position += elapsed * self.rate;
        if self.duration > 0.0 && self.position >= self.duration {
            self.position = self.duration;
            self.playing = false;
            debug!("Simulated transport reached end of source");
        }

        self.emit_time_update();
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit_time_update(&mut self) {
        self.listeners.emit(TransportEvent::TimeUpdate(TimeUpdate {
            current_time: self.position,
            duration: self.duration,
        }));
    }
}

impl Default for SimulatedTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTransport for SimulatedTransport {
    fn attach_source(&mut self, source: &str) {
        self.source = Some(source.to_string());
        self.position = 0.0;
        self.playing = false;
        self.duration = self.known_sources.get(source).copied().unwrap_or(0.0);

        if self.duration > 0.0 {
            self.listeners
                .emit(TransportEvent::MetadataLoaded(MetadataLoaded {
                    duration: self.duration,
                }));
        }
    }

    fn release(&mut self) {
        self.source = None;
        self.position = 0.0;
        self.duration = 0.0;
        self.playing = false;
    }

    fn play(&mut self) {
        if self.source.is_some() {
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn current_time(&self) -> f64 {
        self.position
    }

    fn set_current_time(&mut self, seconds: f64) {
        if self.source.is_none() || !seconds.is_finite() {
            return;
        }

        self.position = if self.duration > 0.0 {
            seconds.clamp(0.0, self.duration)
        } else {
            seconds.max(0.0)
        };
        self.emit_time_update();
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn volume(&self) -> f64 {
        self.volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.volume = volume;
    }

    fn playback_rate(&self) -> f64 {
        self.rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn subscribe(&mut self, sink: Sender<TransportEvent>) -> ListenerId {
        self.listeners.add(sink)
    }

    fn unsubscribe(&mut self, id: ListenerId) {
        self.listeners.remove(id);
    }
}
