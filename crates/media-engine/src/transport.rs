//! Media transport abstraction
//!
//! The engine never decodes audio itself. It drives a [`MediaTransport`]
//! (a browser media element, a native player, or [`crate::SimulatedTransport`])
//! with fire-and-forget commands and learns about progress through
//! [`TransportEvent`] notifications delivered over a channel.

use crossbeam_channel::{Receiver, Sender};
use log::debug;

/// Periodic position report from the transport
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeUpdate {
    /// Absolute position in the media resource, in seconds
    pub current_time: f64,
    /// Length of the media resource; zero or NaN before metadata loads
    pub duration: f64,
}

/// Sent once the transport knows the length of the attached resource
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetadataLoaded {
    pub duration: f64,
}

/// Notifications a transport delivers to its listeners
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportEvent {
    TimeUpdate(TimeUpdate),
    MetadataLoaded(MetadataLoaded),
}

/// Handle identifying one registered listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

/// Capability object for a playable media resource
///
/// Commands return nothing; their effect is observed through later
/// notifications or the getters.
pub trait MediaTransport {
    /// Points the transport at a new resource, position 0, paused
    fn attach_source(&mut self, source: &str);

    /// Stops playback and drops the current resource
    fn release(&mut self);

    fn play(&mut self);

    fn pause(&mut self);

    /// Absolute position in seconds
    fn current_time(&self) -> f64;

    fn set_current_time(&mut self, seconds: f64);

    /// Resource length in seconds; zero or NaN until metadata loads
    fn duration(&self) -> f64;

    fn volume(&self) -> f64;

    fn set_volume(&mut self, volume: f64);

    fn playback_rate(&self) -> f64;

    fn set_playback_rate(&mut self, rate: f64);

    /// Registers a sink for time-update and metadata-loaded notifications
    fn subscribe(&mut self, sink: Sender<TransportEvent>) -> ListenerId;

    /// Removes a sink registered with [`Self::subscribe`]
    fn unsubscribe(&mut self, id: ListenerId);
}

/// Listener registry for transport implementations
///
/// Sinks whose receiving side has been dropped are pruned on the next emit.
#[derive(Debug, Default)]
pub struct Listeners {
    next_id: u64,
    sinks: Vec<(ListenerId, Sender<TransportEvent>)>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, sink: Sender<TransportEvent>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        id
    }

    /// Returns false if `id` was not registered
    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(sink_id, _)| *sink_id != id);
        self.sinks.len() != before
    }

    pub fn emit(&mut self, event: TransportEvent) {
        self.sinks.retain(|(id, sink)| {
            let delivered = sink.send(event).is_ok();
            if !delivered {
                debug!("Dropping disconnected transport listener {:?}", id);
            }
            delivered
        });
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

/// A live subscription to one transport's notifications
///
/// Created when a book is loaded and ended with [`Self::detach`] when the
/// session ends. Dropping it without detaching disconnects the channel, so the
/// transport stops delivering to it on its next emit.
#[derive(Debug)]
pub struct EventSubscription {
    id: ListenerId,
    events: Receiver<TransportEvent>,
}

impl EventSubscription {
    pub fn attach<T: MediaTransport + ?Sized>(transport: &mut T) -> Self {
        let (sink, events) = crossbeam_channel::unbounded();
        let id = transport.subscribe(sink);
        debug!("Subscribed to transport notifications as {:?}", id);
        Self { id, events }
    }

    pub fn id(&self) -> ListenerId {
        self.id
    }

    /// Takes every notification delivered so far
    pub fn drain(&self) -> Vec<TransportEvent> {
        self.events.try_iter().collect()
    }

    /// Unregisters from the transport; undelivered notifications are discarded
    pub fn detach<T: MediaTransport + ?Sized>(self, transport: &mut T) {
        transport.unsubscribe(self.id);
        debug!("Unsubscribed transport listener {:?}", self.id);
    }
}
