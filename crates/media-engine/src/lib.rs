//! Media Engine - Chapter-bounded playback for ChapterShelf
//!
//! The engine drives an external [`MediaTransport`] and keeps playback inside
//! the current chapter of the loaded book.

mod chapters;
mod controller;
mod error;
mod session;
mod simulated;
mod tracker;
mod transport;
mod view;

pub use chapters::ChapterList;
pub use controller::{ChapterController, TickOutcome};
pub use error::{CommandOutcome, EngineError, EngineResult};
pub use session::{PlaybackSession, PlayerSettings, PlayerState};
pub use simulated::SimulatedTransport;
pub use tracker::{chapter_progress_percent, chapter_relative_time, seek_target, ChapterProgress};
pub use transport::{
    EventSubscription, ListenerId, Listeners, MediaTransport, MetadataLoaded, TimeUpdate,
    TransportEvent,
};
pub use view::{ChapterRow, PlayerView};
pub use chaptershelf_core::format_time;
