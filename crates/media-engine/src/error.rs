// FILE: crates/media-engine/src/error.rs

use thiserror::Error;

/// Reasons a player command was ignored
///
/// None of these abort playback. Commands report them through
/// [`CommandOutcome::Ignored`] and leave the session untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("No book is loaded")]
    NoBookLoaded,

    #[error("The loaded book has no chapters")]
    NoCurrentChapter,

    #[error("Chapter index {index} out of bounds ({len} chapters)")]
    OutOfBoundsIndex { index: usize, len: usize },

    #[error("Already at the first chapter")]
    NoPreviousChapter,

    #[error("Already at the last chapter")]
    NoNextChapter,

    #[error("Invalid volume: {0}")]
    InvalidVolume(f64),

    #[error("Invalid playback rate: {0}")]
    InvalidPlaybackRate(f64),

    #[error("Invalid seek position: {0}%")]
    InvalidSeek(f64),
}

pub type EngineResult<T> = Result<T, EngineError>;

/// What happened to a player command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    /// The command reached the transport and/or changed the session
    Applied,
    /// The command was a no-op
    Ignored(EngineError),
}

impl CommandOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied)
    }

    /// The no-op reason, if the command was ignored
    pub fn reason(&self) -> Option<&EngineError> {
        match self {
            Self::Applied => None,
            Self::Ignored(reason) => Some(reason),
        }
    }
}

impl From<EngineResult<()>> for CommandOutcome {
    fn from(result: EngineResult<()>) -> Self {
        match result {
            Ok(()) => Self::Applied,
            Err(reason) => Self::Ignored(reason),
        }
    }
}
