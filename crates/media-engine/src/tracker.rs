//! Chapter-relative playback position
//!
//! Pure functions of the transport's absolute time and the current chapter.
//! Nothing here holds state; the controller calls in on every notification.

use chaptershelf_core::{format_time, Chapter};
use serde::Serialize;

/// Seconds elapsed since the chapter started, never negative
///
/// Zero when there is no chapter or the time is not a number.
pub fn chapter_relative_time(absolute_time: f64, chapter: Option<&Chapter>) -> f64 {
    match chapter {
        Some(chapter) => (absolute_time - chapter.start_time).max(0.0),
        None => 0.0,
    }
}

/// Progress through the chapter as a percentage clamped to 0 - 100
pub fn chapter_progress_percent(absolute_time: f64, chapter: Option<&Chapter>) -> f64 {
    let Some(chapter) = chapter else {
        return 0.0;
    };

    let length = chapter.duration();
    if !(length.is_finite() && length > 0.0) {
        return 0.0;
    }

    let relative = chapter_relative_time(absolute_time, Some(chapter));
    (relative / length * 100.0).clamp(0.0, 100.0)
}

/// Maps a 0 - 100 slider position onto the chapter's absolute timeline
pub fn seek_target(percent: f64, chapter: &Chapter) -> f64 {
    chapter.start_time + percent / 100.0 * chapter.duration()
}

/// Derived display values for the current chapter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterProgress {
    pub relative_time: f64,
    pub percent: f64,
    /// Elapsed time within the chapter, `M:SS`
    pub elapsed: String,
    /// Chapter length, `M:SS`
    pub total: String,
}

impl ChapterProgress {
    pub fn compute(absolute_time: f64, chapter: Option<&Chapter>) -> Self {
        let relative_time = chapter_relative_time(absolute_time, chapter);
        Self {
            relative_time,
            percent: chapter_progress_percent(absolute_time, chapter),
            elapsed: format_time(relative_time),
            total: format_time(chapter.map_or(0.0, Chapter::duration)),
        }
    }
}
