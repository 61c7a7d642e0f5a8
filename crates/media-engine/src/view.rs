//! Display values derived from a playback session

use crate::session::PlaybackSession;
use chaptershelf_core::PlaybackRate;
use serde::Serialize;

/// One row of the chapter list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterRow {
    pub index: usize,
    pub title: String,
    /// Chapter length, `M:SS`
    pub length: String,
    pub is_current: bool,
}

/// Everything the player surface renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub book_title: String,
    pub chapter_title: Option<String>,
    pub chapter_index: usize,
    pub chapter_position: String,
    pub elapsed: String,
    pub total: String,
    pub progress_percent: f64,
    pub can_skip_backward: bool,
    pub can_skip_forward: bool,
    pub is_playing: bool,
    /// 0 - 100 slider position
    pub volume_percent: u8,
    pub playback_rate: f64,
    /// Index into [`PlaybackRate::PRESETS`] of the highlighted speed button
    pub speed_preset: Option<usize>,
    pub chapters: Vec<ChapterRow>,
}

impl PlayerView {
    pub fn from_session(session: &PlaybackSession) -> Self {
        let chapters = session.chapters();
        let progress = session.progress();
        let current = chapters.current_index();

        Self {
            book_title: session.title().to_string(),
            chapter_title: session.current_chapter().map(|c| c.title.clone()),
            chapter_index: current,
            chapter_position: chapters.position_label(),
            elapsed: progress.elapsed,
            total: progress.total,
            progress_percent: progress.percent,
            can_skip_backward: chapters.has_previous(),
            can_skip_forward: chapters.has_next(),
            is_playing: session.is_playing(),
            volume_percent: session.volume().as_percent(),
            playback_rate: session.playback_rate().value(),
            speed_preset: session.playback_rate().preset_index(),
            chapters: chapters
                .chapters()
                .iter()
                .enumerate()
                .map(|(index, chapter)| ChapterRow {
                    index,
                    title: chapter.title.clone(),
                    length: chapter.formatted_duration(),
                    is_current: index == current,
                })
                .collect(),
        }
    }

    /// Speed buttons as `(label, highlighted)` pairs
    pub fn speed_buttons(&self) -> Vec<(String, bool)> {
        PlaybackRate::PRESETS
            .iter()
            .enumerate()
            .map(|(i, rate)| (format!("{}x", rate), self.speed_preset == Some(i)))
            .collect()
    }
}
