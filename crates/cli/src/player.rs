//! `play`: one chapter on the simulated transport, stopped at the chapter end

use crate::commands::{chapter_index, library_error, open_library};
use crate::CliContext;
use anyhow::{anyhow, bail, Result};
use chaptershelf_config::PlayerConfig;
use chaptershelf_core::{AudioBook, PlaybackRate, Volume};
use chaptershelf_media_engine::{
    ChapterController, CommandOutcome, PlayerSettings, PlayerView, SimulatedTransport,
};
use clap::ArgMatches;
use console::{style, Term};
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct PlayOptions {
    pub query: String,
    /// 1-based chapter number
    pub chapter: Option<usize>,
    pub speed: Option<f64>,
    /// 0-100
    pub volume: Option<u8>,
    /// Simulated seconds per wall-clock second
    pub warp: f64,
    pub json: bool,
}

impl PlayOptions {
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        let query = matches
            .get_one::<String>("id")
            .ok_or_else(|| anyhow!("Book ID is required"))?
            .clone();
        let warp = matches.get_one::<f64>("warp").copied().unwrap_or(1.0);
        if !warp.is_finite() || warp <= 0.0 {
            bail!("--warp must be a positive number, got {}", warp);
        }

        Ok(Self {
            query,
            chapter: matches.get_one::<usize>("chapter").copied(),
            speed: matches.get_one::<f64>("speed").copied(),
            volume: matches.get_one::<u8>("volume").copied(),
            warp,
            json: matches.get_flag("json"),
        })
    }
}

/// Session defaults from the `[player]` config section
pub fn settings_from_config(config: &PlayerConfig) -> PlayerSettings {
    let playback_rate = PlaybackRate::new(config.default_speed).unwrap_or_else(|e| {
        log::warn!("Ignoring player.default_speed: {}", e);
        PlaybackRate::default()
    });

    PlayerSettings {
        volume: Volume::from_percent(config.default_volume),
        playback_rate,
    }
}

/// Play an audiobook chapter
pub async fn play_book(ctx: &CliContext, options: PlayOptions) -> Result<()> {
    let manager = open_library(ctx)?;
    let book = manager
        .find_book(&options.query)
        .map_err(library_error)?
        .clone();

    let term = Term::stdout();
    let _ = term.hide_cursor();

    println!("\n{} {}", style("▶").green().bold(), style(&book.title).bold());

    let tick = Duration::from_millis(ctx.config.player.tick_interval_ms);
    let settings = settings_from_config(&ctx.config.player);
    let result = run_chapter(&book, settings, &options, tick, |view| {
        term.clear_line()?;
        term.write_str(&status_line(view))?;
        Ok(())
    })
    .await;

    let _ = term.show_cursor();
    println!();
    let view = result?;

    if view.is_playing {
        println!("Stopped.");
    } else {
        println!(
            "{} End of chapter {}",
            style("■").cyan().bold(),
            view.chapter_title.as_deref().unwrap_or("")
        );
    }

    if options.json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    }

    Ok(())
}

/// Drives a controller over a simulated transport until the chapter boundary stop
///
/// `render` is called after every tick. Returns the last view before the
/// player is closed.
pub async fn run_chapter<F>(
    book: &AudioBook,
    settings: PlayerSettings,
    options: &PlayOptions,
    tick: Duration,
    mut render: F,
) -> Result<PlayerView>
where
    F: FnMut(&PlayerView) -> Result<()>,
{
    let transport =
        SimulatedTransport::new().with_source(book.audio_source.as_str(), book.total_duration);
    let mut controller = ChapterController::with_settings(transport, settings);
    controller.load_book(book);

    if let Some(number) = options.chapter {
        let index = chapter_index(number, book.chapters.len())?;
        require_applied("select chapter", controller.select_chapter(index))?;
    }
    if let Some(volume) = options.volume {
        warn_if_ignored("volume", controller.set_volume(f64::from(volume) / 100.0));
    }
    if let Some(speed) = options.speed {
        warn_if_ignored("speed", controller.set_playback_rate(speed));
    }
    require_applied("play", controller.toggle_play_pause())?;

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut last = tokio::time::Instant::now();

    loop {
        tokio::select! {
            now = ticker.tick() => {
                let elapsed = now.saturating_duration_since(last).as_secs_f64() * options.warp;
                last = now;

                controller.transport_mut().advance(elapsed);
                let boundary_stops = controller.pump();

                if let Some(view) = controller.view() {
                    render(&view)?;
                }
                if boundary_stops > 0 || !controller.transport().is_playing() {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                log::info!("Interrupted, pausing playback");
                warn_if_ignored("pause", controller.toggle_play_pause());
                break;
            }
        }
    }

    let view = controller
        .view()
        .ok_or_else(|| anyhow!("Player closed before playback finished"))?;
    controller.close();
    Ok(view)
}

fn require_applied(command: &str, outcome: CommandOutcome) -> Result<()> {
    match outcome.reason() {
        None => Ok(()),
        Some(reason) => bail!("Cannot {}: {}", command, reason),
    }
}

fn warn_if_ignored(command: &str, outcome: CommandOutcome) {
    if let Some(reason) = outcome.reason() {
        eprintln!("{} {} ignored: {}", style("Warning:").yellow(), command, reason);
    }
}

/// `▶ 2/3 Body  0:12 / 1:00 [######........] 20%  1.25x  vol 80%`
pub fn status_line(view: &PlayerView) -> String {
    let filled = ((view.progress_percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);

    format!(
        "{} {} {}  {} / {} [{}{}] {:>3.0}%  {}x  vol {}%",
        if view.is_playing { "▶" } else { "⏸" },
        view.chapter_position,
        view.chapter_title.as_deref().unwrap_or("-"),
        view.elapsed,
        view.total,
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        view.progress_percent,
        view.playback_rate,
        view.volume_percent
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chaptershelf_core::{Chapter, ChapterId, Timestamp};

    const FAST_TICK: Duration = Duration::from_millis(16);

    fn short_book() -> AudioBook {
        let at = Timestamp::from_millis(1);
        AudioBook::new("Cranford", "cranford.mp3", 2.0)
            .with_chapter(Chapter::new(ChapterId::generate(at, 0), "Our Society", 0.0, 1.0))
            .with_chapter(Chapter::new(ChapterId::generate(at, 1), "The Captain", 1.0, 2.0))
    }

    fn options() -> PlayOptions {
        PlayOptions {
            query: String::new(),
            chapter: None,
            speed: None,
            volume: None,
            warp: 40.0,
            json: false,
        }
    }

    #[tokio::test]
    async fn test_plays_first_chapter_until_boundary() {
        let mut frames = 0;
        let view = run_chapter(
            &short_book(),
            PlayerSettings::default(),
            &options(),
            FAST_TICK,
            |_| {
                frames += 1;
                Ok(())
            },
        )
        .await
        .unwrap();

        assert!(frames > 0);
        assert!(!view.is_playing);
        assert_eq!(view.chapter_index, 0);
        assert_eq!(view.chapter_title.as_deref(), Some("Our Society"));
    }

    #[tokio::test]
    async fn test_selected_chapter_and_overrides() {
        let opts = PlayOptions {
            chapter: Some(2),
            speed: Some(2.0),
            volume: Some(40),
            ..options()
        };

        let view = run_chapter(&short_book(), PlayerSettings::default(), &opts, FAST_TICK, |_| Ok(()))
            .await
            .unwrap();

        assert_eq!(view.chapter_index, 1);
        assert_eq!(view.chapter_title.as_deref(), Some("The Captain"));
        assert_eq!(view.playback_rate, 2.0);
        assert_eq!(view.volume_percent, 40);
        assert!(!view.can_skip_forward);
    }

    #[tokio::test]
    async fn test_invalid_overrides_are_ignored() {
        let opts = PlayOptions {
            speed: Some(0.0),
            volume: Some(200),
            ..options()
        };

        let view = run_chapter(&short_book(), PlayerSettings::default(), &opts, FAST_TICK, |_| Ok(()))
            .await
            .unwrap();

        assert_eq!(view.playback_rate, 1.0);
        assert_eq!(view.volume_percent, 100);
    }

    #[tokio::test]
    async fn test_missing_chapter_is_an_error() {
        let opts = PlayOptions {
            chapter: Some(3),
            ..options()
        };

        let result =
            run_chapter(&short_book(), PlayerSettings::default(), &opts, FAST_TICK, |_| Ok(())).await;

        assert!(result.is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let config = PlayerConfig {
            default_volume: 70,
            default_speed: 1.5,
            ..PlayerConfig::default()
        };
        let settings = settings_from_config(&config);
        assert_eq!(settings.volume.as_percent(), 70);
        assert_eq!(settings.playback_rate.value(), 1.5);

        let broken = PlayerConfig {
            default_speed: -1.0,
            ..PlayerConfig::default()
        };
        assert_eq!(settings_from_config(&broken).playback_rate, PlaybackRate::default());
    }

    #[test]
    fn test_status_line() {
        let book = short_book();
        let mut transport = SimulatedTransport::new().with_source("cranford.mp3", 2.0);
        let session = chaptershelf_media_engine::PlaybackSession::start(
            &mut transport,
            &book,
            PlayerSettings::default(),
        );
        let line = status_line(&PlayerView::from_session(&session));
        assert!(line.contains("Our Society"));
        assert!(line.contains("vol 100%"));
        assert!(line.starts_with("⏸"));
    }
}
