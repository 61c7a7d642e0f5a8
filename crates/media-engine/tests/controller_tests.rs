//! Chapter transition controller behavior against a recording transport

mod common;

use chaptershelf_core::{AudioBook, PlaybackRate, Volume};
use chaptershelf_media_engine::{
    format_time, ChapterController, CommandOutcome, EngineError, MediaTransport, PlayerSettings,
    PlayerState, TickOutcome, TimeUpdate,
};
use common::{bounded_book, chapter, init_logging, two_chapter_book, Command, RecordingTransport};

fn controller_with(book: &AudioBook) -> ChapterController<RecordingTransport> {
    init_logging();
    let mut controller = ChapterController::new(RecordingTransport::new());
    controller.load_book(book);
    controller.transport_mut().clear();
    controller
}

fn tick(controller: &mut ChapterController<RecordingTransport>, t: f64) -> TickOutcome {
    controller.transport_mut().current_time = t;
    controller.on_time_update(TimeUpdate {
        current_time: t,
        duration: 60.0,
    })
}

#[test]
fn test_load_subscribes_then_attaches_without_seeking() {
    init_logging();
    let settings = PlayerSettings {
        volume: Volume::from_percent(80),
        playback_rate: PlaybackRate::new(1.25).unwrap(),
    };
    let mut controller = ChapterController::with_settings(RecordingTransport::new(), settings);

    assert!(controller.load_book(&two_chapter_book()).is_applied());

    assert_eq!(
        controller.transport().commands,
        vec![
            Command::Subscribe,
            Command::Attach("middlemarch.mp3".to_string()),
            Command::SetVolume(0.8),
            Command::SetRate(1.25),
        ]
    );
    assert_eq!(controller.state(), PlayerState::Ready);
}

#[test]
fn test_loading_second_book_tears_down_first() {
    let mut controller = controller_with(&two_chapter_book());
    controller.toggle_play_pause();
    controller.transport_mut().clear();

    controller.load_book(&bounded_book());

    let commands = &controller.transport().commands;
    assert_eq!(
        &commands[..4],
        &[
            Command::Pause,
            Command::Unsubscribe,
            Command::Release,
            Command::Subscribe
        ]
    );
    assert_eq!(commands[4], Command::Attach("short.mp3".to_string()));
    assert_eq!(controller.transport().listener_count(), 1);
    assert_eq!(controller.state(), PlayerState::Ready);
    assert_eq!(controller.session().map(|s| s.title()), Some("Short Story"));
}

#[test]
fn test_seek_maps_percent_onto_chapter() {
    let mut controller = controller_with(&bounded_book());

    for (percent, expected) in [(0.0, 10.0), (25.0, 12.5), (50.0, 15.0), (100.0, 20.0)] {
        assert!(controller.seek(percent).is_applied());
        assert_eq!(controller.transport().current_time(), expected);
    }
}

#[test]
fn test_seek_does_not_change_play_state() {
    let mut controller = controller_with(&bounded_book());
    controller.seek(50.0);
    assert_eq!(controller.state(), PlayerState::Ready);
    assert_eq!(controller.transport().count(&Command::Play), 0);

    controller.toggle_play_pause();
    controller.seek(10.0);
    assert_eq!(controller.state(), PlayerState::Playing);
    assert_eq!(controller.transport().count(&Command::Pause), 0);
}

#[test]
fn test_seek_clamps_and_rejects_nan() {
    let mut controller = controller_with(&bounded_book());

    controller.seek(150.0);
    assert_eq!(controller.transport().current_time(), 20.0);
    controller.seek(-10.0);
    assert_eq!(controller.transport().current_time(), 10.0);

    controller.transport_mut().clear();
    assert!(matches!(
        controller.seek(f64::NAN),
        CommandOutcome::Ignored(EngineError::InvalidSeek(_))
    ));
    assert!(controller.transport().commands.is_empty());
}

#[test]
fn test_boundary_stop_pauses_exactly_once() {
    let mut controller = controller_with(&bounded_book());
    controller.toggle_play_pause();
    controller.transport_mut().clear();

    let outcomes: Vec<TickOutcome> = [12.0, 16.0, 19.9, 20.0, 20.4, 21.0]
        .into_iter()
        .map(|t| tick(&mut controller, t))
        .collect();

    assert_eq!(
        outcomes,
        vec![
            TickOutcome::Tracked,
            TickOutcome::Tracked,
            TickOutcome::Tracked,
            TickOutcome::BoundaryStop,
            TickOutcome::Tracked,
            TickOutcome::Tracked,
        ]
    );
    assert_eq!(controller.transport().commands, vec![Command::Pause]);
    assert_eq!(controller.state(), PlayerState::Ready);
}

#[test]
fn test_toggle_outside_chapter_seeks_before_play() {
    let mut controller = controller_with(&bounded_book());
    controller.transport_mut().current_time = 5.0;

    assert!(controller.toggle_play_pause().is_applied());

    assert_eq!(
        controller.transport().commands,
        vec![Command::Seek(10.0), Command::Play]
    );
    assert_eq!(controller.state(), PlayerState::Playing);
}

#[test]
fn test_toggle_inside_chapter_keeps_position() {
    let mut controller = controller_with(&bounded_book());
    controller.transport_mut().current_time = 14.0;

    controller.toggle_play_pause();

    assert_eq!(controller.transport().commands, vec![Command::Play]);
}

#[test]
fn test_toggle_at_chapter_end_restarts_chapter() {
    let mut controller = controller_with(&bounded_book());
    controller.toggle_play_pause();
    tick(&mut controller, 20.0);
    controller.transport_mut().clear();

    controller.toggle_play_pause();

    assert_eq!(
        controller.transport().commands,
        vec![Command::Seek(10.0), Command::Play]
    );
}

#[test]
fn test_select_then_stop_at_body_end() {
    let mut controller = controller_with(&two_chapter_book());

    assert!(controller.select_chapter(1).is_applied());
    assert_eq!(
        controller.transport().commands,
        vec![Command::Seek(30.0), Command::Play]
    );
    assert_eq!(controller.state(), PlayerState::Playing);

    assert_eq!(tick(&mut controller, 90.5), TickOutcome::BoundaryStop);
    assert_eq!(controller.state(), PlayerState::Ready);
    assert_eq!(controller.session().map(|s| s.current_chapter_index()), Some(1));
}

#[test]
fn test_select_out_of_bounds_is_noop() {
    let mut controller = controller_with(&two_chapter_book());

    assert_eq!(
        controller.select_chapter(2),
        CommandOutcome::Ignored(EngineError::OutOfBoundsIndex { index: 2, len: 2 })
    );
    assert!(controller.transport().commands.is_empty());
    assert_eq!(controller.state(), PlayerState::Ready);
}

#[test]
fn test_skips_are_noops_at_the_ends() {
    let mut controller = controller_with(&two_chapter_book());

    assert_eq!(
        controller.skip_backward(),
        CommandOutcome::Ignored(EngineError::NoPreviousChapter)
    );
    assert!(controller.transport().commands.is_empty());

    assert!(controller.skip_forward().is_applied());
    assert_eq!(controller.session().map(|s| s.current_chapter_index()), Some(1));
    controller.transport_mut().clear();

    assert_eq!(
        controller.skip_forward(),
        CommandOutcome::Ignored(EngineError::NoNextChapter)
    );
    assert!(controller.transport().commands.is_empty());

    assert!(controller.skip_backward().is_applied());
    assert_eq!(
        controller.transport().commands,
        vec![Command::Seek(0.0), Command::Play]
    );
}

#[test]
fn test_empty_book_tolerated() {
    let book = AudioBook::new("Empty", "empty.mp3", 30.0);
    let mut controller = controller_with(&book);

    assert_eq!(
        controller.toggle_play_pause(),
        CommandOutcome::Ignored(EngineError::NoCurrentChapter)
    );
    assert_eq!(
        controller.seek(50.0),
        CommandOutcome::Ignored(EngineError::NoCurrentChapter)
    );
    assert_eq!(
        controller.skip_forward(),
        CommandOutcome::Ignored(EngineError::NoCurrentChapter)
    );
    assert_eq!(tick(&mut controller, 12.0), TickOutcome::Tracked);
    assert_eq!(controller.progress().percent, 0.0);
    assert!(controller.transport().commands.is_empty());

    assert!(controller.set_volume(0.5).is_applied());
}

#[test]
fn test_progress_tracks_relative_time() {
    let mut controller = controller_with(&two_chapter_book());
    controller.select_chapter(1);

    tick(&mut controller, 45.0);
    let first = controller.progress();
    tick(&mut controller, 45.0);
    let second = controller.progress();

    assert_eq!(first, second);
    assert_eq!(first.percent, 25.0);
    assert_eq!(first.elapsed, "0:15");
    assert_eq!(first.total, "1:00");
}

#[test]
fn test_notifications_after_close_are_not_delivered() {
    let mut controller = controller_with(&two_chapter_book());
    controller.close();

    controller.transport_mut().emit_time(10.0);

    assert_eq!(controller.transport().listener_count(), 0);
    assert_eq!(controller.pump(), 0);
    assert_eq!(
        controller.on_time_update(TimeUpdate {
            current_time: 40.0,
            duration: 90.0
        }),
        TickOutcome::Ignored
    );
    assert_eq!(controller.state(), PlayerState::Idle);
}

#[test]
fn test_pumped_notifications_drive_boundary_stop() {
    let mut controller = controller_with(&two_chapter_book());
    controller.toggle_play_pause();

    controller.transport_mut().emit_metadata(91.0);
    controller.transport_mut().emit_time(29.0);
    controller.transport_mut().emit_time(30.2);
    controller.transport_mut().emit_time(30.4);

    assert_eq!(controller.pump(), 1);
    assert_eq!(controller.transport().count(&Command::Pause), 1);
    assert_eq!(controller.session().map(|s| s.duration()), Some(91.0));
    assert_eq!(controller.session().map(|s| s.absolute_time()), Some(30.4));
}

#[test]
fn test_unavailable_duration_is_tolerated() {
    let mut controller = controller_with(&two_chapter_book());
    controller.on_time_update(TimeUpdate {
        current_time: 0.0,
        duration: f64::NAN,
    });
    assert_eq!(controller.session().map(|s| s.duration()), Some(90.0));
}

#[test]
fn test_volume_and_rate_require_a_book() {
    init_logging();
    let mut controller = ChapterController::new(RecordingTransport::new());
    assert_eq!(
        controller.set_volume(0.5),
        CommandOutcome::Ignored(EngineError::NoBookLoaded)
    );
    assert_eq!(
        controller.set_playback_rate(1.5),
        CommandOutcome::Ignored(EngineError::NoBookLoaded)
    );
    assert!(controller.transport().commands.is_empty());
}

#[test]
fn test_volume_and_rate_pass_through() {
    let mut controller = controller_with(&two_chapter_book());

    assert!(controller.set_volume(0.25).is_applied());
    assert!(controller.set_playback_rate(1.5).is_applied());
    assert!(!controller.set_playback_rate(f64::NAN).is_applied());
    assert!(!controller.set_volume(-0.5).is_applied());

    assert_eq!(
        controller.transport().commands,
        vec![Command::SetVolume(0.25), Command::SetRate(1.5)]
    );
    let view = controller.view().unwrap();
    assert_eq!(view.volume_percent, 25);
    assert_eq!(view.speed_preset, Some(4));
}

#[test]
fn test_overlapping_chapters_are_played_as_authored() {
    let book = AudioBook::new("Overlap", "overlap.mp3", 100.0)
        .with_chapter(chapter(0, "A", 0.0, 60.0))
        .with_chapter(chapter(1, "B", 40.0, 100.0));
    let mut controller = controller_with(&book);

    controller.select_chapter(1);
    assert_eq!(tick(&mut controller, 60.0), TickOutcome::Tracked);
    assert_eq!(controller.state(), PlayerState::Playing);
}

#[test]
fn test_format_time_examples() {
    assert_eq!(format_time(65.0), "1:05");
    assert_eq!(format_time(5.0), "0:05");
    assert_eq!(format_time(3600.0), "60:00");
    assert_eq!(format_time(59.99), "0:59");
}
