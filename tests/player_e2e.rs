//! End-to-end UI tests: drive the player through its widgets and assert what
//! the media element and the display end up showing.

use rfplayer::platform::{ControlTarget, MediaElement, RangeProperty};
use rfplayer::{Player, PlayerConfig, SimulatedMedia};

const PLAY: &str = "►";
const PAUSE: &str = "❚ ❚";

fn player_with_duration(duration: f64) -> Player<SimulatedMedia> {
    let mut config = PlayerConfig::default();
    config.media.duration = Some(duration);
    rfplayer::new_player(config).expect("failed to create player")
}

#[test]
fn test_initial_state_is_paused_with_play_glyph() {
    let player = player_with_duration(100.0);
    assert!(player.media().paused());
    assert_eq!(player.widgets().toggle.text(), PLAY);
}

#[test]
fn test_toggle_plays_and_pauses() {
    let player = player_with_duration(100.0);

    player.click_toggle();
    assert!(!player.media().paused());
    assert_eq!(player.widgets().toggle.text(), PAUSE);

    player.click_toggle();
    assert!(player.media().paused());
    assert_eq!(player.widgets().toggle.text(), PLAY);
}

#[test]
fn test_clicking_video_toggles_too() {
    let player = player_with_duration(100.0);
    player.input().click(ControlTarget::Video);
    assert!(!player.media().paused());
    player.input().click(ControlTarget::Video);
    assert!(player.media().paused());
}

#[test]
fn test_volume_slider_change_sets_volume() {
    let player = player_with_duration(100.0);
    player.set_slider(RangeProperty::Volume, 0.5);
    assert_eq!(player.media().volume(), 0.5);
}

#[test]
fn test_rate_slider_change_sets_playback_rate() {
    let player = player_with_duration(100.0);
    player.set_slider(RangeProperty::PlaybackRate, 1.5);
    assert_eq!(player.media().playback_rate(), 1.5);
}

#[test]
fn test_slider_pointer_move_writes_current_value() {
    let player = player_with_duration(100.0);
    player.widgets().volume.set_value(0.25);
    assert_eq!(player.media().volume(), 1.0, "moving the thumb alone does not write");
    player.input().pointer_move(ControlTarget::Slider(RangeProperty::Volume), 10.0, 0);
    assert_eq!(player.media().volume(), 0.25);
}

#[test]
fn test_skip_buttons_compose_additively() {
    let player = player_with_duration(100.0);
    player.media().set_current_time(50.0).unwrap();

    player.click_skip(0);
    assert_eq!(player.media().current_time(), 40.0);

    player.click_skip(1);
    assert_eq!(player.media().current_time(), 65.0);
}

#[test]
fn test_skip_past_the_ends_is_clamped_by_media() {
    let player = player_with_duration(30.0);
    player.click_skip(0);
    assert_eq!(player.media().current_time(), 0.0);
    player.click_skip(1);
    player.click_skip(1);
    assert_eq!(player.media().current_time(), 30.0);
}

#[test]
fn test_toggle_after_skipping_to_the_end_restarts() {
    let player = player_with_duration(30.0);
    player.click_skip(1);
    player.click_skip(1);
    assert_eq!(player.media().current_time(), 30.0);

    player.click_toggle();
    assert!(!player.media().paused());
    assert_eq!(player.media().current_time(), 0.0);
    assert_eq!(player.widgets().toggle.text(), PAUSE);
    assert_eq!(player.widgets().progress.percent(), Some(0.0));
}

#[test]
fn test_progress_reflects_time_update() {
    let player = player_with_duration(100.0);
    player.media().set_current_time(50.0).unwrap();
    assert_eq!(player.widgets().progress.percent(), Some(50.0));
    assert_eq!(player.widgets().progress.style().as_deref(), Some("50%"));
}

#[test]
fn test_progress_follows_playback() {
    let player = player_with_duration(10.0);
    player.click_toggle();
    player.media().advance(2.5);
    assert_eq!(player.widgets().progress.percent(), Some(25.0));
}

#[test]
fn test_click_scrub_seeks_proportionally() {
    let player = player_with_duration(120.0);
    let width = player.widgets().track.offset_width();
    let x = 200.0;
    player.scrub_at(x);
    let expected = x / width * 120.0;
    assert!((player.media().current_time() - expected).abs() < 1e-9);
}

#[test]
fn test_drag_scrubs_only_while_pressed() {
    let player = player_with_duration(100.0);

    player.input().pointer_move(ControlTarget::ProgressTrack, 320.0, 1);
    assert_eq!(player.media().current_time(), 0.0, "move without pointer-down is ignored");

    player.drag(64.0, 160.0);
    assert!((player.media().current_time() - 25.0).abs() < 1e-9);
    assert!(!player.binder().is_scrubbing());

    player.input().pointer_move(ControlTarget::ProgressTrack, 480.0, 0);
    assert!((player.media().current_time() - 25.0).abs() < 1e-9);
}

#[test]
fn test_unknown_duration_is_tolerated() {
    let player = rfplayer::new_player(PlayerConfig::default()).unwrap();
    player.scrub_at(100.0);
    player.click_skip(1);
    let snap = player.snapshot();
    assert_eq!(snap.progress, None);
    assert_eq!(snap.duration, None);
    assert_eq!(snap.current_time, 25.0);

    player.media().load_metadata(50.0).unwrap();
    assert_eq!(player.snapshot().progress_percent, Some(50.0));

    player.scrub_at(320.0);
    assert_eq!(player.snapshot().progress_percent, Some(50.0));
}

#[test]
fn test_blocked_autoplay_keeps_play_glyph() {
    let mut config = PlayerConfig::default();
    config.media.duration = Some(60.0);
    config.media.autoplay_blocked = true;
    let player = rfplayer::new_player(config).unwrap();

    player.click_toggle();
    assert!(player.media().paused());
    assert_eq!(player.widgets().toggle.text(), PLAY);

    player.media().set_autoplay_blocked(false);
    player.click_toggle();
    assert_eq!(player.widgets().toggle.text(), PAUSE);
}

#[test]
fn test_reaching_the_end_restores_play_glyph() {
    let player = player_with_duration(5.0);
    player.click_toggle();
    player.media().advance(10.0);
    assert!(player.media().ended());
    assert_eq!(player.widgets().toggle.text(), PLAY);
    assert_eq!(player.widgets().progress.percent(), Some(100.0));
}

#[test]
fn test_external_pause_updates_glyph() {
    let player = player_with_duration(60.0);
    player.click_toggle();
    player.media().pause();
    assert_eq!(player.widgets().toggle.text(), PLAY);
}
