use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::backend::{AudioBackend, BackendError};
use crate::playlist::{Playlist, Track};

use super::*;

/// Scripted in-memory backend. Tests flip `busy` to simulate a track
/// running out and set `elapsed` to simulate the engine clock.
#[derive(Debug, Default)]
struct FakeBackend {
    loaded: Option<PathBuf>,
    playing: bool,
    busy: bool,
    elapsed: Duration,
    volume: f32,
    started_from: Option<Duration>,
    fail: HashSet<PathBuf>,
    loads: Vec<PathBuf>,
}

impl AudioBackend for FakeBackend {
    fn load(&mut self, path: &Path) -> Result<(), BackendError> {
        self.loads.push(path.to_path_buf());
        if self.fail.contains(path) {
            return Err(BackendError::Open {
                path: path.to_path_buf(),
                source: ErrorKind::NotFound.into(),
            });
        }
        self.loaded = Some(path.to_path_buf());
        self.busy = true;
        self.playing = false;
        self.elapsed = Duration::ZERO;
        self.started_from = None;
        Ok(())
    }

    fn play(&mut self) {
        self.playing = true;
        self.elapsed = Duration::ZERO;
    }

    fn play_from(&mut self, start: Duration) {
        self.playing = true;
        self.busy = true;
        self.elapsed = Duration::ZERO;
        self.started_from = Some(start);
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn resume(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.loaded = None;
        self.playing = false;
        self.busy = false;
        self.elapsed = Duration::ZERO;
    }

    fn is_busy(&self) -> bool {
        self.busy
    }

    fn elapsed(&self) -> Duration {
        self.elapsed
    }

    fn set_volume(&mut self, gain: f32) {
        self.volume = gain;
    }
}

fn track(name: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/music/{name}.mp3")),
        title: name.to_string(),
        artist: "Unknown Artist".into(),
        album: "Unknown Album".into(),
        duration: Duration::from_secs(300),
        display_name: None,
    }
}

fn player(n: usize) -> Player<FakeBackend> {
    let tracks = (0..n).map(|i| track(&format!("t{i}"))).collect();
    Player::restore(
        FakeBackend::default(),
        Playlist::from_tracks(tracks),
        None,
        PlayMode::Sequential,
        70,
    )
}

#[test]
fn play_track_sets_index_playing_and_clears_seek_offset() {
    let mut p = player(3);
    p.play_track(0).unwrap();
    p.seek(Duration::from_secs(90));

    p.play_track(1).unwrap();
    assert_eq!(p.current_index(), Some(1));
    assert!(p.is_playing());
    assert_eq!(p.position(), Duration::ZERO);
    assert_eq!(p.snapshot().duration, Duration::from_secs(300));
    assert!(p.backend().playing);
    assert_eq!(
        p.backend().loaded.as_deref(),
        Some(Path::new("/music/t1.mp3"))
    );

    // The old seek offset is gone: position now tracks the backend clock
    // alone.
    p.backend_mut().elapsed = Duration::from_secs(7);
    p.sample().unwrap();
    assert_eq!(p.position(), Duration::from_secs(7));
}

#[test]
fn play_track_out_of_bounds_is_an_error() {
    let mut p = player(2);
    let err = p.play_track(2).unwrap_err();
    assert!(matches!(
        err,
        PlayerError::OutOfBounds { index: 2, len: 2 }
    ));
    assert_eq!(p.current_index(), None);
}

#[test]
fn backend_load_failure_leaves_state_untouched() {
    let mut p = player(3);
    p.play_track(0).unwrap();
    p.backend_mut().fail.insert(PathBuf::from("/music/t2.mp3"));

    let err = p.play_track(2);
    assert!(matches!(err, Err(PlayerError::Backend(_))));

    // The previous track is still the current one and still playing.
    assert_eq!(p.current_index(), Some(0));
    assert!(p.is_playing());
}

#[test]
fn toggle_pauses_resumes_and_starts_from_idle() {
    let mut p = player(2);

    // Idle with nothing current: starts at index 0.
    p.toggle_play_pause().unwrap();
    assert_eq!(p.current_index(), Some(0));
    assert!(p.is_playing());

    p.toggle_play_pause().unwrap();
    assert!(!p.is_playing());
    assert!(!p.backend().playing);

    // Paused with a busy backend: resume, not reload.
    let loads_before = p.backend().loads.len();
    p.toggle_play_pause().unwrap();
    assert!(p.is_playing());
    assert_eq!(p.backend().loads.len(), loads_before);
}

#[test]
fn toggle_on_empty_playlist_is_a_no_op() {
    let mut p = player(0);
    p.toggle_play_pause().unwrap();
    assert_eq!(p.current_index(), None);
    assert!(!p.is_playing());
}

#[test]
fn seek_then_sample_reports_the_clamped_target() {
    let mut p = player(1);
    p.play_track(0).unwrap();

    p.seek(Duration::from_secs(100));
    assert_eq!(p.backend().started_from, Some(Duration::from_secs(100)));
    p.sample().unwrap();
    assert_eq!(p.position(), Duration::from_secs(100));

    // Past the end: clamped to the duration.
    p.seek(Duration::from_secs(400));
    assert_eq!(p.backend().started_from, Some(Duration::from_secs(300)));
    p.sample().unwrap();
    assert_eq!(p.position(), Duration::from_secs(300));
}

#[test]
fn sample_adds_seek_offset_to_backend_elapsed() {
    let mut p = player(1);
    p.play_track(0).unwrap();
    p.seek(Duration::from_secs(60));

    p.backend_mut().elapsed = Duration::from_secs(5);
    p.sample().unwrap();
    assert_eq!(p.position(), Duration::from_secs(65));
}

#[test]
fn seek_while_paused_stays_paused() {
    let mut p = player(1);
    p.play_track(0).unwrap();
    p.toggle_play_pause().unwrap();

    p.seek(Duration::from_secs(30));
    assert!(!p.is_playing());
    assert!(!p.backend().playing);
    assert_eq!(p.position(), Duration::from_secs(30));
}

#[test]
fn seek_by_clamps_at_track_start() {
    let mut p = player(1);
    p.play_track(0).unwrap();
    p.seek(Duration::from_secs(3));

    p.seek_by(-10_000);
    assert_eq!(p.position(), Duration::ZERO);

    p.seek_by(7_000);
    assert_eq!(p.position(), Duration::from_secs(7));
}

#[test]
fn seek_with_nothing_loaded_is_ignored() {
    let mut p = player(2);
    p.seek(Duration::from_secs(10));
    assert_eq!(p.position(), Duration::ZERO);
    assert_eq!(p.backend().started_from, None);
}

#[test]
fn shuffle_next_never_repeats_the_current_index() {
    for mode in [PlayMode::Shuffle, PlayMode::SmartRepeatOne] {
        let mut p = player(3);
        p.set_mode(mode);
        p.play_track(0).unwrap();

        for _ in 0..1000 {
            let before = p.current_index().unwrap();
            p.next().unwrap();
            let after = p.current_index().unwrap();
            assert_ne!(before, after, "{mode:?} repeated index {before}");
        }
    }
}

#[test]
fn shuffle_with_one_track_replays_it() {
    let mut p = player(1);
    p.set_mode(PlayMode::Shuffle);
    p.play_track(0).unwrap();
    p.next().unwrap();
    assert_eq!(p.current_index(), Some(0));
    assert!(p.is_playing());
}

#[test]
fn previous_restores_the_pre_skip_track_once() {
    let mut p = player(5);
    p.set_mode(PlayMode::Shuffle);
    p.play_track(3).unwrap();

    p.next().unwrap();
    assert_ne!(p.current_index(), Some(3));

    // First previous: back to the remembered index.
    p.previous().unwrap();
    assert_eq!(p.current_index(), Some(3));

    // Second previous: the slot is empty, so it falls back to a random
    // other track.
    p.previous().unwrap();
    assert_ne!(p.current_index(), Some(3));
}

#[test]
fn previous_with_empty_history_picks_the_other_track() {
    let mut p = player(2);
    p.play_track(0).unwrap();
    p.previous().unwrap();
    assert_eq!(p.current_index(), Some(1));
}

#[test]
fn sequential_natural_end_advances_by_one() {
    let mut p = player(3);
    p.play_track(0).unwrap();

    p.backend_mut().busy = false;
    p.sample().unwrap();
    assert_eq!(p.current_index(), Some(1));
    assert!(p.is_playing());
}

#[test]
fn sequential_natural_end_at_last_index_stops_and_keeps_current() {
    let mut p = player(3);
    p.play_track(2).unwrap();

    p.backend_mut().busy = false;
    p.sample().unwrap();
    assert_eq!(p.current_index(), Some(2));
    assert!(!p.is_playing());

    // The ending is reported exactly once: further samples do nothing.
    let loads = p.backend().loads.len();
    p.sample().unwrap();
    p.sample().unwrap();
    assert_eq!(p.backend().loads.len(), loads);
}

#[test]
fn sequential_manual_next_at_last_index_stops_without_wrapping() {
    let mut p = player(2);
    p.play_track(1).unwrap();
    p.next().unwrap();
    assert_eq!(p.current_index(), Some(1));
    assert!(!p.is_playing());
}

#[test]
fn smart_repeat_one_replays_on_natural_end_but_skips_on_next() {
    let mut p = player(4);
    p.set_mode(PlayMode::SmartRepeatOne);
    p.play_track(2).unwrap();

    p.backend_mut().busy = false;
    p.sample().unwrap();
    assert_eq!(p.current_index(), Some(2));
    assert!(p.is_playing());

    p.next().unwrap();
    assert_ne!(p.current_index(), Some(2));
}

#[test]
fn shuffle_natural_end_counts_as_a_skip_for_history() {
    let mut p = player(3);
    p.set_mode(PlayMode::Shuffle);
    p.play_track(0).unwrap();

    p.backend_mut().busy = false;
    p.sample().unwrap();
    assert_ne!(p.current_index(), Some(0));

    p.previous().unwrap();
    assert_eq!(p.current_index(), Some(0));
}

#[test]
fn sample_is_a_no_op_while_paused() {
    let mut p = player(1);
    p.play_track(0).unwrap();
    p.toggle_play_pause().unwrap();

    p.backend_mut().busy = false;
    p.sample().unwrap();
    // Paused, so the idle backend is not treated as a natural end.
    assert_eq!(p.current_index(), Some(0));
}

#[test]
fn removing_the_current_entry_stops_and_clears() {
    let mut p = player(3);
    p.play_track(1).unwrap();

    let removed = p.remove_track(1).unwrap();
    assert_eq!(removed.title, "t1");
    assert_eq!(p.current_index(), None);
    assert!(!p.is_playing());
    assert!(!p.backend().busy);
}

#[test]
fn removing_below_current_shifts_it_down() {
    let mut p = player(3);
    p.play_track(2).unwrap();

    p.remove_track(0);
    assert_eq!(p.current_index(), Some(1));
    assert_eq!(p.playlist().get(1).unwrap().title, "t2");
    assert!(p.is_playing());
}

#[test]
fn removing_above_current_leaves_it_alone() {
    let mut p = player(3);
    p.play_track(0).unwrap();

    p.remove_track(2);
    assert_eq!(p.current_index(), Some(0));
    assert_eq!(p.playlist().get(0).unwrap().title, "t0");
}

#[test]
fn set_volume_clamps_and_forwards_gain() {
    let mut p = player(1);
    p.set_volume(63);
    assert_eq!(p.volume(), 63);
    assert!((p.backend().volume - 0.63).abs() < 1e-6);

    p.set_volume(200);
    assert_eq!(p.volume(), 100);
    assert!((p.backend().volume - 1.0).abs() < 1e-6);
}

#[test]
fn structural_mutations_mark_the_state_dirty() {
    let mut p = player(2);
    assert!(!p.is_dirty());

    p.set_mode(PlayMode::Shuffle);
    assert!(p.is_dirty());
    p.clear_dirty();

    p.set_volume(30);
    assert!(p.is_dirty());
    p.clear_dirty();

    p.rename_track(0, Some("renamed".into()));
    assert!(p.is_dirty());
    p.clear_dirty();

    p.remove_track(0);
    assert!(p.is_dirty());
    p.clear_dirty();

    p.add_track(track("extra"));
    assert!(p.is_dirty());
}

#[test]
fn restore_discards_an_out_of_range_current_index() {
    let tracks = vec![track("a")];
    let p = Player::restore(
        FakeBackend::default(),
        Playlist::from_tracks(tracks),
        Some(7),
        PlayMode::Shuffle,
        55,
    );
    assert_eq!(p.current_index(), None);
    assert_eq!(p.mode(), PlayMode::Shuffle);
    assert_eq!(p.volume(), 55);
    assert!(!p.is_dirty());
}
