use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::hotkeys::HotkeyBindings;
use crate::player::PlayMode;
use crate::playlist::{Playlist, Track};

/// On-disk track record. Durations are stored in milliseconds; the rename
/// override is omitted when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackRecord {
    pub path: PathBuf,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artist: String,
    #[serde(default)]
    pub album: String,
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

impl From<&Track> for TrackRecord {
    fn from(track: &Track) -> Self {
        Self {
            path: track.path.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
            album: track.album.clone(),
            duration_ms: track.duration.as_millis() as u64,
            display_name: track.display_name.clone(),
        }
    }
}

impl TrackRecord {
    pub fn into_track(self) -> Track {
        Track {
            path: self.path,
            title: self.title,
            artist: self.artist,
            album: self.album,
            duration: Duration::from_millis(self.duration_ms),
            display_name: self.display_name,
        }
    }
}

/// The full persisted document. `current` keeps the historical -1 sentinel
/// for "nothing loaded"; `mode` is the 0/1/2 encoding of [`PlayMode`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistedState {
    // Scalars first so the TOML emitter writes them before the tables.
    pub current: i64,
    pub mode: u8,
    pub volume: u8,
    pub tracks: Vec<TrackRecord>,
    pub hotkeys: HotkeyBindings,
}

impl Default for PersistedState {
    fn default() -> Self {
        Self {
            current: -1,
            mode: 0,
            volume: 70,
            tracks: Vec::new(),
            hotkeys: HotkeyBindings::default(),
        }
    }
}

/// Player state rebuilt from a [`PersistedState`], with stale entries
/// already filtered out.
#[derive(Debug)]
pub struct RestoredState {
    pub playlist: Playlist,
    pub current: Option<usize>,
    pub mode: PlayMode,
    pub volume: u8,
    pub hotkeys: HotkeyBindings,
    /// How many entries were dropped because their file no longer exists.
    pub dropped: usize,
}

impl PersistedState {
    pub fn capture(
        playlist: &Playlist,
        current: Option<usize>,
        mode: PlayMode,
        volume: u8,
        hotkeys: &HotkeyBindings,
    ) -> Self {
        Self {
            tracks: playlist.iter().map(TrackRecord::from).collect(),
            current: current.map_or(-1, |i| i as i64),
            mode: mode.persisted(),
            volume,
            hotkeys: hotkeys.clone(),
        }
    }

    /// Rebuild runtime state, silently dropping entries whose backing file
    /// is gone and remapping the current index to the surviving entry it
    /// pointed at (or clearing it when that entry was dropped).
    pub fn restore(self) -> RestoredState {
        let old_current = usize::try_from(self.current).ok();

        let mut tracks = Vec::with_capacity(self.tracks.len());
        let mut current = None;
        let mut dropped = 0usize;
        for (old_index, record) in self.tracks.into_iter().enumerate() {
            if !record.path.exists() {
                dropped += 1;
                continue;
            }
            if old_current == Some(old_index) {
                current = Some(tracks.len());
            }
            tracks.push(record.into_track());
        }

        RestoredState {
            playlist: Playlist::from_tracks(tracks),
            current,
            mode: PlayMode::from_persisted(self.mode),
            volume: self.volume.min(100),
            hotkeys: self.hotkeys,
            dropped,
        }
    }
}
