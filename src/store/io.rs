use std::path::{Path, PathBuf};
use std::{env, fs};

use serde::Deserialize;
use thiserror::Error;

use super::schema::{PersistedState, TrackRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("failed to encode state: {0}")]
    Encode(#[from] toml::ser::Error),
}

/// Resolve the state path from `RONDO_STATE_PATH` or XDG defaults
/// (`$XDG_DATA_HOME/rondo/state.toml`, falling back to
/// `~/.local/share/rondo/state.toml`).
pub fn resolve_state_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("RONDO_STATE_PATH") {
        return Some(PathBuf::from(p));
    }

    let data_home = if let Some(xdg) = env::var_os("XDG_DATA_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("share"))
    };

    data_home.map(|d| d.join("rondo").join("state.toml"))
}

/// Write `state` to `path`, creating parent directories as needed.
pub fn save(path: &Path, state: &PersistedState) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let doc = toml::to_string_pretty(state)?;
    fs::write(path, doc)?;
    Ok(())
}

/// Read persisted state from `path`. A missing or malformed file falls back
/// to the legacy JSON reader (a `state.json` sibling from older releases);
/// when that fails too the result is `None` and the caller starts empty.
pub fn load(path: &Path) -> Option<PersistedState> {
    if let Ok(doc) = fs::read_to_string(path) {
        match toml::from_str::<PersistedState>(&doc) {
            Ok(state) => return Some(state),
            Err(e) => log::warn!("unreadable state file {}: {e}", path.display()),
        }
    }
    load_legacy(&path.with_extension("json"))
}

// Older releases wrote a flat JSON document with seconds-granularity
// durations and no hotkey section.
#[derive(Debug, Deserialize)]
struct LegacyState {
    #[serde(default)]
    playlist: Vec<LegacyTrack>,
    #[serde(default = "legacy_no_index")]
    index: i64,
    #[serde(default)]
    play_mode: u8,
    #[serde(default = "legacy_volume")]
    volume: u8,
}

#[derive(Debug, Deserialize)]
struct LegacyTrack {
    path: PathBuf,
    #[serde(default)]
    title: String,
    #[serde(default)]
    artist: String,
    #[serde(default)]
    album: String,
    #[serde(default)]
    duration: u64,
}

fn legacy_no_index() -> i64 {
    -1
}

fn legacy_volume() -> u8 {
    70
}

fn load_legacy(path: &Path) -> Option<PersistedState> {
    let doc = fs::read_to_string(path).ok()?;
    let legacy: LegacyState = match serde_json::from_str(&doc) {
        Ok(legacy) => legacy,
        Err(e) => {
            log::warn!("unreadable legacy state file {}: {e}", path.display());
            return None;
        }
    };

    log::info!("restored legacy state file {}", path.display());
    Some(PersistedState {
        tracks: legacy
            .playlist
            .into_iter()
            .map(|t| TrackRecord {
                path: t.path,
                title: t.title,
                artist: t.artist,
                album: t.album,
                duration_ms: t.duration * 1000,
                display_name: None,
            })
            .collect(),
        current: legacy.index,
        mode: legacy.play_mode,
        volume: legacy.volume,
        ..PersistedState::default()
    })
}
