//! Persistent player state: the playlist, current index, play mode, volume
//! and hotkey bindings, written as TOML on every structural mutation and on
//! shutdown.
//!
//! Loading is forgiving by design: entries whose files vanished since the
//! last run are dropped silently, and a reader for the older JSON format is
//! tried before giving up on a state file.

mod io;
mod schema;

pub use io::{load, resolve_state_path, save, StoreError};
pub use schema::{PersistedState, RestoredState, TrackRecord};
