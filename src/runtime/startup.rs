use std::path::Path;

use crate::backend::RodioBackend;
use crate::config::Settings;
use crate::hotkeys::HotkeyBindings;
use crate::library;
use crate::player::Player;
use crate::store::{self, RestoredState};

pub struct Bootstrap {
    pub player: Player<RodioBackend>,
    pub bindings: HotkeyBindings,
}

/// Restore the previous session and optionally merge in a scanned
/// directory, producing a player ready for the event loop.
pub fn bootstrap(
    settings: &Settings,
    state_path: Option<&Path>,
    scan_dir: Option<&str>,
) -> Result<Bootstrap, Box<dyn std::error::Error>> {
    let RestoredState {
        playlist,
        current,
        mode,
        volume,
        hotkeys,
        dropped,
    } = state_path
        .and_then(store::load)
        .unwrap_or_default()
        .restore();
    if dropped > 0 {
        log::debug!("dropped {dropped} playlist entries whose files no longer exist");
    }

    let backend = RodioBackend::new()?;
    let mut player = Player::restore(backend, playlist, current, mode, volume);

    if let Some(dir) = scan_dir {
        let mut added = 0usize;
        for track in library::scan(Path::new(dir), &settings.library) {
            if !player.playlist().contains_path(&track.path) {
                player.add_track(track);
                added += 1;
            }
        }
        log::info!("added {added} tracks from {dir}");
    }

    Ok(Bootstrap {
        player,
        bindings: hotkeys,
    })
}
