use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::backend::RodioBackend;
use crate::config::Settings;
use crate::hotkeys::{BridgeEvent, HotkeyAction, HotkeyBindings, HotkeyBridge};
use crate::player::{Player, PlayerError};
use crate::store::{self, PersistedState};
use crate::ui::{self, UiState};

/// Main terminal event loop: draws the UI, drives the position cadence,
/// drains hotkey-bridge events and handles key input. Returns when the
/// user quits.
pub fn run(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &Settings,
    player: &mut Player<RodioBackend>,
    bridge: Option<&HotkeyBridge>,
    bindings: &HotkeyBindings,
    state_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ui_state = UiState::default();
    let sample_interval = Duration::from_millis(settings.controls.sample_interval_ms);
    let poll_interval = Duration::from_millis(settings.controls.poll_interval_ms);
    let mut last_sample = Instant::now();

    loop {
        // Persist structural mutations as they happen, not just on quit.
        if player.is_dirty() {
            if let Some(path) = state_path {
                persist(path, player, bindings);
            }
            player.clear_dirty();
        }

        // Steady position cadence; the backend is only consulted here.
        if last_sample.elapsed() >= sample_interval {
            last_sample = Instant::now();
            if let Err(e) = player.sample() {
                // Usually the next file vanishing mid-session. Stop instead
                // of retrying the same load every tick.
                log::warn!("auto-advance failed: {e}");
                ui_state.notice = Some(e.to_string());
                player.stop();
            }
        }

        if let Some(bridge) = bridge {
            while let Some(event) = bridge.try_event() {
                handle_bridge_event(event, player, &mut ui_state);
            }
        }

        ui_state.clamp_selection(player.playlist().len());
        terminal.draw(|f| {
            ui::draw(f, player.playlist(), player.snapshot(), &ui_state, settings)
        })?;

        if event::poll(poll_interval)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(key, settings, player, &mut ui_state) {
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Serialize the player + bindings to `path`, logging (not propagating)
/// failures: the state stays dirty in spirit and the next mutation retries.
pub(super) fn persist(path: &Path, player: &Player<RodioBackend>, bindings: &HotkeyBindings) {
    let state = PersistedState::capture(
        player.playlist(),
        player.current_index(),
        player.mode(),
        player.volume(),
        bindings,
    );
    if let Err(e) = store::save(path, &state) {
        log::warn!("failed to write state file {}: {e}", path.display());
    }
}

fn handle_bridge_event(event: BridgeEvent, player: &mut Player<RodioBackend>, ui: &mut UiState) {
    match event {
        BridgeEvent::Command(action) => {
            let result = match action {
                HotkeyAction::TogglePlay => player.toggle_play_pause(),
                HotkeyAction::PreviousSong => player.previous(),
                HotkeyAction::NextSong => player.next(),
                HotkeyAction::ShowWindow => {
                    // The terminal shell has no window to raise; acknowledge
                    // so the action still round-trips through the bridge.
                    log::info!("show-window hotkey received");
                    Ok(())
                }
            };
            report(result, ui);
        }
        BridgeEvent::RegistrationFailed { failed } => {
            log::warn!("{failed} global hotkeys failed to register");
            ui.notice = Some(format!(
                "{failed} global hotkeys failed to register; edit the bindings in the state file"
            ));
        }
    }
}

fn report(result: Result<(), PlayerError>, ui: &mut UiState) {
    if let Err(e) = result {
        log::warn!("{e}");
        ui.notice = Some(e.to_string());
    }
}

/// Handle one key press. Returns true when the loop should exit.
fn handle_key_event(
    key: KeyEvent,
    settings: &Settings,
    player: &mut Player<RodioBackend>,
    ui: &mut UiState,
) -> bool {
    // The rename prompt captures all input while open.
    if ui.rename.is_some() {
        match key.code {
            KeyCode::Esc => ui.rename = None,
            KeyCode::Backspace => {
                if let Some(buffer) = ui.rename.as_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Enter => {
                if let Some(name) = ui.rename.take() {
                    let name = (!name.trim().is_empty()).then_some(name);
                    player.rename_track(ui.selected, name);
                }
            }
            KeyCode::Char(c) if !c.is_control() => {
                if let Some(buffer) = ui.rename.as_mut() {
                    buffer.push(c);
                }
            }
            _ => {}
        }
        return false;
    }

    let scrub_ms = (settings.controls.scrub_seconds.saturating_mul(1000)).min(i64::MAX as u64) as i64;

    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char('j') | KeyCode::Down => {
            if ui.selected + 1 < player.playlist().len() {
                ui.selected += 1;
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            ui.selected = ui.selected.saturating_sub(1);
        }
        KeyCode::Enter => {
            if !player.playlist().is_empty() {
                report(player.play_track(ui.selected), ui);
            }
        }
        KeyCode::Char(' ') | KeyCode::Char('p') => {
            report(player.toggle_play_pause(), ui);
        }
        KeyCode::Char('l') => report(player.next(), ui),
        KeyCode::Char('h') => report(player.previous(), ui),
        KeyCode::Char('L') | KeyCode::Right => player.seek_by(scrub_ms),
        KeyCode::Char('H') | KeyCode::Left => player.seek_by(-scrub_ms),
        KeyCode::Char('m') => player.set_mode(player.mode().cycle()),
        KeyCode::Char('+') | KeyCode::Char('=') => {
            player.set_volume(player.volume().saturating_add(5));
        }
        KeyCode::Char('-') => {
            player.set_volume(player.volume().saturating_sub(5));
        }
        KeyCode::Char('d') | KeyCode::Char('x') => {
            player.remove_track(ui.selected);
            ui.clamp_selection(player.playlist().len());
        }
        KeyCode::Char('r') => {
            if let Some(track) = player.playlist().get(ui.selected) {
                ui.rename = Some(track.display_title().to_string());
            }
        }
        _ => {}
    }

    false
}
