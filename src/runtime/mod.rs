use std::env;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::hotkeys::{HotkeyBridge, HotkeyRegistrar};
use crate::store;

mod event_loop;
mod settings;
mod startup;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    // OS hotkey registration is platform glue behind `HotkeyRegistrar`;
    // the stock binary ships without one, so global hotkeys stay off.
    run_with_registrar(None)
}

/// Run the player. When a registrar is supplied, the hotkey bridge is
/// spawned with the persisted bindings and its events feed the event loop.
pub fn run_with_registrar(
    registrar: Option<Box<dyn HotkeyRegistrar>>,
) -> Result<(), Box<dyn std::error::Error>> {
    let settings = settings::load_settings();
    let state_path = store::resolve_state_path();
    let scan_dir = env::args().nth(1);

    let startup::Bootstrap {
        mut player,
        bindings,
    } = startup::bootstrap(&settings, state_path.as_deref(), scan_dir.as_deref())?;

    let bridge: Option<HotkeyBridge> =
        registrar.map(|r| HotkeyBridge::spawn(r, bindings.clone()));

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let run_result = event_loop::run(
        &mut terminal,
        &settings,
        &mut player,
        bridge.as_ref(),
        &bindings,
        state_path.as_deref(),
    );

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Shutdown persistence happens after the terminal is restored so a
    // failing write can still log somewhere visible.
    if let Some(path) = state_path.as_deref() {
        event_loop::persist(path, &player, &bindings);
    }
    if let Some(bridge) = bridge {
        bridge.shutdown(Duration::from_secs(2));
    }

    run_result
}
