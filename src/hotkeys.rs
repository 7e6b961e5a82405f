//! Global hotkey support: binding strings and the bridge worker.
//!
//! Registering global hotkeys can silently fail or conflict with other
//! applications, so the registration logic is kept off the event-loop
//! thread behind a command/event channel pair. The host only ever observes
//! already-decoded [`HotkeyAction`]s (plus a one-shot failure notification);
//! the OS registration itself lives behind the [`HotkeyRegistrar`] trait.

mod binding;
mod bridge;

pub use binding::{Hotkey, HotkeyAction, HotkeyBindings, Key, Modifiers, ParseHotkeyError};
pub use bridge::{BridgeCmd, BridgeEvent, HotkeyBridge, HotkeyRegistrar};
