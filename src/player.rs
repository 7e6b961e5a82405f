//! The playback core: what plays next, where we are in it, and what
//! "previous" means under random playback.
//!
//! Everything here runs on the caller's thread (in practice the runtime's
//! event loop); there is no internal locking and the type is not meant to be
//! shared across threads. The UI reads [`PlayerSnapshot`]s and issues
//! commands; it never touches playback fields directly.

mod controller;
mod history;
mod position;

pub use controller::{PlayMode, Player, PlayerError, PlayerSnapshot};

#[cfg(test)]
mod tests;
