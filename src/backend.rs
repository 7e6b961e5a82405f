//! The audio backend seam.
//!
//! The playback core only ever talks to [`AudioBackend`]. The contract is
//! deliberately narrow so that engines without native seeking or end-of-track
//! callbacks can satisfy it: `elapsed` reports time since the *last*
//! `play`/`play_from` call (not since the start of the track), and end of
//! track is observed by `is_busy` flipping to false rather than by an event.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

mod rodio;

pub use self::rodio::RodioBackend;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("no usable audio output device: {0}")]
    Stream(#[from] ::rodio::StreamError),
    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        source: ::rodio::decoder::DecoderError,
    },
}

pub trait AudioBackend {
    /// Prepare `path` for playback without starting it. On failure the
    /// previously loaded source (if any) is discarded.
    fn load(&mut self, path: &Path) -> Result<(), BackendError>;

    /// Start the loaded source from its beginning. Resets `elapsed` to zero.
    fn play(&mut self);

    /// Restart the loaded source at `start`. Resets `elapsed` to zero; this
    /// is the only seeking primitive the contract offers.
    fn play_from(&mut self, start: Duration);

    fn pause(&mut self);

    fn resume(&mut self);

    /// Discard the loaded source entirely.
    fn stop(&mut self);

    /// Whether a source is loaded and not yet finished. A busy-to-idle
    /// transition without an explicit `pause`/`stop` is a natural end.
    fn is_busy(&self) -> bool;

    /// Time since the last `play`/`play_from` call, excluding paused spans.
    fn elapsed(&self) -> Duration;

    /// Gain in `0.0..=1.0`, applied to the current and all future sources.
    fn set_volume(&mut self, gain: f32);
}
