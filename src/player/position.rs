//! Absolute-position bookkeeping over a backend whose clock resets on every
//! `play`/`play_from` call.

use std::time::Duration;

use crate::backend::AudioBackend;

use super::controller::{Player, PlayerError};

/// Tracks absolute position as `seek_offset + backend elapsed`, clamped to
/// the track duration (unless the duration is unknown, i.e. zero).
#[derive(Debug, Default)]
pub(super) struct PositionClock {
    position: Duration,
    seek_offset: Duration,
    duration: Duration,
}

impl PositionClock {
    /// Start tracking a freshly loaded track.
    pub(super) fn reset(&mut self, duration: Duration) {
        self.position = Duration::ZERO;
        self.seek_offset = Duration::ZERO;
        self.duration = duration;
    }

    /// Forget the current track entirely.
    pub(super) fn clear(&mut self) {
        *self = Self::default();
    }

    /// Record a seek target, clamped into the track. Returns the clamped
    /// target so the caller can hand it to the backend.
    pub(super) fn seek_to(&mut self, target: Duration) -> Duration {
        let target = self.clamp(target);
        self.seek_offset = target;
        self.position = target;
        target
    }

    /// Fold a backend elapsed reading into the absolute position.
    pub(super) fn advance(&mut self, elapsed: Duration) {
        self.position = self.clamp(self.seek_offset + elapsed);
    }

    pub(super) fn position(&self) -> Duration {
        self.position
    }

    pub(super) fn duration(&self) -> Duration {
        self.duration
    }

    fn clamp(&self, t: Duration) -> Duration {
        // Duration 0 means "unknown"; clamping against it would pin the
        // position to zero for untagged files.
        if self.duration.is_zero() {
            t
        } else {
            t.min(self.duration)
        }
    }
}

impl<B: AudioBackend> Player<B> {
    /// Refresh the absolute position from the backend, or notice a natural
    /// end (busy to idle without an explicit command) and advance per mode.
    ///
    /// The shell calls this on a steady cadence (once per second) and must
    /// suspend the cadence while a seek interaction is in progress, so an
    /// in-flight drag value is never overwritten.
    pub fn sample(&mut self) -> Result<(), PlayerError> {
        if !self.is_playing() {
            return Ok(());
        }
        if !self.backend().is_busy() {
            return self.on_natural_end();
        }
        let elapsed = self.backend().elapsed();
        self.clock_mut().advance(elapsed);
        Ok(())
    }

    /// Jump to `target` within the current track. Playback state is
    /// preserved: a paused track stays paused at the new position.
    pub fn seek(&mut self, target: Duration) {
        if self.current_index().is_none() {
            return;
        }
        let target = self.clock_mut().seek_to(target);
        self.backend_mut().play_from(target);
        if !self.is_playing() {
            // The backend contract has no pure seek; play-at-offset then
            // re-pause keeps the observable state unchanged.
            self.backend_mut().pause();
        }
    }

    /// Jump `delta_ms` forward (positive) or backward (negative) from the
    /// current position, clamped into the track.
    pub fn seek_by(&mut self, delta_ms: i64) {
        let current = self.position().as_millis() as i64;
        let target = (current + delta_ms).max(0) as u64;
        self.seek(Duration::from_millis(target));
    }
}
