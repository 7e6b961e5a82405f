use std::time::Duration;

use rand::RngExt;
use thiserror::Error;

use crate::backend::{AudioBackend, BackendError};
use crate::playlist::{Playlist, Track};

use super::history::ShuffleHistory;
use super::position::PositionClock;

/// How the controller decides what plays after the current track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlayMode {
    /// Advance through the list in order; stop at the end, never wrap.
    #[default]
    Sequential,
    /// A natural end replays the same track; an explicit skip jumps to a
    /// random other track.
    SmartRepeatOne,
    /// Every transition picks a random other track.
    Shuffle,
}

impl PlayMode {
    /// Decode the persisted 0/1/2 representation; unknown values fall back
    /// to sequential.
    pub fn from_persisted(raw: u8) -> Self {
        match raw {
            1 => Self::SmartRepeatOne,
            2 => Self::Shuffle,
            _ => Self::Sequential,
        }
    }

    pub fn persisted(self) -> u8 {
        match self {
            Self::Sequential => 0,
            Self::SmartRepeatOne => 1,
            Self::Shuffle => 2,
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            Self::Sequential => Self::SmartRepeatOne,
            Self::SmartRepeatOne => Self::Shuffle,
            Self::Shuffle => Self::Sequential,
        }
    }
}

#[derive(Debug, Error)]
pub enum PlayerError {
    #[error("track index {index} out of bounds (playlist has {len} tracks)")]
    OutOfBounds { index: usize, len: usize },
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Read-only view of the playback state for the UI shell.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PlayerSnapshot {
    pub current: Option<usize>,
    pub playing: bool,
    pub position: Duration,
    pub duration: Duration,
    pub mode: PlayMode,
    pub volume: u8,
}

/// The playback controller: owns the playlist, the current index, the play
/// mode and the position clock, and drives an [`AudioBackend`].
pub struct Player<B: AudioBackend> {
    backend: B,
    playlist: Playlist,
    current: Option<usize>,
    playing: bool,
    mode: PlayMode,
    volume: u8,
    clock: PositionClock,
    history: ShuffleHistory,
    dirty: bool,
}

impl<B: AudioBackend> Player<B> {
    /// Rebuild a player from persisted state. Does not start playback and
    /// does not mark the state dirty; `current` is kept so that
    /// [`Player::toggle_play_pause`] resumes where the last session left off.
    pub fn restore(
        mut backend: B,
        playlist: Playlist,
        current: Option<usize>,
        mode: PlayMode,
        volume: u8,
    ) -> Self {
        let volume = volume.min(100);
        backend.set_volume(f32::from(volume) / 100.0);
        let current = current.filter(|&i| i < playlist.len());
        Self {
            backend,
            playlist,
            current,
            playing: false,
            mode,
            volume,
            clock: PositionClock::default(),
            history: ShuffleHistory::default(),
            dirty: false,
        }
    }

    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn mode(&self) -> PlayMode {
        self.mode
    }

    pub fn volume(&self) -> u8 {
        self.volume
    }

    pub fn position(&self) -> Duration {
        self.clock.position()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            current: self.current,
            playing: self.playing,
            position: self.clock.position(),
            duration: self.clock.duration(),
            mode: self.mode,
            volume: self.volume,
        }
    }

    /// Whether persisted state has changed since the last [`Self::clear_dirty`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(super) fn backend(&self) -> &B {
        &self.backend
    }

    pub(super) fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub(super) fn clock_mut(&mut self) -> &mut PositionClock {
        &mut self.clock
    }

    /// Load the track at `index` and start playing it from the beginning.
    ///
    /// On backend failure (file deleted since indexing, decode error) the
    /// error is returned and no field changes: the previous track keeps
    /// playing, or the player stays idle.
    pub fn play_track(&mut self, index: usize) -> Result<(), PlayerError> {
        let len = self.playlist.len();
        let Some(track) = self.playlist.get(index) else {
            return Err(PlayerError::OutOfBounds { index, len });
        };
        let path = track.path.clone();
        let duration = track.duration;

        self.backend.load(&path)?;
        self.backend.play();

        self.current = Some(index);
        self.playing = true;
        self.clock.reset(duration);
        self.mark_dirty();
        Ok(())
    }

    /// Pause when playing; resume a paused track; otherwise start the
    /// current (or first) playlist entry.
    pub fn toggle_play_pause(&mut self) -> Result<(), PlayerError> {
        if self.playing {
            self.backend.pause();
            self.playing = false;
            return Ok(());
        }
        if self.current.is_some() && self.backend.is_busy() {
            self.backend.resume();
            self.playing = true;
            return Ok(());
        }
        if self.playlist.is_empty() {
            return Ok(());
        }
        let index = self
            .current
            .filter(|&i| i < self.playlist.len())
            .unwrap_or(0);
        self.play_track(index)
    }

    /// Explicit skip forward.
    pub fn next(&mut self) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        match self.mode {
            PlayMode::Sequential => match self.current {
                Some(cur) if cur + 1 < self.playlist.len() => self.play_track(cur + 1),
                Some(_) => {
                    // End of the list: stop rather than wrap.
                    self.stop();
                    Ok(())
                }
                None => self.play_track(0),
            },
            PlayMode::SmartRepeatOne | PlayMode::Shuffle => {
                if let Some(cur) = self.current {
                    self.history.push(cur);
                }
                match self.random_other(self.current) {
                    Some(i) => self.play_track(i),
                    None => Ok(()),
                }
            }
        }
    }

    /// Explicit skip backward: replay the remembered pre-skip track when the
    /// history slot is full, otherwise fall back to a random other track.
    pub fn previous(&mut self) -> Result<(), PlayerError> {
        if self.playlist.is_empty() {
            return Ok(());
        }
        if let Some(prev) = self.history.pop() {
            if prev < self.playlist.len() {
                return self.play_track(prev);
            }
        }
        match self.random_other(self.current) {
            Some(i) => self.play_track(i),
            None => Ok(()),
        }
    }

    /// The current track finished without user action.
    pub fn on_natural_end(&mut self) -> Result<(), PlayerError> {
        match self.mode {
            PlayMode::Sequential => match self.current {
                Some(cur) if cur + 1 < self.playlist.len() => self.play_track(cur + 1),
                _ => {
                    self.stop();
                    Ok(())
                }
            },
            PlayMode::SmartRepeatOne => match self.current {
                Some(cur) => self.play_track(cur),
                None => Ok(()),
            },
            PlayMode::Shuffle => {
                if let Some(cur) = self.current {
                    self.history.push(cur);
                }
                match self.random_other(self.current) {
                    Some(i) => self.play_track(i),
                    None => Ok(()),
                }
            }
        }
    }

    /// Stop playback but keep the current index, so toggling play restarts
    /// the same track.
    pub fn stop(&mut self) {
        self.backend.stop();
        self.playing = false;
        let duration = self.clock.duration();
        self.clock.reset(duration);
    }

    pub fn set_mode(&mut self, mode: PlayMode) {
        if self.mode != mode {
            self.mode = mode;
            self.mark_dirty();
        }
    }

    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if self.volume != volume {
            self.volume = volume;
            self.backend.set_volume(f32::from(volume) / 100.0);
            self.mark_dirty();
        }
    }

    /// Append a track at the end of the playlist.
    pub fn add_track(&mut self, track: Track) {
        self.playlist.push(track);
        self.mark_dirty();
    }

    /// Remove the entry at `index`, re-deriving the current index: removing
    /// the current entry stops playback and clears it, removing an earlier
    /// entry shifts it down by one, removing a later entry leaves it alone.
    pub fn remove_track(&mut self, index: usize) -> Option<Track> {
        if index >= self.playlist.len() {
            return None;
        }
        match self.current {
            Some(cur) if index == cur => {
                self.backend.stop();
                self.playing = false;
                self.current = None;
                self.clock.clear();
            }
            Some(cur) if index < cur => self.current = Some(cur - 1),
            _ => {}
        }
        self.history.on_removed(index);
        let removed = self.playlist.remove(index);
        self.mark_dirty();
        removed
    }

    /// Set or clear the display-name override of the entry at `index`.
    pub fn rename_track(&mut self, index: usize, name: Option<String>) -> bool {
        let renamed = self.playlist.rename(index, name);
        if renamed {
            self.mark_dirty();
        }
        renamed
    }

    /// Uniformly random index different from `current` whenever the playlist
    /// offers a choice; a single-entry playlist replays its only track.
    fn random_other(&self, current: Option<usize>) -> Option<usize> {
        let len = self.playlist.len();
        match (len, current) {
            (0, _) => None,
            (1, _) => Some(0),
            (_, None) => Some(rand::rng().random_range(0..len)),
            (_, Some(cur)) => {
                let pick = rand::rng().random_range(0..len - 1);
                Some(if pick >= cur { pick + 1 } else { pick })
            }
        }
    }
}
