use std::path::{Path, PathBuf};
use std::time::Duration;

/// A single playlist entry.
///
/// `title`/`artist`/`album` hold whatever the tag reader produced (with
/// placeholder fallbacks, see `library::tags`); `display_name` is a
/// user-assigned override that wins over `title` in every list view.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub path: PathBuf,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Zero when the tag reader could not determine a duration.
    pub duration: Duration,
    pub display_name: Option<String>,
}

impl Track {
    /// The name shown in list views: the rename override when set, the
    /// tag title otherwise.
    pub fn display_title(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.title)
    }
}

/// An ordered, mutable sequence of tracks. Insertion order is preserved;
/// paths are not required to be unique across entries.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    pub fn from_tracks(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Track> {
        self.tracks.iter()
    }

    /// Append a track at the end of the list.
    pub fn push(&mut self, track: Track) {
        self.tracks.push(track);
    }

    /// Remove and return the entry at `index`, shifting later entries down.
    /// Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        if index < self.tracks.len() {
            Some(self.tracks.remove(index))
        } else {
            None
        }
    }

    /// Set or clear the display-name override of the entry at `index`.
    /// Returns false when the index is out of range.
    pub fn rename(&mut self, index: usize, name: Option<String>) -> bool {
        match self.tracks.get_mut(index) {
            Some(track) => {
                track.display_name = name.filter(|n| !n.trim().is_empty());
                true
            }
            None => false,
        }
    }

    pub fn contains_path(&self, path: &Path) -> bool {
        self.tracks.iter().any(|t| t.path == path)
    }
}
