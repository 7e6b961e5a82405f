use std::path::Path;
use std::time::Duration;

use lofty::prelude::*;

use crate::playlist::Track;

const UNKNOWN_ARTIST: &str = "Unknown Artist";
const UNKNOWN_ALBUM: &str = "Unknown Album";

/// Build a `Track` for `path`, reading whatever tags are available.
///
/// This never fails: files without readable tags get the file stem as
/// title, placeholder artist/album strings and a zero duration, so a
/// corrupt file still lands in the playlist and can be retried or removed
/// there.
pub fn read_track(path: &Path) -> Track {
    let mut title = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("UNKNOWN")
        .to_string();
    let mut artist = UNKNOWN_ARTIST.to_string();
    let mut album = UNKNOWN_ALBUM.to_string();
    let mut duration = Duration::ZERO;

    if let Ok(tagged) = lofty::read_from_path(path) {
        duration = tagged.properties().duration();

        if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
            if let Some(v) = tag.get_string(ItemKey::TrackTitle) {
                if !v.trim().is_empty() {
                    title = v.to_string();
                }
            }
            if let Some(v) = tag.get_string(ItemKey::TrackArtist) {
                let v = v.trim();
                if !v.is_empty() {
                    artist = v.to_string();
                }
            }
            if let Some(v) = tag.get_string(ItemKey::AlbumTitle) {
                let v = v.trim();
                if !v.is_empty() {
                    album = v.to_string();
                }
            }
        }
    }

    Track {
        path: path.to_path_buf(),
        title,
        artist,
        album,
        duration,
        display_name: None,
    }
}
