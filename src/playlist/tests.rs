use super::*;
use std::path::PathBuf;
use std::time::Duration;

fn t(title: &str) -> Track {
    Track {
        path: PathBuf::from(format!("/tmp/{title}.mp3")),
        title: title.into(),
        artist: "Unknown Artist".into(),
        album: "Unknown Album".into(),
        duration: Duration::ZERO,
        display_name: None,
    }
}

#[test]
fn push_preserves_insertion_order() {
    let mut pl = Playlist::default();
    pl.push(t("one"));
    pl.push(t("two"));
    pl.push(t("three"));

    let titles: Vec<&str> = pl.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["one", "two", "three"]);
}

#[test]
fn remove_shifts_later_entries_down() {
    let mut pl = Playlist::from_tracks(vec![t("a"), t("b"), t("c")]);
    let removed = pl.remove(1).unwrap();
    assert_eq!(removed.title, "b");
    assert_eq!(pl.len(), 2);
    assert_eq!(pl.get(1).unwrap().title, "c");

    assert!(pl.remove(5).is_none());
    assert_eq!(pl.len(), 2);
}

#[test]
fn rename_overrides_display_title_and_clears_on_blank() {
    let mut pl = Playlist::from_tracks(vec![t("song")]);
    assert_eq!(pl.get(0).unwrap().display_title(), "song");

    assert!(pl.rename(0, Some("My Jam".into())));
    assert_eq!(pl.get(0).unwrap().display_title(), "My Jam");

    // Blank renames fall back to the tag title.
    assert!(pl.rename(0, Some("   ".into())));
    assert_eq!(pl.get(0).unwrap().display_title(), "song");

    assert!(!pl.rename(3, Some("nope".into())));
}

#[test]
fn duplicate_paths_are_allowed() {
    let mut pl = Playlist::default();
    pl.push(t("same"));
    pl.push(t("same"));
    assert_eq!(pl.len(), 2);
    assert!(pl.contains_path(&PathBuf::from("/tmp/same.mp3")));
}
