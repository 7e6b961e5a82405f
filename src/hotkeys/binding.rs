use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four logical actions a global hotkey can trigger.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HotkeyAction {
    ShowWindow,
    TogglePlay,
    PreviousSong,
    NextSong,
}

impl HotkeyAction {
    pub const ALL: [HotkeyAction; 4] = [
        HotkeyAction::ShowWindow,
        HotkeyAction::TogglePlay,
        HotkeyAction::PreviousSong,
        HotkeyAction::NextSong,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
    pub win: bool,
}

/// The non-modifier part of a binding: A–Z, 0–9, F1–F12, Space, Enter,
/// Left or Right.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Key {
    /// An uppercase letter or a digit.
    Char(char),
    /// F1–F12.
    Function(u8),
    Space,
    Enter,
    Left,
    Right,
}

/// A parsed `Modifier+...+Key` binding such as `Ctrl+Alt+Shift+P`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Hotkey {
    pub mods: Modifiers,
    pub key: Key,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseHotkeyError {
    #[error("empty hotkey string")]
    Empty,
    #[error("unknown modifier or key `{0}`")]
    UnknownToken(String),
    #[error("hotkey has modifiers but no key")]
    MissingKey,
    #[error("hotkey names more than one key")]
    MultipleKeys,
}

impl FromStr for Hotkey {
    type Err = ParseHotkeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(ParseHotkeyError::Empty);
        }

        let mut mods = Modifiers::default();
        let mut key: Option<Key> = None;

        for token in s.split('+') {
            let token = token.trim();
            match token.to_ascii_lowercase().as_str() {
                "ctrl" | "control" => mods.ctrl = true,
                "alt" => mods.alt = true,
                "shift" => mods.shift = true,
                "win" | "super" => mods.win = true,
                lower => {
                    let parsed = parse_key(lower)
                        .ok_or_else(|| ParseHotkeyError::UnknownToken(token.to_string()))?;
                    if key.replace(parsed).is_some() {
                        return Err(ParseHotkeyError::MultipleKeys);
                    }
                }
            }
        }

        match key {
            Some(key) => Ok(Hotkey { mods, key }),
            None => Err(ParseHotkeyError::MissingKey),
        }
    }
}

fn parse_key(lower: &str) -> Option<Key> {
    match lower {
        "space" => return Some(Key::Space),
        "enter" => return Some(Key::Enter),
        "left" => return Some(Key::Left),
        "right" => return Some(Key::Right),
        _ => {}
    }

    let mut chars = lower.chars();
    match (chars.next(), chars.as_str()) {
        (Some(c), "") if c.is_ascii_alphanumeric() => Some(Key::Char(c.to_ascii_uppercase())),
        (Some('f'), rest) => match rest.parse::<u8>() {
            Ok(n) if (1..=12).contains(&n) => Some(Key::Function(n)),
            _ => None,
        },
        _ => None,
    }
}

impl fmt::Display for Hotkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mods.ctrl {
            write!(f, "Ctrl+")?;
        }
        if self.mods.alt {
            write!(f, "Alt+")?;
        }
        if self.mods.shift {
            write!(f, "Shift+")?;
        }
        if self.mods.win {
            write!(f, "Win+")?;
        }
        match self.key {
            Key::Char(c) => write!(f, "{c}"),
            Key::Function(n) => write!(f, "F{n}"),
            Key::Space => write!(f, "Space"),
            Key::Enter => write!(f, "Enter"),
            Key::Left => write!(f, "Left"),
            Key::Right => write!(f, "Right"),
        }
    }
}

/// The persisted action -> binding-string map.
///
/// The defaults deliberately stack three modifiers so they are unlikely to
/// collide with hotkeys claimed by other applications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyBindings {
    pub show_window: String,
    pub toggle_play: String,
    pub previous_song: String,
    pub next_song: String,
}

impl Default for HotkeyBindings {
    fn default() -> Self {
        Self {
            show_window: "Ctrl+Alt+Shift+S".to_string(),
            toggle_play: "Ctrl+Alt+Shift+P".to_string(),
            previous_song: "Ctrl+Alt+Shift+Left".to_string(),
            next_song: "Ctrl+Alt+Shift+Right".to_string(),
        }
    }
}

impl HotkeyBindings {
    pub fn get(&self, action: HotkeyAction) -> &str {
        match action {
            HotkeyAction::ShowWindow => &self.show_window,
            HotkeyAction::TogglePlay => &self.toggle_play,
            HotkeyAction::PreviousSong => &self.previous_song,
            HotkeyAction::NextSong => &self.next_song,
        }
    }

    /// Parse every binding, pairing each action with its outcome.
    pub fn parsed(&self) -> Vec<(HotkeyAction, Result<Hotkey, ParseHotkeyError>)> {
        HotkeyAction::ALL
            .iter()
            .map(|&action| (action, self.get(action).parse()))
            .collect()
    }
}
