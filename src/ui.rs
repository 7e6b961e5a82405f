//! UI rendering helpers for the terminal shell.
//!
//! The shell is deliberately thin: it renders a [`PlayerSnapshot`] plus the
//! playlist and forwards commands from the event loop. Playback state is
//! never mutated here.

use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, Padding, Paragraph, Wrap},
};

use crate::config::Settings;
use crate::player::{PlayMode, PlayerSnapshot};
use crate::playlist::Playlist;

/// Shell-local state: list cursor, rename input and transient notices.
#[derive(Debug, Default)]
pub struct UiState {
    pub selected: usize,
    /// Rename input buffer; `Some` while the rename prompt is open.
    pub rename: Option<String>,
    /// One-line notice shown in the status box until replaced.
    pub notice: Option<String>,
}

impl UiState {
    /// Clamp the cursor into the playlist after removals.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }
}

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn mode_label(mode: PlayMode) -> &'static str {
    match mode {
        PlayMode::Sequential => "Sequential",
        PlayMode::SmartRepeatOne => "Repeat-one",
        PlayMode::Shuffle => "Shuffle",
    }
}

/// Compute a centered rectangle with given size constrained to `r`.
fn centered_rect_sized(mut width: u16, mut height: u16, r: Rect) -> Rect {
    width = width.min(r.width.saturating_sub(2)).max(10);
    height = height.min(r.height.saturating_sub(2)).max(3);

    let x = r.x + (r.width.saturating_sub(width) / 2);
    let y = r.y + (r.height.saturating_sub(height) / 2);
    Rect {
        x,
        y,
        width,
        height,
    }
}

fn controls_text(scrub_seconds: u64) -> String {
    format!(
        "[j/k] up/down | [enter] play selected | [space] play/pause | [h/l] prev/next | \
         [H/L] scrub -/+{scrub_seconds}s | [m] mode | [-/+] volume | [d] remove | [r] rename | [q] quit"
    )
}

/// Render the entire UI into the provided `frame`.
pub fn draw(
    frame: &mut Frame,
    playlist: &Playlist,
    snapshot: PlayerSnapshot,
    state: &UiState,
    settings: &Settings,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.area());

    // Header
    let header = Paragraph::new(settings.ui.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rondo ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[0]);

    // Status box
    let status = {
        let mut parts: Vec<String> = Vec::new();

        match snapshot.current {
            Some(index) => {
                let label = if snapshot.playing { "Playing" } else { "Paused" };
                let song = playlist
                    .get(index)
                    .map(|t| t.display_title().to_string())
                    .unwrap_or_default();
                parts.push(format!(
                    "{label}: {song} [{} / {}]",
                    format_mmss(snapshot.position),
                    format_mmss(snapshot.duration)
                ));
            }
            None => parts.push("Stopped".to_string()),
        }

        parts.push(format!("Mode: {}", mode_label(snapshot.mode)));
        parts.push(format!("Volume: {}%", snapshot.volume));

        if let Some(notice) = &state.notice {
            parts.push(notice.clone());
        }

        parts.join(" | ")
    };

    let status_par = Paragraph::new(status)
        .block(
            Block::bordered()
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                })
                .title(" status "),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(status_par, chunks[1]);

    // Playlist
    let items: Vec<ListItem> = playlist
        .iter()
        .enumerate()
        .map(|(i, track)| {
            let marker = if snapshot.current == Some(i) {
                "> "
            } else {
                "  "
            };
            ListItem::new(format!("{marker}{}", track.display_title()))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(" playlist "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
    let mut list_state = ratatui::widgets::ListState::default();
    if !playlist.is_empty() {
        list_state.select(Some(state.selected.min(playlist.len() - 1)));
    }
    frame.render_stateful_widget(list, chunks[2], &mut list_state);

    // Rename prompt overlays the playlist.
    if let Some(buffer) = &state.rename {
        let popup_area = centered_rect_sized(48, 3, chunks[2]);
        frame.render_widget(Clear, popup_area);
        let prompt = Paragraph::new(buffer.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" rename (enter saves, esc cancels) "),
        );
        frame.render_widget(prompt, popup_area);
    }

    let footer = Paragraph::new(controls_text(settings.controls.scrub_seconds))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" controls ")
                .padding(Padding {
                    left: 1,
                    right: 0,
                    top: 0,
                    bottom: 0,
                }),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(footer, chunks[3]);
}
