//! Terminal event handling using crossterm EventStream.

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyModifiers};
use futures::StreamExt;

/// High-level actions the TUI can perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    NextStep,
    PrevStep,
    GoToStep(u8),
    FocusNext,
    FocusPrev,
    CheckHealth,
    Reset,
    DismissToast,
    ToggleHelp,
    ScrollUp,
    ScrollDown,
}

/// A key press inside a selector list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKey {
    Up,
    Down,
    Toggle,
    Activate,
}

/// Reads terminal events asynchronously using crossterm's EventStream.
pub struct EventHandler {
    stream: EventStream,
}

impl EventHandler {
    pub fn new() -> Self {
        Self {
            stream: EventStream::new(),
        }
    }

    /// Read the next terminal event. Returns None if the stream ends.
    pub async fn next(&mut self) -> Option<Event> {
        self.stream.next().await.and_then(|r| r.ok())
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Map a key event to an Action regardless of focus.
/// Returns None if the event should be passed to the focused field.
pub fn map_global_key(event: &KeyEvent) -> Option<Action> {
    match (event.modifiers, event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('q')) => Some(Action::Quit),
        (KeyModifiers::CONTROL, KeyCode::Char('n')) => Some(Action::NextStep),
        (KeyModifiers::CONTROL, KeyCode::Char('p')) => Some(Action::PrevStep),
        (_, KeyCode::PageDown) => Some(Action::NextStep),
        (_, KeyCode::PageUp) => Some(Action::PrevStep),
        (KeyModifiers::ALT, KeyCode::Char(c @ '1'..='6')) => {
            Some(Action::GoToStep(c as u8 - b'0'))
        }
        (KeyModifiers::CONTROL, KeyCode::Char('t')) => Some(Action::CheckHealth),
        (KeyModifiers::CONTROL, KeyCode::Char('r')) => Some(Action::Reset),
        (KeyModifiers::CONTROL, KeyCode::Char('x')) => Some(Action::DismissToast),
        (_, KeyCode::Tab) => Some(Action::FocusNext),
        (_, KeyCode::BackTab) => Some(Action::FocusPrev),
        (_, KeyCode::F(1)) => Some(Action::ToggleHelp),
        (KeyModifiers::SHIFT, KeyCode::Up) => Some(Action::ScrollUp),
        (KeyModifiers::SHIFT, KeyCode::Down) => Some(Action::ScrollDown),
        _ => None,
    }
}

/// Map key events when a selector list has focus.
pub fn map_list_key(event: &KeyEvent) -> Option<ListKey> {
    match event.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ListKey::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(ListKey::Down),
        KeyCode::Char(' ') => Some(ListKey::Toggle),
        KeyCode::Enter => Some(ListKey::Activate),
        _ => None,
    }
}

/// Clean up a pasted path. Terminals paste dropped files quoted or with
/// escaped spaces, sometimes with a trailing newline. `file://` URIs are
/// percent-decoded.
pub fn clean_pasted_path(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .or_else(|| {
            trimmed
                .strip_prefix('"')
                .and_then(|t| t.strip_suffix('"'))
        })
        .unwrap_or(trimmed);
    if let Some(uri_path) = unquoted.strip_prefix("file://") {
        return match urlencoding::decode(uri_path) {
            Ok(decoded) => decoded.into_owned(),
            Err(_) => uri_path.to_string(),
        };
    }
    unquoted.replace("\\ ", " ")
}
