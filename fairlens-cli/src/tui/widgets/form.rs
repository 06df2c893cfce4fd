//! Form widgets: a single-line path input, option lists, and a button row.

use crate::tui::theme::Theme;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fairlens_core::wizard::forms::{MultiSelect, SingleSelect};
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use std::path::PathBuf;
use unicode_width::UnicodeWidthStr;

/// Editable single-line text with a character cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInput {
    value: String,
    /// Cursor position in characters, `0..=len`.
    cursor: usize,
}

impl PathInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The entered path, or None when the field is blank.
    pub fn path(&self) -> Option<PathBuf> {
        let trimmed = self.value.trim();
        (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
    }

    /// Replace the contents and put the cursor at the end.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.cursor = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }

    fn byte_index(&self) -> usize {
        self.value
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let idx = self.byte_index();
        self.value.insert(idx, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor == 0 {
            return;
        }
        self.cursor -= 1;
        let idx = self.byte_index();
        self.value.remove(idx);
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.chars().count() {
            let idx = self.byte_index();
            self.value.remove(idx);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.value.chars().count());
    }

    /// Display width of the text before the cursor.
    pub fn cursor_column(&self) -> u16 {
        self.value[..self.byte_index()].width() as u16
    }

    /// Apply an editing key. Returns false when the key is not an edit.
    pub fn handle_key(&mut self, key: &KeyEvent) -> bool {
        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.clear(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => self.insert_char(c),
            (_, KeyCode::Backspace) => self.backspace(),
            (_, KeyCode::Delete) => self.delete(),
            (_, KeyCode::Left) => self.move_left(),
            (_, KeyCode::Right) => self.move_right(),
            (_, KeyCode::Home) => self.cursor = 0,
            (_, KeyCode::End) => self.cursor = self.value.chars().count(),
            _ => return false,
        }
        true
    }
}

/// Render a bordered path input; places the terminal cursor when focused.
pub fn render_path_input(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    input: &PathInput,
    focused: bool,
    theme: &Theme,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(theme.field_border(focused));
    let inner = block.inner(area);
    let content = if input.value().is_empty() && !focused {
        Line::from(Span::styled(
            "Type or paste a file path",
            theme.muted_style(),
        ))
    } else {
        Line::from(Span::styled(input.value().to_string(), theme.base_style()))
    };
    // Keep the cursor visible on long paths.
    let column = input.cursor_column();
    let scroll = column.saturating_sub(inner.width.saturating_sub(1));
    frame.render_widget(Paragraph::new(content).block(block).scroll((0, scroll)), area);
    if focused && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position(Position::new(inner.x + column - scroll, inner.y));
    }
}

fn list_block(title: &str, focused: bool, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(theme.field_border(focused))
}

fn list_state(cursor: usize, focused: bool, len: usize) -> ListState {
    ListState::default().with_selected((focused && len > 0).then(|| cursor.min(len - 1)))
}

/// Render a single-choice list. `(•)` marks the selected option.
pub fn render_single_select(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    select: &SingleSelect,
    cursor: usize,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = if select.options().is_empty() {
        vec![ListItem::new(Span::styled("No options", theme.muted_style()))]
    } else {
        select
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mark = if select.selected_index() == Some(i) { "(•)" } else { "( )" };
                ListItem::new(format!("{} {}", mark, option))
            })
            .collect()
    };
    let mut state = list_state(cursor, focused, select.options().len());
    let list = List::new(items)
        .block(list_block(title, focused, theme))
        .highlight_style(theme.selection_style());
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render a checkbox list.
pub fn render_multi_select(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    select: &MultiSelect,
    cursor: usize,
    focused: bool,
    theme: &Theme,
) {
    let items: Vec<ListItem> = if select.options().is_empty() {
        vec![ListItem::new(Span::styled("No options", theme.muted_style()))]
    } else {
        select
            .options()
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let mark = if select.is_checked(i) { "[x]" } else { "[ ]" };
                ListItem::new(format!("{} {}", mark, option))
            })
            .collect()
    };
    let mut state = list_state(cursor, focused, select.options().len());
    let list = List::new(items)
        .block(list_block(title, focused, theme))
        .highlight_style(theme.selection_style());
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render a row of buttons; `focused` is the index of the focused one.
pub fn render_buttons(
    frame: &mut Frame,
    area: Rect,
    labels: &[&str],
    focused: Option<usize>,
    theme: &Theme,
) {
    let mut spans = Vec::new();
    for (i, label) in labels.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if focused == Some(i) {
            theme.selection_style().add_modifier(Modifier::BOLD)
        } else {
            theme.muted_style()
        };
        spans.push(Span::styled(format!("[ {} ]", label), style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_path_input_editing() {
        let mut input = PathInput::new();
        for c in "data.cvs".chars() {
            input.handle_key(&key(KeyCode::Char(c)));
        }
        input.handle_key(&key(KeyCode::Backspace));
        input.handle_key(&key(KeyCode::Backspace));
        input.handle_key(&key(KeyCode::Char('s')));
        input.handle_key(&key(KeyCode::Char('v')));
        assert_eq!(input.value(), "data.csv");
        input.handle_key(&key(KeyCode::Home));
        input.handle_key(&key(KeyCode::Delete));
        assert_eq!(input.value(), "ata.csv");
        assert!(!input.handle_key(&key(KeyCode::Enter)));
    }

    #[test]
    fn test_path_input_multibyte_cursor() {
        let mut input = PathInput::new();
        input.set("données.csv");
        input.move_left();
        input.move_left();
        input.move_left();
        input.move_left();
        input.insert_char('_');
        assert_eq!(input.value(), "données_.csv");
        assert_eq!(input.cursor_column(), 8);
    }

    #[test]
    fn test_path_blank_is_none() {
        let mut input = PathInput::new();
        assert_eq!(input.path(), None);
        input.set("   ");
        assert_eq!(input.path(), None);
        input.set(" m.pkl ");
        assert_eq!(input.path(), Some(PathBuf::from("m.pkl")));
        input.handle_key(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL));
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_render_form_widgets() {
        let backend = ratatui::backend::TestBackend::new(60, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        let mut single = SingleSelect::new(vec!["age".into(), "score".into()]);
        single.select("score");
        let mut multi = MultiSelect::new(vec!["gender".into(), "region".into()]);
        multi.toggle(1);
        let mut input = PathInput::new();
        input.set("/tmp/data.csv");

        terminal
            .draw(|frame| {
                let top = Rect::new(0, 0, 60, 3);
                render_path_input(frame, top, "Dataset", &input, true, &theme);
                let left = Rect::new(0, 3, 30, 5);
                render_single_select(frame, left, "Target", &single, 0, true, &theme);
                let right = Rect::new(30, 3, 30, 5);
                render_multi_select(frame, right, "Protected", &multi, 0, false, &theme);
                let buttons = Rect::new(0, 9, 60, 1);
                render_buttons(frame, buttons, &["Upload", "Sample"], Some(1), &theme);
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("/tmp/data.csv"));
        assert!(text.contains("(•) score"));
        assert!(text.contains("[x] region"));
        assert!(text.contains("[ Sample ]"));
    }
}
