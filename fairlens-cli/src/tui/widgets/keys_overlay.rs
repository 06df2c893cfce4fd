//! Keyboard shortcuts overlay widget.
//!
//! Displays all keyboard shortcuts in a scrollable full-screen overlay.
//! Toggled with F1.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

/// State for the keyboard shortcuts overlay.
#[derive(Debug, Clone, Default)]
pub struct KeysOverlay {
    /// Whether the overlay is visible.
    pub visible: bool,
    /// Scroll offset within the overlay.
    pub scroll_offset: u16,
}

impl KeysOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        if self.visible {
            self.scroll_offset = 0;
        }
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
    }
}

/// Render the keyboard shortcuts overlay.
pub fn render_keys_overlay(frame: &mut Frame, area: Rect, overlay: &KeysOverlay, theme: &Theme) {
    if !overlay.visible || area.width < 20 || area.height < 10 {
        return;
    }

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(" Keyboard Shortcuts [F1 to close] ")
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .style(theme.base_style());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let section_style = theme.title_style().add_modifier(Modifier::BOLD);
    let key_style = Style::default().fg(theme.accent);
    let desc_style = theme.base_style();

    let lines = vec![
        Line::from(Span::styled(" Global", section_style)),
        shortcut_line("  Ctrl+C / Ctrl+Q", "Quit FairLens", key_style, desc_style),
        shortcut_line("  Ctrl+T", "Check service connection", key_style, desc_style),
        shortcut_line("  Ctrl+R", "Reset the session", key_style, desc_style),
        shortcut_line("  Ctrl+X", "Dismiss newest notification", key_style, desc_style),
        Line::from(""),
        Line::from(Span::styled(" Steps", section_style)),
        shortcut_line("  Page Down / Ctrl+N", "Next step", key_style, desc_style),
        shortcut_line("  Page Up / Ctrl+P", "Previous step", key_style, desc_style),
        shortcut_line("  Alt+1 .. Alt+6", "Jump to step", key_style, desc_style),
        shortcut_line("  Shift+Up / Down", "Scroll results", key_style, desc_style),
        Line::from(""),
        Line::from(Span::styled(" Fields", section_style)),
        shortcut_line("  Tab / Shift+Tab", "Next / previous field", key_style, desc_style),
        shortcut_line("  Enter", "Submit path or run button", key_style, desc_style),
        shortcut_line("  Paste or drop a file", "Fill the path field", key_style, desc_style),
        Line::from(""),
        Line::from(Span::styled(" Lists", section_style)),
        shortcut_line("  Up / Down, k / j", "Move cursor", key_style, desc_style),
        shortcut_line("  Space", "Toggle or select option", key_style, desc_style),
        shortcut_line("  Enter", "Select option", key_style, desc_style),
        Line::from(""),
        Line::from(Span::styled(
            " [Up/Down to scroll] [F1/Esc to close]",
            theme.status_bar_style(),
        )),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .scroll((overlay.scroll_offset, 0));

    frame.render_widget(paragraph, inner);
}

fn shortcut_line<'a>(key: &'a str, desc: &'a str, key_style: Style, desc_style: Style) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<24}", key), key_style),
        Span::styled(desc, desc_style),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_default_hidden() {
        let overlay = KeysOverlay::new();
        assert!(!overlay.is_visible());
        assert_eq!(overlay.scroll_offset, 0);
    }

    #[test]
    fn test_overlay_toggle_resets_scroll() {
        let mut overlay = KeysOverlay::new();
        overlay.toggle(); // open
        overlay.scroll_down();
        overlay.scroll_down();
        assert_eq!(overlay.scroll_offset, 2);
        overlay.toggle(); // close
        overlay.toggle(); // re-open
        assert_eq!(overlay.scroll_offset, 0);
    }

    #[test]
    fn test_overlay_scroll_saturates() {
        let mut overlay = KeysOverlay::new();
        overlay.scroll_up();
        assert_eq!(overlay.scroll_offset, 0);
        overlay.scroll_down();
        overlay.scroll_up();
        assert_eq!(overlay.scroll_offset, 0);
    }

    #[test]
    fn test_render_visible_overlay() {
        let backend = ratatui::backend::TestBackend::new(80, 30);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut overlay = KeysOverlay::new();
        overlay.toggle();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_keys_overlay(frame, frame.area(), &overlay, &theme))
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Keyboard Shortcuts"));
        assert!(text.contains("Jump to step"));
    }

    #[test]
    fn test_render_too_small_noop() {
        let backend = ratatui::backend::TestBackend::new(10, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let mut overlay = KeysOverlay::new();
        overlay.toggle();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_keys_overlay(frame, frame.area(), &overlay, &theme))
            .unwrap();
    }
}
