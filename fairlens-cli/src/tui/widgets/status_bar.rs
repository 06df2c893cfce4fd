//! Status bar widget showing keybinding hints and current mode.

use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// What kind of field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Edit,
    Select,
    Button,
    Busy,
}

impl InputMode {
    /// Short display label for the status bar.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Edit => "EDIT",
            Self::Select => "SELECT",
            Self::Button => "ACTION",
            Self::Busy => "BUSY",
        }
    }

    fn hints(&self) -> &'static str {
        match self {
            Self::Edit => "[Enter] Submit │ Paste/drop a file path │ [Tab] Next field │ [PgUp/PgDn] Step │ [F1] Keys",
            Self::Select => "[↑↓] Move │ [Space] Toggle │ [Tab] Next field │ [PgUp/PgDn] Step │ [F1] Keys",
            Self::Button => "[Enter] Run │ [Tab] Next field │ [PgUp/PgDn] Step │ [Ctrl+Q] Quit",
            Self::Busy => "Waiting for the service… │ [PgUp/PgDn] Step │ [Ctrl+Q] Quit",
        }
    }
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Render the status bar.
pub fn render_status_bar(frame: &mut Frame, area: Rect, mode: InputMode, theme: &Theme) {
    let spans = vec![
        Span::styled(
            format!(" {} ", mode.label()),
            theme
                .status_bar_style()
                .fg(theme.bg)
                .bg(theme.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(" ", theme.status_bar_style()),
        Span::styled(mode.hints(), theme.status_bar_style()),
    ];

    let bar = Paragraph::new(Line::from(spans)).style(theme.status_bar_style());
    frame.render_widget(bar, area);
}
