//! Header bar widget showing service connectivity and the current step.

use crate::tui::theme::Theme;
use fairlens_core::Step;
use fairlens_core::session::ApiStatus;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

/// Data needed to render the header bar.
#[derive(Debug, Clone)]
pub struct HeaderData {
    pub api_status: ApiStatus,
    pub base_url: String,
    pub step: Step,
    pub busy: bool,
}

impl HeaderData {
    /// `Step 4 of 6`
    pub fn step_display(&self) -> String {
        format!("Step {} of {}", self.step.number(), Step::ALL.len())
    }
}

/// Render the header bar.
pub fn render_header(frame: &mut Frame, area: Rect, data: &HeaderData, theme: &Theme) {
    let status_indicator = if data.busy { "⟳" } else { "●" };
    let status_color = match data.api_status {
        ApiStatus::Connected => theme.success_fg,
        ApiStatus::Disconnected => theme.error_fg,
        ApiStatus::Unknown => theme.warning_fg,
    };
    let separator = || Span::styled(" │ ", theme.header_style().fg(theme.border_color));

    let spans = vec![
        Span::styled(
            format!(" {} FairLens", status_indicator),
            theme
                .header_style()
                .add_modifier(Modifier::BOLD)
                .fg(theme.accent),
        ),
        separator(),
        Span::styled(
            format!("API: {}", data.api_status.label()),
            theme.header_style().fg(status_color),
        ),
        separator(),
        Span::styled(data.base_url.clone(), theme.header_style()),
        separator(),
        Span::styled(
            data.step_display(),
            theme.header_style().add_modifier(Modifier::BOLD),
        ),
    ];

    let header = Paragraph::new(Line::from(spans)).style(theme.header_style());
    frame.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data() -> HeaderData {
        HeaderData {
            api_status: ApiStatus::Connected,
            base_url: "http://127.0.0.1:8000/".to_string(),
            step: Step::AnalyzeBias,
            busy: false,
        }
    }

    #[test]
    fn test_step_display() {
        assert_eq!(data().step_display(), "Step 4 of 6");
    }

    #[test]
    fn test_render_header_shows_status() {
        let backend = ratatui::backend::TestBackend::new(80, 1);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_header(frame, frame.area(), &data(), &theme))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let text: String = buffer.content().iter().map(|c| c.symbol()).collect();
        assert!(text.contains("API: Connected"));
        assert!(text.contains("Step 4 of 6"));
    }
}
