//! Wizard progress indicator: one marker per step.

use crate::tui::theme::Theme;
use fairlens_core::navigator::{StepNavigator, StepStatus};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

fn marker(status: StepStatus) -> &'static str {
    match status {
        StepStatus::Completed => "✓",
        StepStatus::Active => "●",
        StepStatus::Pending => "○",
    }
}

pub fn render_stepper(frame: &mut Frame, area: Rect, navigator: &StepNavigator, theme: &Theme) {
    let mut spans = Vec::new();
    for (i, (step, status)) in navigator.progress().into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" ─ ", theme.muted_style()));
        }
        spans.push(Span::styled(
            format!("{} {}", marker(status), step),
            theme.step_style(status),
        ));
    }
    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style()),
    );
    frame.render_widget(paragraph, area);
}
