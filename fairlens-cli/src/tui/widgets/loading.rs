//! Loading overlay shown while any request is in flight.

use super::centered_rect;
use crate::tui::theme::Theme;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use std::time::Instant;

/// Spinner frames for animation.
const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Animation state for the overlay.
#[derive(Debug, Clone, Default)]
pub struct LoadingState {
    /// Animation frame counter (for spinner).
    pub tick: usize,
    /// When the overlay became visible.
    pub started_at: Option<Instant>,
}

impl LoadingState {
    /// Track overlay visibility; the timer restarts each time it appears.
    pub fn update(&mut self, busy: bool) {
        match (busy, self.started_at) {
            (true, None) => self.started_at = Some(Instant::now()),
            (false, Some(_)) => self.started_at = None,
            _ => {}
        }
    }

    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.started_at
            .map(|s| s.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }
}

/// Render the overlay. `pending` counts requests still running.
pub fn render_loading(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    pending: usize,
    state: &LoadingState,
    theme: &Theme,
) {
    if area.width < 20 || area.height < 5 {
        return;
    }
    let width = (label.chars().count() as u16 + 16).clamp(30, area.width);
    let popup = centered_rect(width, 5, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.field_border(true))
        .style(theme.base_style());

    let mut lines = vec![Line::from(vec![
        Span::styled(
            format!(" {} ", state.spinner()),
            theme.title_style().add_modifier(Modifier::BOLD),
        ),
        Span::styled(label.to_string(), theme.base_style()),
    ])];
    let mut detail = format!(" {:.1}s", state.elapsed_secs());
    if pending > 1 {
        detail.push_str(&format!("  ({} requests)", pending));
    }
    lines.push(Line::from(Span::styled(detail, theme.muted_style())));

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}
