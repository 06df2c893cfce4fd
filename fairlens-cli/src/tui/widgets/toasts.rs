//! Toast stack, drawn top-right over the step content. Newest on top.

use crate::tui::theme::Theme;
use fairlens_core::notify::Toast;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;

pub fn render_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast], theme: &Theme) {
    if area.width < TOAST_WIDTH || area.height < TOAST_HEIGHT {
        return;
    }
    let x = area.x + area.width - TOAST_WIDTH;
    let mut y = area.y;
    for toast in toasts.iter().rev() {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, TOAST_WIDTH, TOAST_HEIGHT);
        render_toast(frame, rect, toast, theme);
        y += TOAST_HEIGHT;
    }
}

fn render_toast(frame: &mut Frame, area: Rect, toast: &Toast, theme: &Theme) {
    let color = theme.toast_color(toast.kind);
    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            format!(" {} {} ", toast.kind.icon(), toast.title),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
        .title_bottom(Line::from(Span::styled(
            format!(" {} ", toast.shown_at.format("%H:%M:%S")),
            theme.muted_style(),
        )))
        .style(theme.base_style());
    let body = Paragraph::new(toast.message.as_str())
        .wrap(Wrap { trim: true })
        .block(block);
    frame.render_widget(body, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlens_core::notify::ToastStack;

    fn screen_text(terminal: &ratatui::Terminal<ratatui::backend::TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_render_toasts_shows_titles() {
        let mut stack = ToastStack::default();
        stack.success("Success", "Metadata saved successfully");
        stack.error("Upload Failed", "Server error: 500");
        let backend = ratatui::backend::TestBackend::new(100, 20);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_toasts(frame, frame.area(), stack.toasts(), &theme))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("Upload Failed"));
        assert!(text.contains("Metadata saved"));
    }

    #[test]
    fn test_render_toasts_clips_to_area() {
        let mut stack = ToastStack::default();
        stack.info("Old", "first");
        stack.info("New", "second");
        // Room for a single toast only.
        let backend = ratatui::backend::TestBackend::new(60, 5);
        let mut terminal = ratatui::Terminal::new(backend).unwrap();
        let theme = Theme::dark();
        terminal
            .draw(|frame| render_toasts(frame, frame.area(), stack.toasts(), &theme))
            .unwrap();
        let text = screen_text(&terminal);
        assert!(text.contains("New"));
        assert!(!text.contains("Old"));
    }
}
