//! TUI widget modules.

pub mod form;
pub mod header;
pub mod keys_overlay;
pub mod loading;
pub mod results;
pub mod status_bar;
pub mod stepper;
pub mod toasts;

use ratatui::layout::Rect;

/// A `width` x `height` rect centered in `area`, clamped to it.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(centered_rect(40, 4, area), Rect::new(20, 10, 40, 4));
        assert_eq!(centered_rect(100, 30, area), area);
    }
}
