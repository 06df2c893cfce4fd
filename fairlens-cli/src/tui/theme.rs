//! Theme system for the FairLens TUI.
//!
//! Provides dark and light color palettes, loaded from UiConfig.theme.

use fairlens_core::navigator::StepStatus;
use fairlens_core::notify::ToastKind;
use ratatui::style::{Color, Modifier, Style};

/// Complete color theme for the TUI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // Base colors
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub muted_fg: Color,

    // Status colors
    pub error_fg: Color,
    pub warning_fg: Color,
    pub success_fg: Color,
    pub info_fg: Color,

    // UI chrome
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    pub border_color: Color,
    pub focus_border: Color,
    pub selection_bg: Color,
    pub tag_bg: Color,
}

impl Theme {
    /// Create the default dark theme.
    pub fn dark() -> Self {
        Self {
            name: "dark".to_string(),
            bg: Color::Rgb(30, 30, 46),
            fg: Color::Rgb(205, 214, 244),
            accent: Color::Rgb(137, 180, 250),
            muted_fg: Color::Rgb(127, 132, 156),

            error_fg: Color::Rgb(243, 139, 168),
            warning_fg: Color::Rgb(250, 179, 135),
            success_fg: Color::Rgb(166, 227, 161),
            info_fg: Color::Rgb(137, 180, 250),

            header_bg: Color::Rgb(24, 24, 37),
            header_fg: Color::Rgb(205, 214, 244),
            status_bar_bg: Color::Rgb(24, 24, 37),
            status_bar_fg: Color::Rgb(166, 173, 200),
            border_color: Color::Rgb(69, 71, 90),
            focus_border: Color::Rgb(137, 180, 250),
            selection_bg: Color::Rgb(69, 71, 90),
            tag_bg: Color::Rgb(49, 50, 68),
        }
    }

    /// Create the light theme.
    pub fn light() -> Self {
        Self {
            name: "light".to_string(),
            bg: Color::Rgb(239, 241, 245),
            fg: Color::Rgb(76, 79, 105),
            accent: Color::Rgb(30, 102, 245),
            muted_fg: Color::Rgb(140, 143, 161),

            error_fg: Color::Rgb(210, 15, 57),
            warning_fg: Color::Rgb(254, 100, 11),
            success_fg: Color::Rgb(64, 160, 43),
            info_fg: Color::Rgb(30, 102, 245),

            header_bg: Color::Rgb(220, 224, 232),
            header_fg: Color::Rgb(76, 79, 105),
            status_bar_bg: Color::Rgb(220, 224, 232),
            status_bar_fg: Color::Rgb(92, 95, 119),
            border_color: Color::Rgb(172, 176, 190),
            focus_border: Color::Rgb(30, 102, 245),
            selection_bg: Color::Rgb(188, 192, 204),
            tag_bg: Color::Rgb(204, 208, 218),
        }
    }

    /// Load a theme by name from config. Falls back to dark.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    // -- Convenience style constructors --

    pub fn base_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn header_style(&self) -> Style {
        Style::default().fg(self.header_fg).bg(self.header_bg)
    }

    pub fn status_bar_style(&self) -> Style {
        Style::default()
            .fg(self.status_bar_fg)
            .bg(self.status_bar_bg)
    }

    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted_fg)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error_style(&self) -> Style {
        Style::default()
            .fg(self.error_fg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn success_style(&self) -> Style {
        Style::default().fg(self.success_fg)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border_color)
    }

    /// Border for a form field, highlighted when it has focus.
    pub fn field_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.focus_border)
                .add_modifier(Modifier::BOLD)
        } else {
            self.border_style()
        }
    }

    pub fn selection_style(&self) -> Style {
        Style::default().bg(self.selection_bg).fg(self.fg)
    }

    pub fn tag_style(&self) -> Style {
        Style::default().bg(self.tag_bg).fg(self.fg)
    }

    pub fn toast_color(&self, kind: ToastKind) -> Color {
        match kind {
            ToastKind::Success => self.success_fg,
            ToastKind::Error => self.error_fg,
            ToastKind::Warning => self.warning_fg,
            ToastKind::Info => self.info_fg,
        }
    }

    pub fn step_style(&self, status: StepStatus) -> Style {
        match status {
            StepStatus::Completed => Style::default().fg(self.success_fg),
            StepStatus::Active => Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD),
            StepStatus::Pending => self.muted_style(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_theme_creation() {
        let theme = Theme::dark();
        assert_eq!(theme.name, "dark");
        assert_eq!(theme.bg, Color::Rgb(30, 30, 46));
    }

    #[test]
    fn test_light_theme_creation() {
        let theme = Theme::light();
        assert_eq!(theme.name, "light");
        assert_eq!(theme.bg, Color::Rgb(239, 241, 245));
    }

    #[test]
    fn test_from_name_unknown_defaults_to_dark() {
        let theme = Theme::from_name("solarized");
        assert_eq!(theme.name, "dark");
    }

    #[test]
    fn test_base_style() {
        let theme = Theme::dark();
        let style = theme.base_style();
        assert_eq!(style.fg, Some(theme.fg));
        assert_eq!(style.bg, Some(theme.bg));
    }

    #[test]
    fn test_toast_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.toast_color(ToastKind::Error), theme.error_fg);
        assert_eq!(theme.toast_color(ToastKind::Success), theme.success_fg);
    }

    #[test]
    fn test_active_step_is_bold() {
        let theme = Theme::light();
        let style = theme.step_style(StepStatus::Active);
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(theme.step_style(StepStatus::Pending).fg, Some(theme.muted_fg));
    }
}
