//! Result panels for each step, built from the core view models.

use crate::tui::theme::Theme;
use fairlens_core::types::Metadata;
use fairlens_core::views::{
    AnalysisView, ComparisonView, DatasetView, MitigationView, ModelView, NO_METRICS, NO_PLOTS,
    PlotState,
};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use std::path::PathBuf;

fn heading<'a>(text: impl Into<String>, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(text.into(), theme.title_style()))
}

fn stat_line<'a>(label: &str, value: &str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {:<26}", label), theme.muted_style()),
        Span::styled(value.to_string(), theme.base_style()),
    ])
}

pub fn dataset_lines<'a>(view: &DatasetView, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        heading("Dataset", theme),
        stat_line("Rows", &view.rows_display, theme),
        stat_line("Columns", &view.cols.to_string(), theme),
        Line::from(""),
    ];
    let mut tags = vec![Span::raw("  ")];
    for col in &view.column_tags {
        tags.push(Span::styled(format!(" {} ", col), theme.tag_style()));
        tags.push(Span::raw(" "));
    }
    lines.push(Line::from(tags));
    if view.shows_missing() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Missing values",
            Style::default().fg(theme.warning_fg).add_modifier(Modifier::BOLD),
        )));
        lines.extend(
            view.missing
                .iter()
                .map(|m| Line::from(Span::styled(format!("  {}", m), theme.base_style()))),
        );
    }
    lines
}

pub fn metadata_lines<'a>(metadata: &Metadata, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        heading("Saved metadata", theme),
        stat_line("Target", &metadata.target, theme),
        stat_line("Protected", &metadata.protected.join(", "), theme),
        stat_line("Features", &metadata.features.join(", "), theme),
    ]
}

pub fn model_lines<'a>(view: &ModelView, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        heading("Model", theme),
        stat_line("RMSE", &view.rmse, theme),
        stat_line("Predictions", &view.predictions, theme),
        stat_line("Load method", &view.load_method, theme),
    ]
}

pub fn analysis_lines<'a>(view: &AnalysisView, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = Vec::new();
    if view.panels.is_empty() {
        lines.push(Line::from(Span::styled(NO_METRICS, theme.muted_style())));
    }
    for panel in &view.panels {
        lines.push(heading(panel.attribute.clone(), theme));
        for (label, value) in &panel.stats {
            lines.push(stat_line(label, value, theme));
        }
        if let Some(means) = &panel.group_means {
            lines.push(Line::from(Span::styled("  Group means", theme.muted_style())));
            for row in means {
                lines.push(Line::from(Span::styled(
                    format!("    {}: {} (n={})", row.group, row.mean, row.count),
                    theme.base_style(),
                )));
            }
        }
        lines.push(Line::from(""));
    }
    lines.push(heading("Visualizations", theme));
    if view.plots.is_empty() {
        lines.push(Line::from(Span::styled(NO_PLOTS, theme.muted_style())));
    }
    for plot in &view.plots {
        let body_style = match plot.state {
            PlotState::Loading => theme.muted_style(),
            PlotState::Saved { .. } => theme.success_style(),
            PlotState::Unavailable => theme.error_style(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {:<32}", plot.title), theme.base_style()),
            Span::styled(plot.body(), body_style),
        ]));
    }
    lines
}

pub fn mitigation_lines<'a>(view: &MitigationView, theme: &Theme) -> Vec<Line<'a>> {
    vec![
        heading("Mitigation applied", theme),
        stat_line("Technique", &view.technique, theme),
        stat_line("Model", &view.model, theme),
        stat_line("RMSE", &view.rmse, theme),
    ]
}

pub fn comparison_lines<'a>(view: &ComparisonView, theme: &Theme) -> Vec<Line<'a>> {
    let mut lines = vec![
        heading("Overall metrics", theme),
        Line::from(Span::styled(
            format!("  {:<12}{:>12}{:>12}", "", "Biased", "Fair"),
            theme.muted_style(),
        )),
    ];
    for ((label, biased), (_, fair)) in view.biased.iter().zip(&view.fair) {
        lines.push(Line::from(Span::styled(
            format!("  {:<12}{:>12}{:>12}", label, biased, fair),
            theme.base_style(),
        )));
    }
    for card in &view.groups {
        lines.push(Line::from(""));
        lines.push(heading(format!("RMSE by {}", card.attribute), theme));
        for row in &card.groups {
            lines.push(Line::from(Span::styled(
                format!("  {:<12}{:>12}{:>12}", row.group, row.biased_rmse, row.fair_rmse),
                theme.base_style(),
            )));
        }
    }
    lines
}

pub fn downloads_lines<'a>(downloads: &[PathBuf], theme: &Theme) -> Vec<Line<'a>> {
    if downloads.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![Line::from(""), heading("Saved files", theme)];
    lines.extend(downloads.iter().map(|p| {
        Line::from(Span::styled(format!("  {}", p.display()), theme.muted_style()))
    }));
    lines
}

/// Render a bordered, scrollable results panel.
pub fn render_results(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'_>>,
    scroll: u16,
    theme: &Theme,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}
