//! Plain-text rendering of wizard results for the scripted subcommands.

use fairlens_core::notify::Toast;
use fairlens_core::views::{
    AnalysisView, ComparisonView, DatasetView, MitigationView, ModelView, NO_METRICS, NO_PLOTS,
};

pub fn toast_line(toast: &Toast) -> String {
    format!("{} {}: {}", toast.kind.icon(), toast.title, toast.message)
}

pub fn dataset_lines(view: &DatasetView) -> Vec<String> {
    let mut lines = vec![
        format!("Rows:    {}", view.rows_display),
        format!("Columns: {}", view.cols),
        format!("Column names: {}", view.column_tags.join(", ")),
    ];
    if view.shows_missing() {
        lines.push("Missing values:".to_string());
        lines.extend(view.missing.iter().map(|m| format!("  {}", m)));
    }
    lines
}

pub fn model_lines(view: &ModelView) -> Vec<String> {
    vec![
        format!("RMSE:        {}", view.rmse),
        format!("Predictions: {}", view.predictions),
        format!("Load method: {}", view.load_method),
    ]
}

pub fn analysis_lines(view: &AnalysisView) -> Vec<String> {
    let mut lines = Vec::new();
    if view.panels.is_empty() {
        lines.push(NO_METRICS.to_string());
    }
    for panel in &view.panels {
        lines.push(format!("[{}]", panel.attribute));
        for (label, value) in &panel.stats {
            lines.push(format!("  {:<24} {}", label, value));
        }
        if let Some(groups) = &panel.group_means {
            lines.push("  Group means:".to_string());
            for row in groups {
                lines.push(format!("    {}: {} (n={})", row.group, row.mean, row.count));
            }
        }
    }
    lines.push("Visualizations:".to_string());
    if view.plots.is_empty() {
        lines.push(format!("  {}", NO_PLOTS));
    }
    for plot in &view.plots {
        lines.push(format!("  {}: {}", plot.title, plot.body()));
    }
    lines
}

pub fn mitigation_lines(view: &MitigationView) -> Vec<String> {
    vec![
        format!("Technique: {}", view.technique),
        format!("Model:     {}", view.model),
        format!("RMSE:      {}", view.rmse),
    ]
}

pub fn comparison_lines(view: &ComparisonView) -> Vec<String> {
    let mut lines = vec![format!("{:<10} {:>12} {:>12}", "", "Biased", "Fair")];
    for ((label, biased), (_, fair)) in view.biased.iter().zip(&view.fair) {
        lines.push(format!("{:<10} {:>12} {:>12}", label, biased, fair));
    }
    for card in &view.groups {
        lines.push(format!("[{}]", card.attribute));
        for row in &card.groups {
            lines.push(format!(
                "  {}: biased {} / fair {}",
                row.group, row.biased_rmse, row.fair_rmse
            ));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlens_core::config::MissingMetricPolicy;
    use fairlens_core::types::{
        AttributeMetrics, BiasAnalysis, ComparisonResult, DatasetSummary, GroupComparison,
        OverallMetrics, RegressionMetrics,
    };
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_dataset_lines_hide_empty_missing() {
        let summary = DatasetSummary {
            columns: vec!["age".into(), "gender".into()],
            rows: 12000,
            cols: 2,
            missing_values: IndexMap::new(),
        };
        assert_eq!(
            dataset_lines(&DatasetView::new(&summary)),
            vec![
                "Rows:    12,000",
                "Columns: 2",
                "Column names: age, gender",
            ]
        );
    }

    #[test]
    fn test_analysis_lines_empty() {
        let view = AnalysisView::new(&BiasAnalysis::default(), MissingMetricPolicy::Zero);
        let lines = analysis_lines(&view);
        assert_eq!(lines[0], NO_METRICS);
        assert_eq!(lines.last().unwrap().trim(), NO_PLOTS);
    }

    #[test]
    fn test_analysis_lines_group_means() {
        let mut means = IndexMap::new();
        means.insert("1".to_string(), 70.0);
        let mut metrics = IndexMap::new();
        metrics.insert(
            "gender".to_string(),
            AttributeMetrics {
                disparate_impact: 1.0,
                statistical_parity_diff: 0.0,
                equal_opportunity_diff: None,
                average_odds_diff: None,
                group_means: Some(means),
                group_counts: None,
            },
        );
        let analysis = BiasAnalysis {
            metrics,
            plots: Vec::new(),
        };
        let view = AnalysisView::new(&analysis, MissingMetricPolicy::NotAvailable);
        let lines = analysis_lines(&view);
        assert!(lines.contains(&"    1: 70.000 (n=N/A)".to_string()));
        assert!(lines.iter().any(|l| l.contains("Equal Opportunity Diff") && l.ends_with("N/A")));
    }

    #[test]
    fn test_comparison_lines() {
        let m = RegressionMetrics {
            rmse: 1.0,
            mae: 0.5,
            r2: 0.25,
        };
        let mut groups = IndexMap::new();
        groups.insert(
            "0".to_string(),
            GroupComparison {
                biased_rmse: 1.5,
                fair_rmse: 1.25,
            },
        );
        let mut group_metrics = IndexMap::new();
        group_metrics.insert("gender".to_string(), groups);
        let result = ComparisonResult {
            overall_metrics: OverallMetrics { biased: m, fair: m },
            group_metrics,
        };
        let lines = comparison_lines(&ComparisonView::new(&result));
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[5], "  0: biased 1.5000 / fair 1.2500");
    }
}
