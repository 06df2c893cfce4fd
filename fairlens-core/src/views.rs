//! View models: server results turned into the labelled, formatted values
//! the terminal renders. No I/O happens here.

use crate::config::MissingMetricPolicy;
use crate::types::{
    AttributeMetrics, BiasAnalysis, ComparisonResult, DatasetSummary, MitigationResult,
    ModelSummary, RegressionMetrics,
};
use std::path::PathBuf;

pub const NO_METRICS: &str = "No bias metrics available";
pub const NO_PLOTS: &str = "No visualizations available";
pub const PLOT_UNAVAILABLE: &str = "Plot not available";

/// Group digits in threes, e.g. `12345` -> `12,345`.
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Dataset summary as shown after a successful upload.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetView {
    pub rows: u64,
    pub cols: u64,
    pub rows_display: String,
    /// One tag per column, in server order.
    pub column_tags: Vec<String>,
    /// `"{col}: {count} missing"` lines; empty means the section is hidden.
    pub missing: Vec<String>,
}

impl DatasetView {
    pub fn new(summary: &DatasetSummary) -> Self {
        Self {
            rows: summary.rows,
            cols: summary.cols,
            rows_display: format_thousands(summary.rows),
            column_tags: summary.columns.clone(),
            missing: summary
                .missing_values
                .iter()
                .map(|(col, count)| format!("{}: {} missing", col, count))
                .collect(),
        }
    }

    pub fn shows_missing(&self) -> bool {
        !self.missing.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModelView {
    pub rmse: String,
    pub predictions: String,
    pub load_method: String,
}

impl ModelView {
    pub fn new(summary: &ModelSummary) -> Self {
        Self {
            rmse: format!("{:.4}", summary.rmse),
            predictions: summary.predictions_display(),
            load_method: summary.load_method_display().to_string(),
        }
    }
}

/// Format an optional statistic at three decimals under `policy`.
pub fn format_optional_metric(value: Option<f64>, policy: MissingMetricPolicy) -> String {
    match (value, policy) {
        (Some(v), _) => format!("{:.3}", v),
        (None, MissingMetricPolicy::Zero) => format!("{:.3}", 0.0),
        (None, MissingMetricPolicy::NotAvailable) => "N/A".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupMeanRow {
    pub group: String,
    pub mean: String,
    pub count: String,
}

/// One protected attribute's fairness statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricsPanel {
    pub attribute: String,
    /// Label/value pairs, always the same four rows in the same order.
    pub stats: Vec<(&'static str, String)>,
    pub group_means: Option<Vec<GroupMeanRow>>,
}

impl MetricsPanel {
    pub fn new(attribute: &str, metrics: &AttributeMetrics, policy: MissingMetricPolicy) -> Self {
        let stats = vec![
            ("Disparate Impact", format!("{:.3}", metrics.disparate_impact)),
            (
                "Statistical Parity Diff",
                format!("{:.3}", metrics.statistical_parity_diff),
            ),
            (
                "Equal Opportunity Diff",
                format_optional_metric(metrics.equal_opportunity_diff, policy),
            ),
            (
                "Average Odds Diff",
                format_optional_metric(metrics.average_odds_diff, policy),
            ),
        ];
        let group_means = metrics.group_means.as_ref().map(|means| {
            means
                .iter()
                .map(|(group, mean)| GroupMeanRow {
                    group: group.clone(),
                    mean: format!("{:.3}", mean),
                    count: metrics
                        .group_counts
                        .as_ref()
                        .and_then(|counts| counts.get(group))
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "N/A".to_string()),
                })
                .collect()
        });
        Self {
            attribute: attribute.to_string(),
            stats,
            group_means,
        }
    }
}

/// Last `/` segment of a plot path.
pub fn plot_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// A plot name that can be saved as a single file inside the plots directory.
pub fn is_safe_plot_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

/// `disparate_impact_gender.png` -> `Disparate Impact Gender`.
pub fn format_plot_name(file_name: &str) -> String {
    file_name
        .replace('_', " ")
        .replacen(".png", "", 1)
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlotState {
    Loading,
    Saved { path: PathBuf, size: usize },
    /// The image could not be fetched; the card shows a placeholder.
    Unavailable,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlotCard {
    pub name: String,
    pub title: String,
    pub state: PlotState,
}

impl PlotCard {
    /// A card whose name cannot be a file name is unavailable from the start
    /// and is never fetched.
    pub fn new(path: &str) -> Self {
        let name = plot_name(path).to_string();
        let state = if is_safe_plot_name(&name) {
            PlotState::Loading
        } else {
            tracing::warn!(plot = %path, "Ignoring plot with unusable file name");
            PlotState::Unavailable
        };
        Self {
            title: format_plot_name(&name),
            name,
            state,
        }
    }

    /// Body text of the card.
    pub fn body(&self) -> String {
        match &self.state {
            PlotState::Loading => "Loading...".to_string(),
            PlotState::Saved { path, size } => {
                format!("Saved to {} ({} bytes)", path.display(), size)
            }
            PlotState::Unavailable => PLOT_UNAVAILABLE.to_string(),
        }
    }
}

/// Full analysis display: metrics panels and plot cards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisView {
    pub panels: Vec<MetricsPanel>,
    pub plots: Vec<PlotCard>,
}

impl AnalysisView {
    pub fn new(analysis: &BiasAnalysis, policy: MissingMetricPolicy) -> Self {
        Self {
            panels: analysis
                .metrics
                .iter()
                .map(|(attr, metrics)| MetricsPanel::new(attr, metrics, policy))
                .collect(),
            plots: analysis.plots.iter().map(|p| PlotCard::new(p)).collect(),
        }
    }

    /// Cards are addressed by position; two plots may share a file name.
    pub fn plot_at_mut(&mut self, index: usize) -> Option<&mut PlotCard> {
        self.plots.get_mut(index)
    }

    /// Position and name of every card still waiting for its image.
    pub fn pending_plots(&self) -> Vec<(usize, String)> {
        self.plots
            .iter()
            .enumerate()
            .filter(|(_, p)| p.state == PlotState::Loading)
            .map(|(i, p)| (i, p.name.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MitigationView {
    pub technique: String,
    pub model: String,
    pub rmse: String,
}

impl MitigationView {
    pub fn new(result: &MitigationResult) -> Self {
        Self {
            technique: result.technique.clone(),
            model: result.model.clone(),
            rmse: format!("{:.4}", result.rmse),
        }
    }
}

fn regression_rows(m: &RegressionMetrics) -> Vec<(&'static str, String)> {
    vec![
        ("RMSE", format!("{:.4}", m.rmse)),
        ("MAE", format!("{:.4}", m.mae)),
        ("R² Score", format!("{:.4}", m.r2)),
    ]
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupPairRow {
    pub group: String,
    pub biased_rmse: String,
    pub fair_rmse: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCard {
    pub attribute: String,
    pub groups: Vec<GroupPairRow>,
}

/// Biased vs fair model comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonView {
    pub biased: Vec<(&'static str, String)>,
    pub fair: Vec<(&'static str, String)>,
    pub groups: Vec<GroupCard>,
}

impl ComparisonView {
    pub fn new(result: &ComparisonResult) -> Self {
        Self {
            biased: regression_rows(&result.overall_metrics.biased),
            fair: regression_rows(&result.overall_metrics.fair),
            groups: result
                .group_metrics
                .iter()
                .map(|(attr, groups)| GroupCard {
                    attribute: attr.clone(),
                    groups: groups
                        .iter()
                        .map(|(group, m)| GroupPairRow {
                            group: group.clone(),
                            biased_rmse: format!("{:.4}", m.biased_rmse),
                            fair_rmse: format!("{:.4}", m.fair_rmse),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;

    fn metrics() -> AttributeMetrics {
        AttributeMetrics {
            disparate_impact: 0.81234,
            statistical_parity_diff: -0.05,
            equal_opportunity_diff: None,
            average_odds_diff: Some(0.1),
            group_means: None,
            group_counts: None,
        }
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_dataset_view_counts_and_tags() {
        let summary = DatasetSummary {
            columns: (0..9).map(|i| format!("c{}", i)).collect(),
            rows: 10,
            cols: 9,
            missing_values: IndexMap::new(),
        };
        let view = DatasetView::new(&summary);
        assert_eq!(view.rows, 10);
        assert_eq!(view.cols, 9);
        assert_eq!(view.column_tags.len(), 9);
        assert!(!view.shows_missing());
    }

    #[test]
    fn test_dataset_view_missing_lines() {
        let mut missing = IndexMap::new();
        missing.insert("age".to_string(), 3);
        let summary = DatasetSummary {
            columns: vec!["age".into()],
            rows: 1,
            cols: 1,
            missing_values: missing,
        };
        assert_eq!(DatasetView::new(&summary).missing, vec!["age: 3 missing"]);
    }

    #[test]
    fn test_missing_metric_policy() {
        let zero = MetricsPanel::new("gender", &metrics(), MissingMetricPolicy::Zero);
        assert_eq!(
            zero.stats,
            vec![
                ("Disparate Impact", "0.812".to_string()),
                ("Statistical Parity Diff", "-0.050".to_string()),
                ("Equal Opportunity Diff", "0.000".to_string()),
                ("Average Odds Diff", "0.100".to_string()),
            ]
        );
        let na = MetricsPanel::new("gender", &metrics(), MissingMetricPolicy::NotAvailable);
        assert_eq!(na.stats[2].1, "N/A");
        assert_eq!(na.stats[3].1, "0.100");
    }

    #[test]
    fn test_group_means_with_missing_count() {
        let mut m = metrics();
        let mut means = IndexMap::new();
        means.insert("0".to_string(), 60.25);
        means.insert("1".to_string(), 70.0);
        let mut counts = IndexMap::new();
        counts.insert("0".to_string(), 5);
        m.group_means = Some(means);
        m.group_counts = Some(counts);

        let panel = MetricsPanel::new("gender", &m, MissingMetricPolicy::Zero);
        let rows = panel.group_means.unwrap();
        assert_eq!(rows[0].mean, "60.250");
        assert_eq!(rows[0].count, "5");
        assert_eq!(rows[1].count, "N/A");
    }

    #[test]
    fn test_plot_names() {
        assert_eq!(plot_name("outputs/plots/group_means_gender.png"), "group_means_gender.png");
        assert_eq!(plot_name("solo.png"), "solo.png");
        assert_eq!(format_plot_name("group_means_gender.png"), "Group Means Gender");
        assert_eq!(format_plot_name("x__y.png"), "X  Y");
    }

    #[test]
    fn test_analysis_view_pending_plots() {
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec!["a/one.png".into(), "a/two.png".into()],
        };
        let mut view = AnalysisView::new(&analysis, MissingMetricPolicy::Zero);
        assert_eq!(
            view.pending_plots(),
            vec![(0, "one.png".to_string()), (1, "two.png".to_string())]
        );
        view.plot_at_mut(0).unwrap().state = PlotState::Unavailable;
        assert_eq!(view.pending_plots(), vec![(1, "two.png".to_string())]);
        assert_eq!(view.plots[0].body(), PLOT_UNAVAILABLE);
    }

    #[test]
    fn test_unsafe_plot_names_are_never_fetched() {
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec![
                "outputs/..".into(),
                "outputs/".into(),
                "a\\b.png".into(),
                "outputs/ok.png".into(),
            ],
        };
        let view = AnalysisView::new(&analysis, MissingMetricPolicy::Zero);
        assert_eq!(view.pending_plots(), vec![(3, "ok.png".to_string())]);
        assert!(view.plots[..3].iter().all(|p| p.state == PlotState::Unavailable));
        assert!(!is_safe_plot_name("."));
        assert!(is_safe_plot_name("disparate_impact_gender.png"));
    }

    #[test]
    fn test_metrics_panels_keep_server_order() {
        let body = r#"{"metrics":{
            "region":{"disparate_impact":0.7,"statistical_parity_diff":0.2},
            "gender":{"disparate_impact":0.9,"statistical_parity_diff":0.1,
                      "group_means":{"1":60.0,"0":55.0},"group_counts":{"1":4,"0":6}}
        },"plots":[]}"#;
        let analysis = BiasAnalysis::from_body(body).unwrap();
        let view = AnalysisView::new(&analysis, MissingMetricPolicy::Zero);
        let attrs: Vec<&str> = view.panels.iter().map(|p| p.attribute.as_str()).collect();
        assert_eq!(attrs, vec!["region", "gender"]);
        let groups: Vec<String> = view.panels[1]
            .group_means
            .as_ref()
            .unwrap()
            .iter()
            .map(|r| r.group.clone())
            .collect();
        assert_eq!(groups, vec!["1", "0"]);
    }
}
