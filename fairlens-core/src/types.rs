//! Wire types exchanged with the fairness service.
//!
//! Every type here is server-supplied and replaced wholesale on the next
//! matching call. Response decoding checks the shape the client depends on and
//! reports anything else as `ApiError::MalformedResponse`, even on HTTP 200.

use crate::error::ApiError;
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Response of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    #[serde(default)]
    pub status: String,
}

impl HealthStatus {
    pub fn is_running(&self) -> bool {
        self.status == "running"
    }
}

/// Response of `POST /upload-data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub columns: Vec<String>,
    pub rows: u64,
    pub cols: u64,
    pub missing_values: IndexMap<String, u64>,
}

#[derive(Deserialize)]
struct RawDatasetSummary {
    columns: Option<Vec<String>>,
    shape: Option<Vec<u64>>,
    #[serde(default)]
    missing_values: Option<IndexMap<String, u64>>,
}

impl DatasetSummary {
    /// Decode and check that `columns` is a non-empty array and `shape` is present.
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        let raw: RawDatasetSummary = decode(body)?;
        let columns = match raw.columns {
            Some(columns) if !columns.is_empty() => columns,
            _ => {
                return Err(ApiError::MalformedResponse {
                    message: "Invalid response: missing columns data".into(),
                });
            }
        };
        let (rows, cols) = match raw.shape.as_deref() {
            Some([rows, cols, ..]) => (*rows, *cols),
            _ => {
                return Err(ApiError::MalformedResponse {
                    message: "Invalid response: missing shape data".into(),
                });
            }
        };
        Ok(Self {
            columns,
            rows,
            cols,
            missing_values: raw.missing_values.unwrap_or_default(),
        })
    }
}

/// Column roles chosen in the metadata step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub target: String,
    pub protected: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Deserialize)]
struct MetadataEnvelope {
    metadata: Metadata,
}

impl Metadata {
    /// Decode the `{metadata: {...}}` envelope returned by `POST /set-metadata`.
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        let envelope: MetadataEnvelope = decode(body)?;
        Ok(envelope.metadata)
    }
}

/// Response of `POST /upload-model`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub rmse: f64,
    #[serde(default)]
    pub predictions_count: Option<u64>,
    #[serde(default)]
    pub load_method: Option<String>,
}

impl ModelSummary {
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        decode(body)
    }

    pub fn predictions_display(&self) -> String {
        self.predictions_count
            .map(|n| n.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn load_method_display(&self) -> &str {
        self.load_method.as_deref().unwrap_or("standard")
    }
}

/// Fairness statistics for one protected attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeMetrics {
    pub disparate_impact: f64,
    pub statistical_parity_diff: f64,
    #[serde(default)]
    pub equal_opportunity_diff: Option<f64>,
    #[serde(default)]
    pub average_odds_diff: Option<f64>,
    #[serde(default)]
    pub group_means: Option<IndexMap<String, f64>>,
    #[serde(default)]
    pub group_counts: Option<IndexMap<String, u64>>,
}

/// Response of `GET /analyze-bias`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BiasAnalysis {
    #[serde(default)]
    pub metrics: IndexMap<String, AttributeMetrics>,
    #[serde(default)]
    pub plots: Vec<String>,
}

impl BiasAnalysis {
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        decode(body)
    }
}

/// Body of `POST /apply-mitigation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MitigationRequest {
    pub technique: String,
    pub protected_attribute: String,
    pub encoding_method: String,
}

/// Response of `POST /apply-mitigation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MitigationResult {
    pub technique: String,
    pub model: String,
    pub rmse: f64,
}

impl MitigationResult {
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        decode(body)
    }
}

/// Overall regression quality of one model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverallMetrics {
    pub biased: RegressionMetrics,
    pub fair: RegressionMetrics,
}

/// Paired RMSE of the original and mitigated model for one group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupComparison {
    pub biased_rmse: f64,
    pub fair_rmse: f64,
}

/// Response of `GET /compare-models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub overall_metrics: OverallMetrics,
    #[serde(default)]
    pub group_metrics: IndexMap<String, IndexMap<String, GroupComparison>>,
}

impl ComparisonResult {
    pub fn from_body(body: &str) -> Result<Self, ApiError> {
        decode(body)
    }
}

/// Which model's predictions to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionKind {
    Biased,
    Fair,
}

impl PredictionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Biased => "biased",
            Self::Fair => "fair",
        }
    }

    /// File name the downloaded CSV is saved under.
    pub fn file_name(&self) -> String {
        format!("{}_predictions.csv", self.as_str())
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for PredictionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "biased" => Ok(Self::Biased),
            "fair" => Ok(Self::Fair),
            other => Err(format!("unknown prediction type '{}'", other)),
        }
    }
}

/// Extract the message for a non-2xx response: the `detail` field when the
/// body is JSON and carries one, otherwise `Server error: {status}`.
pub fn error_message(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail")?.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("Server error: {}", status))
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::MalformedResponse {
        message: format!("Invalid response: {}", e),
    })
}
