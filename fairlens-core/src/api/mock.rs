//! In-memory `FairnessApi` for tests and offline demos.

use super::{FairnessApi, FileUpload};
use crate::error::ApiError;
use crate::types::{
    BiasAnalysis, ComparisonResult, DatasetSummary, HealthStatus, Metadata, MitigationRequest,
    MitigationResult, ModelSummary, PredictionKind,
};
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Responses {
    health: Option<Result<HealthStatus, ApiError>>,
    dataset: Option<Result<DatasetSummary, ApiError>>,
    metadata: Option<Result<Metadata, ApiError>>,
    model: Option<Result<ModelSummary, ApiError>>,
    analysis: Option<Result<BiasAnalysis, ApiError>>,
    plots: HashMap<String, Result<Bytes, ApiError>>,
    mitigation: Option<Result<MitigationResult, ApiError>>,
    comparison: Option<Result<ComparisonResult, ApiError>>,
    predictions: HashMap<PredictionKind, Result<Bytes, ApiError>>,
    model_card: Option<Result<serde_json::Value, ApiError>>,
}

/// A mock service: each endpoint answers with its configured result, or a
/// connection error when nothing was configured. Calls are recorded.
#[derive(Default)]
pub struct MockFairnessApi {
    responses: Mutex<Responses>,
    calls: Mutex<Vec<String>>,
}

fn unconfigured<T>(endpoint: &str) -> Result<T, ApiError> {
    Err(ApiError::Connection {
        message: format!("no mock response for {}", endpoint),
    })
}

impl MockFairnessApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_health(self, result: Result<HealthStatus, ApiError>) -> Self {
        self.responses.lock().unwrap().health = Some(result);
        self
    }

    pub fn with_dataset(self, result: Result<DatasetSummary, ApiError>) -> Self {
        self.responses.lock().unwrap().dataset = Some(result);
        self
    }

    /// Echo the submitted metadata back, like the real service does.
    pub fn with_metadata_echo(self) -> Self {
        self.responses.lock().unwrap().metadata = None;
        self
    }

    pub fn with_metadata(self, result: Result<Metadata, ApiError>) -> Self {
        self.responses.lock().unwrap().metadata = Some(result);
        self
    }

    pub fn with_model(self, result: Result<ModelSummary, ApiError>) -> Self {
        self.responses.lock().unwrap().model = Some(result);
        self
    }

    pub fn with_analysis(self, result: Result<BiasAnalysis, ApiError>) -> Self {
        self.responses.lock().unwrap().analysis = Some(result);
        self
    }

    pub fn with_plot(self, name: &str, result: Result<Bytes, ApiError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .plots
            .insert(name.to_string(), result);
        self
    }

    pub fn with_mitigation(self, result: Result<MitigationResult, ApiError>) -> Self {
        self.responses.lock().unwrap().mitigation = Some(result);
        self
    }

    pub fn with_comparison(self, result: Result<ComparisonResult, ApiError>) -> Self {
        self.responses.lock().unwrap().comparison = Some(result);
        self
    }

    pub fn with_predictions(self, kind: PredictionKind, result: Result<Bytes, ApiError>) -> Self {
        self.responses
            .lock()
            .unwrap()
            .predictions
            .insert(kind, result);
        self
    }

    pub fn with_model_card(self, result: Result<serde_json::Value, ApiError>) -> Self {
        self.responses.lock().unwrap().model_card = Some(result);
        self
    }

    /// Number of calls made, across all endpoints.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Endpoints called, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, endpoint: impl Into<String>) {
        self.calls.lock().unwrap().push(endpoint.into());
    }
}

#[async_trait]
impl FairnessApi for MockFairnessApi {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        self.record("GET /");
        let responses = self.responses.lock().unwrap();
        responses.health.clone().unwrap_or_else(|| unconfigured("GET /"))
    }

    async fn upload_dataset(&self, upload: FileUpload) -> Result<DatasetSummary, ApiError> {
        self.record(format!("POST /upload-data {}", upload.file_name));
        let responses = self.responses.lock().unwrap();
        responses
            .dataset
            .clone()
            .unwrap_or_else(|| unconfigured("POST /upload-data"))
    }

    async fn set_metadata(&self, metadata: &Metadata) -> Result<Metadata, ApiError> {
        self.record("POST /set-metadata");
        let responses = self.responses.lock().unwrap();
        responses
            .metadata
            .clone()
            .unwrap_or_else(|| Ok(metadata.clone()))
    }

    async fn upload_model(&self, upload: FileUpload) -> Result<ModelSummary, ApiError> {
        self.record(format!("POST /upload-model {}", upload.file_name));
        let responses = self.responses.lock().unwrap();
        responses
            .model
            .clone()
            .unwrap_or_else(|| unconfigured("POST /upload-model"))
    }

    async fn analyze_bias(&self) -> Result<BiasAnalysis, ApiError> {
        self.record("GET /analyze-bias");
        let responses = self.responses.lock().unwrap();
        responses
            .analysis
            .clone()
            .unwrap_or_else(|| unconfigured("GET /analyze-bias"))
    }

    async fn fetch_plot(&self, name: &str) -> Result<Bytes, ApiError> {
        self.record(format!("GET /download-plot/{}", name));
        let responses = self.responses.lock().unwrap();
        responses.plots.get(name).cloned().unwrap_or(Err(ApiError::Server {
            status: 404,
            message: "Plot not found".into(),
        }))
    }

    async fn apply_mitigation(
        &self,
        _request: &MitigationRequest,
    ) -> Result<MitigationResult, ApiError> {
        self.record("POST /apply-mitigation");
        let responses = self.responses.lock().unwrap();
        responses
            .mitigation
            .clone()
            .unwrap_or_else(|| unconfigured("POST /apply-mitigation"))
    }

    async fn compare_models(&self) -> Result<ComparisonResult, ApiError> {
        self.record("GET /compare-models");
        let responses = self.responses.lock().unwrap();
        responses
            .comparison
            .clone()
            .unwrap_or_else(|| unconfigured("GET /compare-models"))
    }

    async fn download_predictions(&self, kind: PredictionKind) -> Result<Bytes, ApiError> {
        self.record(format!("GET /download-predictions/{}", kind));
        let responses = self.responses.lock().unwrap();
        responses
            .predictions
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| unconfigured("GET /download-predictions"))
    }

    async fn model_card(&self) -> Result<serde_json::Value, ApiError> {
        self.record("GET /model-card");
        let responses = self.responses.lock().unwrap();
        responses
            .model_card
            .clone()
            .unwrap_or_else(|| unconfigured("GET /model-card"))
    }

    fn name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unconfigured_endpoint_errors() {
        let api = MockFairnessApi::new();
        let err = api.analyze_bias().await.unwrap_err();
        assert!(matches!(err, ApiError::Connection { .. }));
        assert_eq!(api.call_count(), 1);
    }

    #[tokio::test]
    async fn test_metadata_echoes_by_default() {
        let api = MockFairnessApi::new().with_metadata_echo();
        let metadata = Metadata {
            target: "y".into(),
            protected: vec!["g".into()],
            features: vec!["x".into()],
        };
        assert_eq!(api.set_metadata(&metadata).await.unwrap(), metadata);
    }

    #[tokio::test]
    async fn test_missing_plot_is_404() {
        let api = MockFairnessApi::new();
        let err = api.fetch_plot("nope.png").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(api.calls(), vec!["GET /download-plot/nope.png"]);
    }
}
