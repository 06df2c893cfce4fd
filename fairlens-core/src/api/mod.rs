//! Client side of the fairness service contract.
//!
//! `FairnessApi` is the seam between the wizard and the network:
//! - `HttpFairnessClient` talks to the real service over reqwest
//! - `MockFairnessApi` returns canned responses and records every call
//!
//! `ApiRequest`/`ApiResponse` carry one call as plain data so the interactive
//! wizard can run it on a background task and hand the outcome back.

pub mod http;
pub mod mock;

use crate::error::ApiError;
use crate::types::{
    BiasAnalysis, ComparisonResult, DatasetSummary, HealthStatus, Metadata, MitigationRequest,
    MitigationResult, ModelSummary, PredictionKind,
};
use async_trait::async_trait;
use bytes::Bytes;

pub use http::HttpFairnessClient;
pub use mock::MockFairnessApi;

/// A file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Bytes,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Operations offered by the remote fairness service.
#[async_trait]
pub trait FairnessApi: Send + Sync {
    /// `GET /`
    async fn health(&self) -> Result<HealthStatus, ApiError>;

    /// `POST /upload-data`
    async fn upload_dataset(&self, upload: FileUpload) -> Result<DatasetSummary, ApiError>;

    /// `POST /set-metadata`
    async fn set_metadata(&self, metadata: &Metadata) -> Result<Metadata, ApiError>;

    /// `POST /upload-model`
    async fn upload_model(&self, upload: FileUpload) -> Result<ModelSummary, ApiError>;

    /// `GET /analyze-bias`
    async fn analyze_bias(&self) -> Result<BiasAnalysis, ApiError>;

    /// `GET /download-plot/{name}`
    async fn fetch_plot(&self, name: &str) -> Result<Bytes, ApiError>;

    /// `POST /apply-mitigation`
    async fn apply_mitigation(
        &self,
        request: &MitigationRequest,
    ) -> Result<MitigationResult, ApiError>;

    /// `GET /compare-models`
    async fn compare_models(&self) -> Result<ComparisonResult, ApiError>;

    /// `GET /download-predictions/{kind}`
    async fn download_predictions(&self, kind: PredictionKind) -> Result<Bytes, ApiError>;

    /// `GET /model-card`
    async fn model_card(&self) -> Result<serde_json::Value, ApiError>;

    /// Client name for logging.
    fn name(&self) -> &str;
}

/// One call to the service, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiRequest {
    Health,
    UploadDataset(FileUpload),
    SetMetadata(Metadata),
    UploadModel(FileUpload),
    AnalyzeBias,
    /// `index` is the plot card's position in the analysis view.
    FetchPlot { index: usize, name: String },
    ApplyMitigation(MitigationRequest),
    CompareModels,
    DownloadPredictions(PredictionKind),
    ModelCard,
}

impl ApiRequest {
    /// Text shown on the loading overlay while this request is in flight.
    pub fn loading_label(&self) -> String {
        match self {
            Self::Health => "Checking API status...".into(),
            Self::UploadDataset(_) => "Uploading dataset...".into(),
            Self::SetMetadata(_) => "Saving metadata...".into(),
            Self::UploadModel(_) => "Uploading model and generating predictions...".into(),
            Self::AnalyzeBias => "Analyzing bias in predictions...".into(),
            Self::FetchPlot { name, .. } => format!("Fetching plot {}...", name),
            Self::ApplyMitigation(_) => "Applying fairness mitigation...".into(),
            Self::CompareModels => "Comparing models...".into(),
            Self::DownloadPredictions(kind) => format!("Downloading {} predictions...", kind),
            Self::ModelCard => "Downloading model card...".into(),
        }
    }

    /// Method and path, for logs.
    pub fn endpoint(&self) -> String {
        match self {
            Self::Health => "GET /".into(),
            Self::UploadDataset(_) => "POST /upload-data".into(),
            Self::SetMetadata(_) => "POST /set-metadata".into(),
            Self::UploadModel(_) => "POST /upload-model".into(),
            Self::AnalyzeBias => "GET /analyze-bias".into(),
            Self::FetchPlot { name, .. } => format!("GET /download-plot/{}", name),
            Self::ApplyMitigation(_) => "POST /apply-mitigation".into(),
            Self::CompareModels => "GET /compare-models".into(),
            Self::DownloadPredictions(kind) => format!("GET /download-predictions/{}", kind),
            Self::ModelCard => "GET /model-card".into(),
        }
    }
}

/// Successful result of an `ApiRequest`; variants pair one-to-one.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse {
    Health(HealthStatus),
    Dataset(DatasetSummary),
    Metadata(Metadata),
    Model(ModelSummary),
    Analysis(BiasAnalysis),
    Plot {
        index: usize,
        name: String,
        bytes: Bytes,
    },
    Mitigation(MitigationResult),
    Comparison(ComparisonResult),
    Predictions { kind: PredictionKind, bytes: Bytes },
    ModelCard(serde_json::Value),
}

/// Run one request against the service.
pub async fn dispatch(api: &dyn FairnessApi, request: ApiRequest) -> Result<ApiResponse, ApiError> {
    let endpoint = request.endpoint();
    tracing::debug!(client = api.name(), endpoint = %endpoint, "Dispatching request");

    let result = match request {
        ApiRequest::Health => api.health().await.map(ApiResponse::Health),
        ApiRequest::UploadDataset(upload) => {
            api.upload_dataset(upload).await.map(ApiResponse::Dataset)
        }
        ApiRequest::SetMetadata(metadata) => {
            api.set_metadata(&metadata).await.map(ApiResponse::Metadata)
        }
        ApiRequest::UploadModel(upload) => api.upload_model(upload).await.map(ApiResponse::Model),
        ApiRequest::AnalyzeBias => api.analyze_bias().await.map(ApiResponse::Analysis),
        ApiRequest::FetchPlot { index, name } => api
            .fetch_plot(&name)
            .await
            .map(|bytes| ApiResponse::Plot { index, name, bytes }),
        ApiRequest::ApplyMitigation(req) => api
            .apply_mitigation(&req)
            .await
            .map(ApiResponse::Mitigation),
        ApiRequest::CompareModels => api.compare_models().await.map(ApiResponse::Comparison),
        ApiRequest::DownloadPredictions(kind) => api
            .download_predictions(kind)
            .await
            .map(|bytes| ApiResponse::Predictions { kind, bytes }),
        ApiRequest::ModelCard => api.model_card().await.map(ApiResponse::ModelCard),
    };

    if let Err(e) = &result {
        tracing::warn!(endpoint = %endpoint, error = %e, "Request failed");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_labels() {
        assert_eq!(
            ApiRequest::UploadDataset(FileUpload::new("a.csv", Vec::new())).loading_label(),
            "Uploading dataset..."
        );
        assert_eq!(
            ApiRequest::AnalyzeBias.loading_label(),
            "Analyzing bias in predictions..."
        );
    }

    #[test]
    fn test_endpoints() {
        assert_eq!(
            ApiRequest::FetchPlot {
                index: 0,
                name: "x.png".into()
            }
            .endpoint(),
            "GET /download-plot/x.png"
        );
        assert_eq!(
            ApiRequest::DownloadPredictions(PredictionKind::Fair).endpoint(),
            "GET /download-predictions/fair"
        );
    }

    #[tokio::test]
    async fn test_dispatch_pairs_plot_name() {
        let api = MockFairnessApi::new().with_plot("a.png", Ok(Bytes::from_static(b"png")));
        let request = ApiRequest::FetchPlot {
            index: 2,
            name: "a.png".into(),
        };
        let response = dispatch(&api, request).await.unwrap();
        assert_eq!(
            response,
            ApiResponse::Plot {
                index: 2,
                name: "a.png".into(),
                bytes: Bytes::from_static(b"png")
            }
        );
    }
}
