//! reqwest-backed client for the fairness service.

use super::{FairnessApi, FileUpload};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::types::{
    BiasAnalysis, ComparisonResult, DatasetSummary, HealthStatus, Metadata, MitigationRequest,
    MitigationResult, ModelSummary, PredictionKind, error_message,
};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// HTTP client for the fairness service.
///
/// No retries. The request timeout is off unless `api.timeout_secs` is set.
pub struct HttpFairnessClient {
    client: Client,
    base_url: Url,
}

impl HttpFairnessClient {
    /// Create a client from configuration.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut base_url = Url::parse(&config.base_url).map_err(|e| ApiError::InvalidUrl {
            message: format!("{}: {}", config.base_url, e),
        })?;
        // Url::join replaces the last segment unless the path ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| ApiError::Connection {
            message: format!("Failed to create HTTP client: {}", e),
        })?;

        Ok(Self { client, base_url })
    }

    /// Base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a plot image, as the service serves it.
    pub fn plot_url(&self, name: &str) -> Result<Url, ApiError> {
        self.endpoint(&format!("download-plot/{}", urlencoding::encode(name)))
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url.join(path).map_err(|e| ApiError::InvalidUrl {
            message: format!("{}: {}", path, e),
        })
    }

    /// Send and return the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Bytes, ApiError> {
        let response = request.send().await.map_err(|e| ApiError::Connection {
            message: e.to_string(),
        })?;
        let status = response.status();
        let body = response.bytes().await.map_err(|e| ApiError::Connection {
            message: format!("Failed to read response body: {}", e),
        })?;
        debug!(status = status.as_u16(), len = body.len(), "Response received");

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }
        Ok(body)
    }

    async fn send_text(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let body = self.send(request).await?;
        String::from_utf8(body.to_vec()).map_err(|e| ApiError::MalformedResponse {
            message: format!("Invalid response: {}", e),
        })
    }

    async fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "GET");
        self.send_text(self.client.get(url).header("Accept", "application/json"))
            .await
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, "POST json");
        self.send_text(self.client.post(url).json(body)).await
    }

    async fn post_file(&self, path: &str, upload: FileUpload) -> Result<String, ApiError> {
        let url = self.endpoint(path)?;
        debug!(url = %url, file = %upload.file_name, size = upload.bytes.len(), "POST multipart");
        let mime = mime_for(&upload.file_name);
        let part = Part::bytes(upload.bytes.to_vec())
            .file_name(upload.file_name)
            .mime_str(mime)
            .map_err(|e| ApiError::Connection {
                message: format!("MIME error: {}", e),
            })?;
        let form = Form::new().part("file", part);
        self.send_text(self.client.post(url).multipart(form)).await
    }
}

fn mime_for(file_name: &str) -> &'static str {
    if file_name.to_ascii_lowercase().ends_with(".csv") {
        "text/csv"
    } else {
        "application/octet-stream"
    }
}

#[async_trait]
impl FairnessApi for HttpFairnessClient {
    async fn health(&self) -> Result<HealthStatus, ApiError> {
        let body = self.get_text("").await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            message: format!("Invalid response: {}", e),
        })
    }

    async fn upload_dataset(&self, upload: FileUpload) -> Result<DatasetSummary, ApiError> {
        let body = self.post_file("upload-data", upload).await?;
        DatasetSummary::from_body(&body)
    }

    async fn set_metadata(&self, metadata: &Metadata) -> Result<Metadata, ApiError> {
        let body = self.post_json("set-metadata", metadata).await?;
        Metadata::from_body(&body)
    }

    async fn upload_model(&self, upload: FileUpload) -> Result<ModelSummary, ApiError> {
        let body = self.post_file("upload-model", upload).await?;
        ModelSummary::from_body(&body)
    }

    async fn analyze_bias(&self) -> Result<BiasAnalysis, ApiError> {
        let body = self.get_text("analyze-bias").await?;
        BiasAnalysis::from_body(&body)
    }

    async fn fetch_plot(&self, name: &str) -> Result<Bytes, ApiError> {
        let url = self.plot_url(name)?;
        debug!(url = %url, "GET plot");
        self.send(self.client.get(url)).await
    }

    async fn apply_mitigation(
        &self,
        request: &MitigationRequest,
    ) -> Result<MitigationResult, ApiError> {
        let body = self.post_json("apply-mitigation", request).await?;
        MitigationResult::from_body(&body)
    }

    async fn compare_models(&self) -> Result<ComparisonResult, ApiError> {
        let body = self.get_text("compare-models").await?;
        ComparisonResult::from_body(&body)
    }

    async fn download_predictions(&self, kind: PredictionKind) -> Result<Bytes, ApiError> {
        let url = self.endpoint(&format!("download-predictions/{}", kind.as_str()))?;
        debug!(url = %url, "GET predictions");
        self.send(self.client.get(url)).await
    }

    async fn model_card(&self) -> Result<serde_json::Value, ApiError> {
        let body = self.get_text("model-card").await?;
        serde_json::from_str(&body).map_err(|e| ApiError::MalformedResponse {
            message: format!("Invalid response: {}", e),
        })
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(base_url: &str) -> ApiConfig {
        ApiConfig {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = HttpFairnessClient::new(&config("http://localhost:8000/api")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            client.endpoint("analyze-bias").unwrap().as_str(),
            "http://localhost:8000/api/analyze-bias"
        );
    }

    #[test]
    fn test_root_endpoint_is_base() {
        let client = HttpFairnessClient::new(&config("http://localhost:8000")).unwrap();
        assert_eq!(client.endpoint("").unwrap().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_plot_url_encodes_name() {
        let client = HttpFairnessClient::new(&config("http://localhost:8000")).unwrap();
        assert_eq!(
            client.plot_url("group means.png").unwrap().as_str(),
            "http://localhost:8000/download-plot/group%20means.png"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let err = HttpFairnessClient::new(&config("not a url")).err().unwrap();
        assert!(matches!(err, ApiError::InvalidUrl { .. }));
    }

    #[test]
    fn test_mime_for() {
        assert_eq!(mime_for("data.CSV"), "text/csv");
        assert_eq!(mime_for("model.joblib"), "application/octet-stream");
    }
}
