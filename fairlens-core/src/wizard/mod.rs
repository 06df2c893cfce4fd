//! The wizard controller: single owner of session state.
//!
//! A user action becomes a `Command`. `Wizard::prepare` validates it and
//! either rejects it locally (toast, no request) or turns it into an
//! `ApiRequest`. Once the request finishes, `Wizard::apply` folds the outcome
//! into session state and may return follow-up requests (plot fetches after
//! an analysis). `Wizard::run` chains the three for scripted use; the
//! interactive wizard calls them separately so requests run in the background.

pub mod forms;

use crate::api::{ApiRequest, ApiResponse, FairnessApi, FileUpload, dispatch};
use crate::config::FairlensConfig;
use crate::error::{ApiError, FairlensError, Result, ValidationError, ValidationIssue};
use crate::inflight::InFlightTracker;
use crate::navigator::{EntryHook, Step, StepNavigator};
use crate::notify::ToastStack;
use crate::sample;
use crate::session::{ApiStatus, SessionState};
use crate::types::{Metadata, MitigationRequest, PredictionKind};
use crate::validate;
use crate::views::{AnalysisView, PlotState, is_safe_plot_name};
use forms::{MetadataForm, MitigationForm};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub const MODEL_CARD_FILE_NAME: &str = "model_card.json";

/// A user action that may call the service.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CheckHealth,
    UploadDataset { path: Option<PathBuf> },
    SubmitMetadata(Metadata),
    UploadModel { path: Option<PathBuf> },
    AnalyzeBias,
    ApplyMitigation {
        technique: Option<String>,
        protected_attribute: Option<String>,
    },
    CompareModels,
    DownloadPredictions(PredictionKind),
    DownloadModelCard,
}

/// What a finished request was for. Survives the request body being moved
/// into `dispatch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestKind {
    Health,
    UploadDataset,
    SetMetadata,
    UploadModel,
    AnalyzeBias,
    FetchPlot { index: usize, name: String },
    ApplyMitigation,
    CompareModels,
    DownloadPredictions(PredictionKind),
    ModelCard,
}

impl From<&ApiRequest> for RequestKind {
    fn from(request: &ApiRequest) -> Self {
        match request {
            ApiRequest::Health => Self::Health,
            ApiRequest::UploadDataset(_) => Self::UploadDataset,
            ApiRequest::SetMetadata(_) => Self::SetMetadata,
            ApiRequest::UploadModel(_) => Self::UploadModel,
            ApiRequest::AnalyzeBias => Self::AnalyzeBias,
            ApiRequest::FetchPlot { index, name } => Self::FetchPlot {
                index: *index,
                name: name.clone(),
            },
            ApiRequest::ApplyMitigation(_) => Self::ApplyMitigation,
            ApiRequest::CompareModels => Self::CompareModels,
            ApiRequest::DownloadPredictions(kind) => Self::DownloadPredictions(*kind),
            ApiRequest::ModelCard => Self::ModelCard,
        }
    }
}

impl RequestKind {
    /// Toast title when this request fails.
    fn failure_title(&self) -> &'static str {
        match self {
            Self::Health => "API Error",
            Self::UploadDataset | Self::UploadModel => "Upload Failed",
            Self::SetMetadata => "Error",
            Self::AnalyzeBias => "Analysis Failed",
            Self::FetchPlot { .. } => "Plot Unavailable",
            Self::ApplyMitigation => "Mitigation Failed",
            Self::CompareModels => "Comparison Failed",
            Self::DownloadPredictions(_) | Self::ModelCard => "Download Failed",
        }
    }
}

pub struct Wizard {
    api: Arc<dyn FairnessApi>,
    config: FairlensConfig,
    session: SessionState,
    navigator: StepNavigator,
    metadata_form: MetadataForm,
    mitigation_form: MitigationForm,
    toasts: ToastStack,
    inflight: InFlightTracker,
    /// Kinds prepared but not yet applied. Plot fetches are never tracked.
    pending: Vec<RequestKind>,
}

impl Wizard {
    pub fn new(config: FairlensConfig, api: Arc<dyn FairnessApi>) -> Self {
        let toasts = ToastStack::new(
            Duration::from_secs(config.ui.toast_ttl_secs),
            config.ui.max_toasts,
        );
        let mitigation_form = MitigationForm::new(config.mitigation.techniques.clone());
        Self {
            api,
            config,
            session: SessionState::default(),
            navigator: StepNavigator::new(),
            metadata_form: MetadataForm::default(),
            mitigation_form,
            toasts,
            inflight: InFlightTracker::new(),
            pending: Vec::new(),
        }
    }

    pub fn api(&self) -> Arc<dyn FairnessApi> {
        Arc::clone(&self.api)
    }

    pub fn config(&self) -> &FairlensConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_step(&self) -> Step {
        self.navigator.current()
    }

    pub fn navigator(&self) -> &StepNavigator {
        &self.navigator
    }

    pub fn metadata_form(&self) -> &MetadataForm {
        &self.metadata_form
    }

    pub fn metadata_form_mut(&mut self) -> &mut MetadataForm {
        &mut self.metadata_form
    }

    pub fn mitigation_form(&self) -> &MitigationForm {
        &self.mitigation_form
    }

    pub fn mitigation_form_mut(&mut self) -> &mut MitigationForm {
        &mut self.mitigation_form
    }

    pub fn toasts(&self) -> &ToastStack {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastStack {
        &mut self.toasts
    }

    pub fn inflight(&self) -> &InFlightTracker {
        &self.inflight
    }

    /// True while a user-initiated request awaits `apply`.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    // --- navigation ---

    /// Move to `step` and run its entry hook.
    pub fn go_to(&mut self, step: Step) {
        if let Some(hook) = self.navigator.go_to(step) {
            self.run_entry_hook(hook);
        }
    }

    pub fn next_step(&mut self) {
        self.go_to(self.navigator.current().next());
    }

    pub fn prev_step(&mut self) {
        self.go_to(self.navigator.current().prev());
    }

    fn run_entry_hook(&mut self, hook: EntryHook) {
        match hook {
            EntryHook::PopulateMetadata => {
                self.metadata_form = MetadataForm::from_columns(&self.session.uploaded_columns);
            }
            EntryHook::PopulateMitigation => {
                let protected = self
                    .session
                    .metadata
                    .as_ref()
                    .map(|m| m.protected.clone())
                    .unwrap_or_default();
                self.mitigation_form.populate_attributes(&protected);
            }
        }
    }

    /// Final step completed.
    pub fn finish(&mut self) {
        self.toasts.success(
            "Pipeline Complete!",
            "All bias mitigation steps completed successfully",
        );
    }

    /// Discard all session state and return to the first step.
    pub fn reset(&mut self) {
        let api_status = self.session.api_status;
        self.session = SessionState {
            api_status,
            ..Default::default()
        };
        self.navigator = StepNavigator::new();
        self.metadata_form = MetadataForm::default();
        self.mitigation_form = MitigationForm::new(self.config.mitigation.techniques.clone());
        self.toasts.info("Session Reset", "Starting over from step 1");
    }

    // --- local actions ---

    /// Write the bundled sample dataset to the output directory.
    pub fn write_sample(&mut self) -> Result<PathBuf> {
        match sample::write_sample(&self.config.output.dir) {
            Ok(path) => {
                self.toasts.success(
                    "Download Started",
                    format!("Sample CSV saved to {}", path.display()),
                );
                Ok(path)
            }
            Err(e) => {
                self.toasts.error("Download Failed", e.to_string());
                Err(e.into())
            }
        }
    }

    // --- request lifecycle ---

    /// Validate a command and build its request. Local rejections push a
    /// toast and never reach the network.
    ///
    /// A command whose request kind is already pending is rejected until the
    /// earlier outcome has been applied.
    pub fn prepare(&mut self, command: Command) -> Result<ApiRequest> {
        let request = self.build_request(command)?;
        let kind = RequestKind::from(&request);
        if self.pending.contains(&kind) {
            tracing::debug!(endpoint = %request.endpoint(), "Duplicate request dropped");
            self.toasts
                .warning("Please Wait", "The previous request is still running");
            return Err(ValidationError::single(ValidationIssue::RequestPending).into());
        }
        self.pending.push(kind);
        Ok(request)
    }

    fn build_request(&mut self, command: Command) -> Result<ApiRequest> {
        match command {
            Command::CheckHealth => Ok(ApiRequest::Health),
            Command::UploadDataset { path } => {
                let outcome = validate::validate_dataset_file(path.as_deref());
                if let Err(e) = outcome.into_result() {
                    let (title, message) = if e.contains(&ValidationIssue::MissingFile) {
                        ("No File", "Please select a CSV file")
                    } else {
                        ("Invalid File", "Please upload a CSV file")
                    };
                    return Err(self.reject(title, message, e));
                }
                let upload = self.read_upload(path.as_deref())?;
                Ok(ApiRequest::UploadDataset(upload))
            }
            Command::SubmitMetadata(metadata) => {
                let outcome = validate::validate_metadata(
                    &metadata.target,
                    &metadata.protected,
                    &metadata.features,
                );
                if let Err(e) = outcome.into_result() {
                    return Err(self.reject(
                        "Validation Error",
                        "Please fill all required fields",
                        e,
                    ));
                }
                Ok(ApiRequest::SetMetadata(metadata))
            }
            Command::UploadModel { path } => {
                let outcome = validate::validate_model_file(path.as_deref());
                if let Err(e) = outcome.into_result() {
                    let (title, message) = if e.contains(&ValidationIssue::MissingFile) {
                        ("No File", "Please select a model file")
                    } else {
                        ("Invalid File", "Please upload a .joblib, .pkl, or .pickle file")
                    };
                    return Err(self.reject(title, message, e));
                }
                let upload = self.read_upload(path.as_deref())?;
                Ok(ApiRequest::UploadModel(upload))
            }
            Command::AnalyzeBias => Ok(ApiRequest::AnalyzeBias),
            Command::ApplyMitigation {
                technique,
                protected_attribute,
            } => {
                if !self.mitigation_form.is_visible() {
                    self.toasts.warning(
                        "Already Applied",
                        "Mitigation was already applied; reset the session to apply again",
                    );
                    return Err(
                        ValidationError::single(ValidationIssue::MitigationAlreadyApplied).into(),
                    );
                }
                let outcome = validate::validate_mitigation(
                    technique.as_deref(),
                    protected_attribute.as_deref(),
                );
                if let Err(e) = outcome.into_result() {
                    return Err(self.reject(
                        "Validation Error",
                        "Please select technique and attribute",
                        e,
                    ));
                }
                Ok(ApiRequest::ApplyMitigation(MitigationRequest {
                    technique: technique.unwrap_or_default(),
                    protected_attribute: protected_attribute.unwrap_or_default(),
                    encoding_method: self.config.mitigation.encoding_method.clone(),
                }))
            }
            Command::CompareModels => Ok(ApiRequest::CompareModels),
            Command::DownloadPredictions(kind) => Ok(ApiRequest::DownloadPredictions(kind)),
            Command::DownloadModelCard => Ok(ApiRequest::ModelCard),
        }
    }

    fn reject(&mut self, title: &str, message: &str, error: ValidationError) -> FairlensError {
        tracing::debug!(issues = %error, "Rejected locally");
        self.toasts.error(title, message);
        FairlensError::Validation(error)
    }

    fn read_upload(&mut self, path: Option<&Path>) -> Result<FileUpload> {
        // Validation guarantees a path with a file name.
        let path = path.ok_or_else(|| ValidationError::single(ValidationIssue::MissingFile))?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match std::fs::read(path) {
            Ok(bytes) => {
                tracing::info!(file = %file_name, size = bytes.len(), "Uploading file");
                Ok(FileUpload::new(file_name, bytes))
            }
            Err(e) => {
                self.toasts
                    .error("Upload Failed", format!("{}: {}", path.display(), e));
                Err(e.into())
            }
        }
    }

    /// Fold a finished request into session state. Returns follow-up requests.
    pub fn apply(
        &mut self,
        kind: RequestKind,
        result: std::result::Result<ApiResponse, ApiError>,
    ) -> Result<Vec<ApiRequest>> {
        self.pending.retain(|k| k != &kind);
        let response = match result {
            Ok(response) => response,
            Err(e) => return Err(self.fail(kind, e)),
        };

        match response {
            ApiResponse::Health(health) => {
                if health.is_running() {
                    self.session.api_status = ApiStatus::Connected;
                    self.toasts.success("API Connected", "Backend is ready");
                } else {
                    self.session.api_status = ApiStatus::Disconnected;
                    self.toasts.error(
                        "API Error",
                        format!("Backend reported status '{}'", health.status),
                    );
                }
            }
            ApiResponse::Dataset(summary) => {
                self.toasts.success(
                    "Success",
                    format!(
                        "Dataset uploaded: {} rows, {} columns",
                        summary.rows, summary.cols
                    ),
                );
                self.session.uploaded_columns = summary.columns.clone();
                self.session.dataset = Some(summary);
            }
            ApiResponse::Metadata(metadata) => {
                self.session.metadata = Some(metadata);
                self.toasts.success("Success", "Metadata saved successfully");
                self.go_to(Step::UploadModel);
            }
            ApiResponse::Model(summary) => {
                self.session.model = Some(summary);
                self.toasts
                    .success("Success", "Model uploaded and predictions generated");
            }
            ApiResponse::Analysis(analysis) => {
                let view = AnalysisView::new(&analysis, self.config.display.missing_metric);
                let follow_ups = view
                    .pending_plots()
                    .into_iter()
                    .map(|(index, name)| ApiRequest::FetchPlot { index, name })
                    .collect();
                self.session.analysis = Some(view);
                self.toasts
                    .success("Analysis Complete", "Bias analysis finished");
                return Ok(follow_ups);
            }
            ApiResponse::Plot { index, name, bytes } => {
                let state = if !is_safe_plot_name(&name) {
                    tracing::warn!(plot = %name, "Unusable plot file name");
                    PlotState::Unavailable
                } else {
                    let path = self.config.output.plots_dir().join(&name);
                    match write_file(&path, &bytes) {
                        Ok(()) => PlotState::Saved {
                            path,
                            size: bytes.len(),
                        },
                        Err(e) => {
                            tracing::warn!(plot = %name, error = %e, "Failed to save plot");
                            PlotState::Unavailable
                        }
                    }
                };
                self.set_plot_state(index, state);
            }
            ApiResponse::Mitigation(result) => {
                self.toasts.success(
                    "Mitigation Applied",
                    format!("{} applied successfully", result.technique),
                );
                self.session.mitigation = Some(result);
                self.mitigation_form.hide();
            }
            ApiResponse::Comparison(result) => {
                self.session.comparison = Some(result);
                self.toasts
                    .success("Comparison Complete", "Models compared successfully");
            }
            ApiResponse::Predictions { kind, bytes } => {
                let path = self.config.output.dir.join(kind.file_name());
                self.save_download(&path, &bytes, &format!("{} predictions", kind))?;
            }
            ApiResponse::ModelCard(card) => {
                let path = self.config.output.dir.join(MODEL_CARD_FILE_NAME);
                let pretty = serde_json::to_vec_pretty(&card)?;
                self.save_download(&path, &pretty, "Model card")?;
            }
        }
        Ok(Vec::new())
    }

    fn fail(&mut self, kind: RequestKind, error: ApiError) -> FairlensError {
        match &kind {
            RequestKind::FetchPlot { index, .. } => {
                // Only this card degrades; the rest of the analysis stays.
                self.set_plot_state(*index, PlotState::Unavailable);
            }
            RequestKind::Health => {
                self.session.api_status = ApiStatus::Disconnected;
                self.toasts.error(
                    kind.failure_title(),
                    format!("Cannot connect to backend: {}", error),
                );
            }
            _ => {
                self.toasts.error(kind.failure_title(), error.user_message());
            }
        }
        FairlensError::Api(error)
    }

    fn set_plot_state(&mut self, index: usize, state: PlotState) {
        if let Some(card) = self
            .session
            .analysis
            .as_mut()
            .and_then(|a| a.plot_at_mut(index))
        {
            card.state = state;
        }
    }

    fn save_download(&mut self, path: &Path, bytes: &[u8], what: &str) -> Result<()> {
        match write_file(path, bytes) {
            Ok(()) => {
                self.toasts.success(
                    "Download Started",
                    format!("{} saved to {}", what, path.display()),
                );
                self.session.downloads.push(path.to_path_buf());
                Ok(())
            }
            Err(e) => {
                self.toasts.error("Download Failed", e.to_string());
                Err(e.into())
            }
        }
    }

    /// Prepare, dispatch, and apply a command and all its follow-ups, in order.
    ///
    /// A failing plot fetch is not an error for the command as a whole.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        let request = self.prepare(command)?;
        let api = self.api();
        let mut queue = VecDeque::from([request]);

        while let Some(request) = queue.pop_front() {
            let kind = RequestKind::from(&request);
            let result = {
                let _guard = self.inflight.begin(request.loading_label());
                dispatch(api.as_ref(), request).await
            };
            match self.apply(kind.clone(), result) {
                Ok(follow_ups) => queue.extend(follow_ups),
                Err(_) if matches!(kind, RequestKind::FetchPlot { .. }) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockFairnessApi;
    use crate::notify::ToastKind;
    use crate::types::{BiasAnalysis, DatasetSummary, HealthStatus};
    use bytes::Bytes;
    use indexmap::IndexMap;

    fn wizard_with(api: MockFairnessApi, out: &Path) -> (Wizard, Arc<MockFairnessApi>) {
        let api = Arc::new(api);
        let mut config = FairlensConfig::default();
        config.output.dir = out.to_path_buf();
        (Wizard::new(config, api.clone()), api)
    }

    fn summary(cols: &[&str]) -> DatasetSummary {
        DatasetSummary {
            columns: cols.iter().map(|c| c.to_string()).collect(),
            rows: 10,
            cols: cols.len() as u64,
            missing_values: IndexMap::new(),
        }
    }

    #[test]
    fn test_prepare_rejects_non_csv_without_request() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, api) = wizard_with(MockFairnessApi::new(), dir.path());
        let err = wizard
            .prepare(Command::UploadDataset {
                path: Some("data.txt".into()),
            })
            .unwrap_err();
        assert!(matches!(err, FairlensError::Validation(_)));
        assert_eq!(api.call_count(), 0);
        let toast = wizard.toasts().latest().unwrap();
        assert_eq!(toast.kind, ToastKind::Error);
        assert_eq!(toast.title, "Invalid File");
    }

    #[test]
    fn test_prepare_missing_dataset_path() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        assert!(wizard.prepare(Command::UploadDataset { path: None }).is_err());
        assert_eq!(wizard.toasts().latest().unwrap().title, "No File");
    }

    #[test]
    fn test_prepare_unreadable_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let err = wizard
            .prepare(Command::UploadDataset {
                path: Some(dir.path().join("absent.csv")),
            })
            .unwrap_err();
        assert!(matches!(err, FairlensError::Io(_)));
        assert_eq!(wizard.toasts().latest().unwrap().title, "Upload Failed");
    }

    #[test]
    fn test_mitigation_request_carries_encoding() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let request = wizard
            .prepare(Command::ApplyMitigation {
                technique: Some("reweighing".into()),
                protected_attribute: Some("gender".into()),
            })
            .unwrap();
        assert_eq!(
            request,
            ApiRequest::ApplyMitigation(MitigationRequest {
                technique: "reweighing".into(),
                protected_attribute: "gender".into(),
                encoding_method: "label".into(),
            })
        );
    }

    #[test]
    fn test_second_mitigation_rejected_while_first_pending() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let apply = || Command::ApplyMitigation {
            technique: Some("reweighing".into()),
            protected_attribute: Some("gender".into()),
        };
        wizard.prepare(apply()).unwrap();
        assert!(wizard.has_pending());

        let err = wizard.prepare(apply()).unwrap_err();
        match err {
            FairlensError::Validation(v) => assert!(v.contains(&ValidationIssue::RequestPending)),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(wizard.toasts().latest().unwrap().kind, ToastKind::Warning);

        // A different kind may still overlap.
        assert!(wizard.prepare(Command::CompareModels).is_ok());

        let failed = wizard.apply(
            RequestKind::ApplyMitigation,
            Err(ApiError::Connection {
                message: "refused".into(),
            }),
        );
        assert!(failed.is_err());
        assert!(wizard.prepare(apply()).is_ok());
    }

    #[test]
    fn test_dataset_failure_keeps_previous_columns() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        wizard
            .apply(
                RequestKind::UploadDataset,
                Ok(ApiResponse::Dataset(summary(&["a", "b"]))),
            )
            .unwrap();
        let err = wizard.apply(
            RequestKind::UploadDataset,
            Err(ApiError::MalformedResponse {
                message: "Invalid response: missing columns data".into(),
            }),
        );
        assert!(err.is_err());
        assert_eq!(wizard.session().uploaded_columns(), &["a", "b"]);
        let toast = wizard.toasts().latest().unwrap();
        assert_eq!(toast.title, "Upload Failed");
        assert_eq!(toast.message, "Invalid response: missing columns data");
    }

    #[test]
    fn test_metadata_success_advances_to_model_step() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        wizard.go_to(Step::Metadata);
        let metadata = Metadata {
            target: "y".into(),
            protected: vec!["g".into()],
            features: vec!["x".into()],
        };
        wizard
            .apply(RequestKind::SetMetadata, Ok(ApiResponse::Metadata(metadata.clone())))
            .unwrap();
        assert_eq!(wizard.current_step(), Step::UploadModel);
        assert_eq!(wizard.session().metadata(), Some(&metadata));
    }

    #[test]
    fn test_entering_metadata_step_populates_from_columns() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        wizard
            .apply(
                RequestKind::UploadDataset,
                Ok(ApiResponse::Dataset(summary(&["age", "gender"]))),
            )
            .unwrap();
        wizard.metadata_form_mut().protected.toggle(0);
        wizard.next_step();
        assert_eq!(wizard.metadata_form().target.options(), &["age", "gender"]);
        assert!(wizard.metadata_form().protected.selected().is_empty());
    }

    #[test]
    fn test_analysis_returns_plot_follow_ups() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec!["out/a.png".into(), "out/b.png".into()],
        };
        let follow_ups = wizard
            .apply(RequestKind::AnalyzeBias, Ok(ApiResponse::Analysis(analysis)))
            .unwrap();
        assert_eq!(
            follow_ups,
            vec![
                ApiRequest::FetchPlot {
                    index: 0,
                    name: "a.png".into()
                },
                ApiRequest::FetchPlot {
                    index: 1,
                    name: "b.png".into()
                },
            ]
        );
    }

    #[test]
    fn test_plot_saved_to_plots_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec!["a.png".into()],
        };
        wizard
            .apply(RequestKind::AnalyzeBias, Ok(ApiResponse::Analysis(analysis)))
            .unwrap();
        wizard
            .apply(
                RequestKind::FetchPlot {
                    index: 0,
                    name: "a.png".into(),
                },
                Ok(ApiResponse::Plot {
                    index: 0,
                    name: "a.png".into(),
                    bytes: Bytes::from_static(b"\x89PNG"),
                }),
            )
            .unwrap();
        let card = &wizard.session().analysis().unwrap().plots[0];
        assert_eq!(
            card.state,
            PlotState::Saved {
                path: dir.path().join("plots").join("a.png"),
                size: 4
            }
        );
    }

    #[test]
    fn test_duplicate_plot_names_keep_separate_cards() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec!["run1/means.png".into(), "run2/means.png".into()],
        };
        let follow_ups = wizard
            .apply(RequestKind::AnalyzeBias, Ok(ApiResponse::Analysis(analysis)))
            .unwrap();
        assert_eq!(follow_ups.len(), 2);

        let failed = wizard.apply(
            RequestKind::FetchPlot {
                index: 1,
                name: "means.png".into(),
            },
            Err(ApiError::Server {
                status: 404,
                message: "Plot not found".into(),
            }),
        );
        assert!(failed.is_err());
        let plots = &wizard.session().analysis().unwrap().plots;
        assert_eq!(plots.len(), 2);
        assert_eq!(plots[0].state, PlotState::Loading);
        assert_eq!(plots[1].state, PlotState::Unavailable);
    }

    #[test]
    fn test_plot_response_with_dot_dot_name_is_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        let analysis = BiasAnalysis {
            metrics: IndexMap::new(),
            plots: vec!["a.png".into()],
        };
        wizard
            .apply(RequestKind::AnalyzeBias, Ok(ApiResponse::Analysis(analysis)))
            .unwrap();
        wizard
            .apply(
                RequestKind::FetchPlot {
                    index: 0,
                    name: "..".into(),
                },
                Ok(ApiResponse::Plot {
                    index: 0,
                    name: "..".into(),
                    bytes: Bytes::from_static(b"\x89PNG"),
                }),
            )
            .unwrap();
        let card = &wizard.session().analysis().unwrap().plots[0];
        assert_eq!(card.state, PlotState::Unavailable);
        assert!(!dir.path().join("plots").exists());
    }

    #[test]
    fn test_health_not_running_is_disconnected() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        wizard
            .apply(
                RequestKind::Health,
                Ok(ApiResponse::Health(HealthStatus {
                    status: "starting".into(),
                })),
            )
            .unwrap();
        assert_eq!(wizard.session().api_status(), ApiStatus::Disconnected);
    }

    #[test]
    fn test_reset_restores_mitigation_form() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, _) = wizard_with(MockFairnessApi::new(), dir.path());
        wizard.mitigation_form_mut().hide();
        wizard.go_to(Step::Compare);
        wizard.reset();
        assert!(wizard.mitigation_form().is_visible());
        assert_eq!(wizard.current_step(), Step::UploadData);
    }

    #[tokio::test]
    async fn test_run_health_check() {
        let dir = tempfile::tempdir().unwrap();
        let api = MockFairnessApi::new().with_health(Ok(HealthStatus {
            status: "running".into(),
        }));
        let (mut wizard, _) = wizard_with(api, dir.path());
        wizard.run(Command::CheckHealth).await.unwrap();
        assert_eq!(wizard.session().api_status(), ApiStatus::Connected);
        assert!(!wizard.inflight().is_busy());
    }

    #[test]
    fn test_write_sample_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let (mut wizard, api) = wizard_with(MockFairnessApi::new(), dir.path());
        let path = wizard.write_sample().unwrap();
        assert_eq!(path, dir.path().join(sample::SAMPLE_FILE_NAME));
        assert_eq!(api.call_count(), 0);
    }
}
