//! Per-session state, owned by the `Wizard`.
//!
//! Fields are only written by the wizard when a matching server call
//! succeeds; everything else reads through the accessors.

use crate::types::{ComparisonResult, DatasetSummary, Metadata, MitigationResult, ModelSummary};
use crate::views::AnalysisView;
use std::path::PathBuf;

/// Connectivity of the remote service as of the last health check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ApiStatus {
    #[default]
    Unknown,
    Connected,
    Disconnected,
}

impl ApiStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "Checking...",
            Self::Connected => "Connected",
            Self::Disconnected => "Disconnected",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub(crate) api_status: ApiStatus,
    pub(crate) dataset: Option<DatasetSummary>,
    pub(crate) uploaded_columns: Vec<String>,
    pub(crate) metadata: Option<Metadata>,
    pub(crate) model: Option<ModelSummary>,
    pub(crate) analysis: Option<AnalysisView>,
    pub(crate) mitigation: Option<MitigationResult>,
    pub(crate) comparison: Option<ComparisonResult>,
    pub(crate) downloads: Vec<PathBuf>,
}

impl SessionState {
    pub fn api_status(&self) -> ApiStatus {
        self.api_status
    }

    pub fn dataset(&self) -> Option<&DatasetSummary> {
        self.dataset.as_ref()
    }

    pub fn uploaded_columns(&self) -> &[String] {
        &self.uploaded_columns
    }

    pub fn metadata(&self) -> Option<&Metadata> {
        self.metadata.as_ref()
    }

    pub fn model(&self) -> Option<&ModelSummary> {
        self.model.as_ref()
    }

    pub fn analysis(&self) -> Option<&AnalysisView> {
        self.analysis.as_ref()
    }

    pub fn mitigation(&self) -> Option<&MitigationResult> {
        self.mitigation.as_ref()
    }

    pub fn comparison(&self) -> Option<&ComparisonResult> {
        self.comparison.as_ref()
    }

    /// Files written by downloads this session, oldest first.
    pub fn downloads(&self) -> &[PathBuf] {
        &self.downloads
    }
}
