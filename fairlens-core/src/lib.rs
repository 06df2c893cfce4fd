//! # FairLens Core
//!
//! Client core for the FairLens bias-mitigation service.
//! Provides the service API client, session wizard, input validation,
//! view models, notifications, configuration, and fundamental types.

pub mod api;
pub mod config;
pub mod error;
pub mod inflight;
pub mod navigator;
pub mod notify;
pub mod sample;
pub mod session;
pub mod types;
pub mod validate;
pub mod views;
pub mod wizard;

// Re-export commonly used types at the crate root.
pub use api::{
    ApiRequest, ApiResponse, FairnessApi, FileUpload, HttpFairnessClient, MockFairnessApi,
    dispatch,
};
pub use config::{FairlensConfig, MissingMetricPolicy};
pub use error::{ApiError, FairlensError, Result, ValidationError, ValidationIssue};
pub use inflight::{InFlightGuard, InFlightTracker};
pub use navigator::{Step, StepNavigator, StepStatus};
pub use notify::{Toast, ToastKind, ToastStack};
pub use session::{ApiStatus, SessionState};
pub use types::{
    AttributeMetrics, BiasAnalysis, ComparisonResult, DatasetSummary, HealthStatus, Metadata,
    MitigationRequest, MitigationResult, ModelSummary, PredictionKind,
};
pub use wizard::{Command, RequestKind, Wizard};
