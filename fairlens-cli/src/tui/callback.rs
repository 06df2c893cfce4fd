//! Background request execution for the TUI.
//!
//! Each request runs in its own tokio task holding an in-flight guard.
//! The outcome is sent back as a TuiEvent through an unbounded mpsc
//! channel, which the TUI main loop polls with tokio::select!.

use fairlens_core::api::{ApiRequest, ApiResponse, FairnessApi, dispatch};
use fairlens_core::error::ApiError;
use fairlens_core::inflight::InFlightTracker;
use fairlens_core::wizard::RequestKind;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events sent from request tasks to the TUI event loop.
#[derive(Debug)]
pub enum TuiEvent {
    /// A request finished, successfully or not.
    RequestFinished {
        kind: RequestKind,
        result: Result<ApiResponse, ApiError>,
    },
}

/// Spawns requests and forwards their outcomes.
pub struct RequestRunner {
    api: Arc<dyn FairnessApi>,
    inflight: InFlightTracker,
    tx: mpsc::UnboundedSender<TuiEvent>,
}

impl RequestRunner {
    /// Create a runner and the receiver its events arrive on.
    pub fn new(
        api: Arc<dyn FairnessApi>,
        inflight: InFlightTracker,
    ) -> (Self, mpsc::UnboundedReceiver<TuiEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, inflight, tx }, rx)
    }

    /// Start a request in the background.
    pub fn spawn(&self, request: ApiRequest) {
        let kind = RequestKind::from(&request);
        let guard = self.inflight.begin(request.loading_label());
        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = dispatch(api.as_ref(), request).await;
            // The overlay stays up until the outcome is queued for the UI.
            let _ = tx.send(TuiEvent::RequestFinished { kind, result });
            drop(guard);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fairlens_core::api::MockFairnessApi;
    use fairlens_core::types::HealthStatus;

    #[tokio::test]
    async fn test_spawned_request_reports_back() {
        let api = Arc::new(MockFairnessApi::new().with_health(Ok(HealthStatus {
            status: "running".into(),
        })));
        let inflight = InFlightTracker::new();
        let (runner, mut rx) = RequestRunner::new(api, inflight.clone());

        runner.spawn(ApiRequest::Health);
        assert!(inflight.is_busy());

        let TuiEvent::RequestFinished { kind, result } = rx.recv().await.unwrap();
        assert_eq!(kind, RequestKind::Health);
        assert!(matches!(result, Ok(ApiResponse::Health(_))));
    }

    #[tokio::test]
    async fn test_failed_request_still_reports() {
        let api = Arc::new(MockFairnessApi::new());
        let (runner, mut rx) = RequestRunner::new(api, InFlightTracker::new());
        runner.spawn(ApiRequest::CompareModels);
        let TuiEvent::RequestFinished { kind, result } = rx.recv().await.unwrap();
        assert_eq!(kind, RequestKind::CompareModels);
        assert!(result.is_err());
    }
}
