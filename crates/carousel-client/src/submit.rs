//! Submission-time reconciliation of registry state and upload results.
//!
//! Submit blocks until every in-flight transfer settles, refuses to
//! dispatch while any slot is failed, and maps the ordered registry view
//! into the outbound record payload. An endpoint failure is terminal for
//! the attempt but non-destructive: registry and upload state are left
//! untouched so the user can retry without re-uploading.

use std::sync::Arc;

use validator::Validate;

use carousel_core::error::SubmitError;
use carousel_core::models::CarouselForm;

use crate::api::RecordEndpoint;
use crate::coordinator::UploadCoordinator;
use crate::payload::CarouselPayload;
use crate::registry::{lock, SharedRegistry};

/// Notification fired after a successful submit so the surrounding list
/// view can reload.
pub trait ListRefresh: Send + Sync {
    fn refresh(&self);
}

/// Refresh trigger that does nothing, for headless flows and tests.
pub struct NoRefresh;

impl ListRefresh for NoRefresh {
    fn refresh(&self) {}
}

/// Successful submit: the endpoint reply plus whether a new record was
/// created.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    pub created: bool,
    pub code: i64,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Reconciles local state with upload results and dispatches the record.
pub struct SubmitStage {
    registry: SharedRegistry,
    coordinator: Arc<UploadCoordinator>,
    record: Arc<dyn RecordEndpoint>,
    refresh: Arc<dyn ListRefresh>,
    success_code: i64,
}

impl SubmitStage {
    pub fn new(
        registry: SharedRegistry,
        coordinator: Arc<UploadCoordinator>,
        record: Arc<dyn RecordEndpoint>,
        refresh: Arc<dyn ListRefresh>,
        success_code: i64,
    ) -> Self {
        Self {
            registry,
            coordinator,
            record,
            refresh,
            success_code,
        }
    }

    /// Reconcile and dispatch.
    ///
    /// 1. Check preconditions (title, at least one slot, schedule window).
    /// 2. Join every in-flight transfer.
    /// 3. Abort with an aggregate error if any slot settled failed.
    /// 4. Map registry order into the outbound payload.
    /// 5. Create or update depending on whether the form has an id.
    pub async fn submit(&self, form: &CarouselForm) -> Result<SubmitOutcome, SubmitError> {
        if form.title.trim().is_empty() {
            return Err(SubmitError::TitleRequired);
        }
        form.validate()
            .map_err(|e| SubmitError::InvalidForm(e.to_string()))?;
        if !form.schedule_window_valid() {
            return Err(SubmitError::InvalidForm(
                "End time must be after start time".to_string(),
            ));
        }
        if lock(&self.registry).is_empty() {
            return Err(SubmitError::MediaRequired);
        }

        self.coordinator.await_all().await;

        let slots = {
            let registry = lock(&self.registry);
            let failed = registry.failed_count();
            if failed > 0 {
                return Err(SubmitError::TransfersFailed { count: failed });
            }
            registry.snapshot()
        };

        let payload = CarouselPayload::from_form(form, &slots);
        let created = form.id.is_none();
        tracing::info!(
            created = created,
            media = payload.media_list.len(),
            "Dispatching carousel record"
        );

        let reply = if created {
            self.record.create(&payload).await
        } else {
            self.record.update(&payload).await
        }
        .map_err(|e| SubmitError::Transport(e.to_string()))?;

        if !reply.is_success(self.success_code) {
            // Surface the server message verbatim; local state stays as-is
            // so the attempt can be repeated without re-uploading.
            return Err(SubmitError::Endpoint {
                code: reply.code,
                message: reply.msg,
            });
        }

        self.refresh.refresh();
        Ok(SubmitOutcome {
            created,
            code: reply.code,
            message: reply.msg,
            data: reply.data,
        })
    }
}
