//! Asynchronous transfer of pending local files to the remote store.
//!
//! Each accepted slot starts its transfer eagerly, so the user sees
//! progress without waiting for submit. Transfers are independent, settle
//! in any order, and are at-most-once per slot; a failure never cancels
//! siblings. The single join point is [`UploadCoordinator::await_all`],
//! invoked by the submit stage.
//!
//! Progress is an explicit per-slot value advanced only on
//! coordinator-observed events: transfer started, response received,
//! completion confirmed. It reaches 100 only on confirmed completion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use futures::future::join_all;
use tokio::task::JoinHandle;
use uuid::Uuid;

use carousel_core::constants::{PROGRESS_COMPLETE, PROGRESS_RESPONDED, PROGRESS_STARTED};
use carousel_core::error::{RejectReason, TransferError};
use carousel_core::models::MediaCandidate;

use crate::api::UploadEndpoint;
use crate::envelope;
use crate::registry::{lock, IntakeReport, SharedRegistry};

/// How a transfer settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    Succeeded { url: String },
    Failed { error: String },
    /// The slot was removed while the transfer was in flight; its result
    /// was discarded.
    Discarded,
}

/// Settled transfer for one slot.
#[derive(Debug, Clone)]
pub struct TransferResult {
    pub slot_id: Uuid,
    pub outcome: TransferOutcome,
}

/// Per-slot progress percentages, shared with the presentation layer.
#[derive(Clone, Default)]
struct ProgressMap {
    inner: Arc<Mutex<HashMap<Uuid, u8>>>,
}

impl ProgressMap {
    /// Raise the stored value; progress never moves backward within a
    /// transfer attempt.
    fn advance(&self, slot_id: Uuid, to: u8) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = map.entry(slot_id).or_insert(0);
        if to > *entry {
            *entry = to;
        }
    }

    /// Re-enter a slot at zero (manual retry).
    fn restart(&self, slot_id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.insert(slot_id, 0);
    }

    fn get(&self, slot_id: Uuid) -> Option<u8> {
        let map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.get(&slot_id).copied()
    }

    fn forget(&self, slot_id: Uuid) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.remove(&slot_id);
    }

    fn clear(&self) {
        let mut map = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        map.clear();
    }
}

/// Drives transfers for one registry and tracks per-slot progress and
/// in-flight handles.
pub struct UploadCoordinator {
    registry: SharedRegistry,
    endpoint: Arc<dyn UploadEndpoint>,
    progress: ProgressMap,
    inflight: Mutex<HashMap<Uuid, JoinHandle<TransferResult>>>,
}

impl UploadCoordinator {
    pub fn new(registry: SharedRegistry, endpoint: Arc<dyn UploadEndpoint>) -> Self {
        Self {
            registry,
            endpoint,
            progress: ProgressMap::default(),
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn registry(&self) -> &SharedRegistry {
        &self.registry
    }

    /// Progress percentage for a slot, if a transfer was ever started.
    pub fn progress_of(&self, slot_id: Uuid) -> Option<u8> {
        self.progress.get(slot_id)
    }

    pub fn has_inflight(&self) -> bool {
        let inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        !inflight.is_empty()
    }

    /// Validate and attach a newly selected file; its transfer starts
    /// immediately.
    pub fn intake(&self, candidate: MediaCandidate) -> Result<Uuid, RejectReason> {
        let slot_id = lock(&self.registry).add(candidate)?;
        self.begin_transfer(slot_id);
        Ok(slot_id)
    }

    /// Attach a multi-file selection, starting a transfer for each
    /// accepted candidate.
    pub fn intake_batch(&self, candidates: Vec<MediaCandidate>) -> IntakeReport {
        let report = lock(&self.registry).batch_intake(candidates);
        for slot_id in &report.accepted {
            self.begin_transfer(*slot_id);
        }
        report
    }

    /// Start the transfer for a pending slot. Fire-and-forget: the caller
    /// is never suspended. Does nothing when the slot is missing or has
    /// already started (at-most-once per slot).
    pub fn begin_transfer(&self, slot_id: Uuid) {
        let job = lock(&self.registry).start_upload(slot_id);
        let Some((file_name, content_type, data)) = job else {
            tracing::debug!(slot_id = %slot_id, "Transfer not started; slot missing or not pending");
            return;
        };

        self.progress.advance(slot_id, PROGRESS_STARTED);
        tracing::info!(
            slot_id = %slot_id,
            file_name = %file_name,
            size = data.len(),
            "Starting media transfer"
        );

        let registry = self.registry.clone();
        let endpoint = self.endpoint.clone();
        let progress = self.progress.clone();

        let handle = tokio::spawn(async move {
            let outcome = match endpoint.upload(&file_name, &content_type, data).await {
                Ok(body) => {
                    progress.advance(slot_id, PROGRESS_RESPONDED);
                    let url = envelope::resolve_remote_url(&body, slot_id, &file_name);
                    if lock(&registry).complete_upload(slot_id, url.clone()) {
                        progress.advance(slot_id, PROGRESS_COMPLETE);
                        tracing::info!(slot_id = %slot_id, url = %url, "Media transfer succeeded");
                        TransferOutcome::Succeeded { url }
                    } else {
                        progress.forget(slot_id);
                        tracing::debug!(
                            slot_id = %slot_id,
                            "Transfer finished for a removed slot; result discarded"
                        );
                        TransferOutcome::Discarded
                    }
                }
                Err(error) => {
                    let message = TransferError::Transport(error.to_string()).to_string();
                    if lock(&registry).fail_upload(slot_id, message.clone()) {
                        tracing::warn!(slot_id = %slot_id, error = %message, "Media transfer failed");
                        TransferOutcome::Failed { error: message }
                    } else {
                        progress.forget(slot_id);
                        tracing::debug!(
                            slot_id = %slot_id,
                            "Transfer failed for a removed slot; result discarded"
                        );
                        TransferOutcome::Discarded
                    }
                }
            };
            TransferResult { slot_id, outcome }
        });

        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        // A retry handle supersedes the settled handle from the previous
        // attempt for the same slot.
        inflight.insert(slot_id, handle);
    }

    /// Wait until every outstanding transfer settles, success or failure.
    /// This is the single join point; the transport's per-request timeout
    /// bounds each transfer, so the join cannot hang indefinitely.
    pub async fn await_all(&self) -> Vec<TransferResult> {
        let drained: Vec<(Uuid, JoinHandle<TransferResult>)> = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            inflight.drain().collect()
        };
        if drained.is_empty() {
            return Vec::new();
        }

        let (slot_ids, handles): (Vec<_>, Vec<_>) = drained.into_iter().unzip();
        let mut results = Vec::with_capacity(slot_ids.len());
        for (slot_id, joined) in slot_ids.into_iter().zip(join_all(handles).await) {
            match joined {
                Ok(result) => results.push(result),
                Err(join_error) => {
                    // A panicked transfer task settles its slot as failed so
                    // the submit gate still sees a settled state.
                    let error =
                        TransferError::Transport(format!("task aborted: {}", join_error))
                            .to_string();
                    tracing::error!(slot_id = %slot_id, error = %error, "Transfer task aborted");
                    lock(&self.registry).fail_upload(slot_id, error.clone());
                    results.push(TransferResult {
                        slot_id,
                        outcome: TransferOutcome::Failed { error },
                    });
                }
            }
        }
        results
    }

    /// Manual retry for a failed slot: re-enters pending and starts a
    /// fresh transfer. Automatic retry is deliberately not provided; a
    /// slot is never resubmitted without a user action.
    pub fn retry(&self, slot_id: Uuid) -> bool {
        if !lock(&self.registry).reset_for_retry(slot_id) {
            return false;
        }
        self.progress.restart(slot_id);
        tracing::info!(slot_id = %slot_id, "Retrying failed media transfer");
        self.begin_transfer(slot_id);
        true
    }

    /// Forget all progress values (form reset). Outstanding handles are
    /// left to settle; their results will be discarded against the cleared
    /// registry.
    pub fn reset_progress(&self) {
        self.progress.clear();
    }
}
