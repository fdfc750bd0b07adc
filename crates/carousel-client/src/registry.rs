//! Ordered, capacity-bounded collection of media slots.
//!
//! Owns insertion, removal, reorder, and the video-first ordering rule: at
//! most one video, and if present it occupies position 0 after every
//! mutation. The registry is shared with the upload coordinator as
//! [`SharedRegistry`]; lock scopes are short and never held across an
//! await point.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use uuid::Uuid;

use carousel_core::config::MediaLimits;
use carousel_core::error::RejectReason;
use carousel_core::models::{MediaCandidate, MediaKind, MediaSlot, UploadState};
use carousel_core::validation;

/// Registry handle shared between user-facing operations and transfer
/// completion callbacks.
pub type SharedRegistry = Arc<Mutex<MediaRegistry>>;

/// Lock a shared registry, recovering from poisoning (every mutation is
/// atomic per call, so a poisoned guard still holds a consistent state).
pub fn lock(registry: &SharedRegistry) -> MutexGuard<'_, MediaRegistry> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

/// User-confirmation capability consulted before destructive removal.
/// Injected into [`MediaRegistry::remove`] so the registry stays free of
/// UI concerns.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> bool;
}

/// Prompt that always accepts, for headless flows and tests.
pub struct AutoConfirm;

impl ConfirmPrompt for AutoConfirm {
    fn confirm(&self, _message: &str) -> bool {
        true
    }
}

/// Outcome of a reorder request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The move was applied as requested.
    Moved,
    /// The move was applied, then the video slot was relocated back to
    /// position 0 with the relative order of the rest preserved.
    Corrected,
    /// A non-video slot may not take position 0 while a video exists; the
    /// move was refused before taking effect.
    Blocked,
    /// One of the indexes was out of range.
    OutOfRange,
}

/// Outcome of a removal request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    Declined,
    NotFound,
}

/// Report for a multi-file selection.
#[derive(Debug, Default)]
pub struct IntakeReport {
    /// Slot ids created, in selection order.
    pub accepted: Vec<Uuid>,
    /// Candidates dropped because the selection exceeded remaining
    /// capacity.
    pub skipped: usize,
    /// Candidates rejected by validation, with the offending file name.
    pub rejected: Vec<(String, RejectReason)>,
}

/// The ordered attachment collection for one carousel record.
pub struct MediaRegistry {
    slots: Vec<MediaSlot>,
    limits: MediaLimits,
}

impl MediaRegistry {
    pub fn new(limits: MediaLimits) -> Self {
        Self {
            slots: Vec::new(),
            limits,
        }
    }

    pub fn shared(limits: MediaLimits) -> SharedRegistry {
        Arc::new(Mutex::new(Self::new(limits)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn limits(&self) -> &MediaLimits {
        &self.limits
    }

    pub fn remaining_capacity(&self) -> usize {
        self.limits.max_slots.saturating_sub(self.slots.len())
    }

    /// Ordered clone of the current slots.
    pub fn snapshot(&self) -> Vec<MediaSlot> {
        self.slots.clone()
    }

    pub fn get(&self, slot_id: Uuid) -> Option<&MediaSlot> {
        self.slots.iter().find(|s| s.local_id == slot_id)
    }

    pub fn position_of(&self, slot_id: Uuid) -> Option<usize> {
        self.slots.iter().position(|s| s.local_id == slot_id)
    }

    fn has_video(&self) -> bool {
        self.slots.iter().any(MediaSlot::is_video)
    }

    /// Number of slots whose transfer settled as failed.
    pub fn failed_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|s| s.upload_state == UploadState::Failed)
            .count()
    }

    /// Capacity, one-video, and video-first checks in one place. Asserted
    /// after every mutation in debug builds; tests call it directly.
    pub fn invariants_hold(&self) -> bool {
        let videos = self.slots.iter().filter(|s| s.is_video()).count();
        self.slots.len() <= self.limits.max_slots
            && videos <= 1
            && (videos == 0 || self.slots[0].is_video())
    }

    /// Validate and insert a candidate. Images append at the tail; a video
    /// always takes position 0, and a second video is rejected rather than
    /// replacing the first.
    pub fn add(&mut self, candidate: MediaCandidate) -> Result<Uuid, RejectReason> {
        let kind = validation::validate_candidate(
            self.slots
                .iter()
                .map(|s| (s.display_name.as_str(), s.size_bytes)),
            self.slots.len(),
            &candidate,
            &self.limits,
        )?;

        if kind == MediaKind::Video && self.has_video() {
            return Err(RejectReason::VideoAlreadyPresent);
        }

        let slot = MediaSlot::new(candidate, kind);
        let slot_id = slot.local_id;
        tracing::info!(
            slot_id = %slot_id,
            kind = kind.as_str(),
            name = %slot.display_name,
            size = slot.size_bytes,
            "Accepted media candidate"
        );

        match kind {
            MediaKind::Video => self.slots.insert(0, slot),
            MediaKind::Image => self.slots.push(slot),
        }
        debug_assert!(self.invariants_hold());
        Ok(slot_id)
    }

    /// Process a multi-file selection. Only the first candidates that fit
    /// in remaining capacity are considered, in selection order; the rest
    /// are counted as skipped.
    pub fn batch_intake(&mut self, candidates: Vec<MediaCandidate>) -> IntakeReport {
        let remaining = self.remaining_capacity();
        let total = candidates.len();
        let mut report = IntakeReport {
            skipped: total.saturating_sub(remaining),
            ..Default::default()
        };
        if report.skipped > 0 {
            tracing::warn!(
                selected = total,
                accepted = remaining,
                "Selection exceeds remaining capacity; taking the first files only"
            );
        }

        for candidate in candidates.into_iter().take(remaining) {
            let name = candidate.file_name.clone();
            match self.add(candidate) {
                Ok(slot_id) => report.accepted.push(slot_id),
                Err(reason) => report.rejected.push((name, reason)),
            }
        }
        report
    }

    /// Move a slot to a new position, keeping the video (if any) pinned to
    /// position 0. A non-video move into position 0 while a video exists
    /// is refused; any other move is applied and then corrected if it
    /// displaced the video.
    pub fn reorder(&mut self, from: usize, to: usize) -> ReorderOutcome {
        if from >= self.slots.len() || to >= self.slots.len() {
            return ReorderOutcome::OutOfRange;
        }
        if from == to {
            return ReorderOutcome::Moved;
        }
        if to == 0 && self.has_video() && !self.slots[from].is_video() {
            return ReorderOutcome::Blocked;
        }

        let slot = self.slots.remove(from);
        self.slots.insert(to, slot);

        let outcome = if self.restore_video_first() {
            ReorderOutcome::Corrected
        } else {
            ReorderOutcome::Moved
        };
        debug_assert!(self.invariants_hold());
        outcome
    }

    /// Relocate the video slot back to position 0 if it drifted. Returns
    /// true when a correction was applied.
    fn restore_video_first(&mut self) -> bool {
        match self.slots.iter().position(MediaSlot::is_video) {
            Some(pos) if pos != 0 => {
                let video = self.slots.remove(pos);
                self.slots.insert(0, video);
                true
            }
            _ => false,
        }
    }

    /// Remove a slot once the injected prompt confirms. Removing the video
    /// slot lifts the one-video restriction. An in-flight transfer for the
    /// removed slot is not cancelled; its late result is discarded.
    pub fn remove(&mut self, slot_id: Uuid, prompt: &dyn ConfirmPrompt) -> RemoveOutcome {
        let Some(pos) = self.position_of(slot_id) else {
            return RemoveOutcome::NotFound;
        };
        if !prompt.confirm("Remove this media file?") {
            return RemoveOutcome::Declined;
        }

        let slot = self.slots.remove(pos);
        tracing::info!(slot_id = %slot.local_id, name = %slot.display_name, "Removed media slot");
        debug_assert!(self.invariants_hold());
        RemoveOutcome::Removed
    }

    /// Drop every slot (form reset).
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    // Transfer-side mutators. Each re-validates that the slot still
    // exists, so a completion that races a removal becomes a no-op at the
    // caller.

    /// Flip a pending slot to uploading and hand back its transfer job.
    /// Returns None when the slot is missing or has already started, which
    /// makes `begin_transfer` at-most-once per slot.
    pub(crate) fn start_upload(&mut self, slot_id: Uuid) -> Option<(String, String, Bytes)> {
        let slot = self.slots.iter_mut().find(|s| s.local_id == slot_id)?;
        if slot.upload_state != UploadState::Pending {
            return None;
        }
        let data = slot.source.clone()?;
        slot.upload_state = UploadState::Uploading;
        Some((slot.display_name.clone(), slot.content_type.clone(), data))
    }

    /// Record a successful transfer: set the remote URL, drop the local
    /// payload. Returns false when the slot no longer exists.
    pub(crate) fn complete_upload(&mut self, slot_id: Uuid, url: String) -> bool {
        match self.slots.iter_mut().find(|s| s.local_id == slot_id) {
            Some(slot) => {
                slot.remote_url = Some(url);
                slot.source = None;
                slot.failure = None;
                slot.upload_state = UploadState::Succeeded;
                true
            }
            None => false,
        }
    }

    /// Record a failed transfer. The local payload is kept so the slot can
    /// be retried. Returns false when the slot no longer exists.
    pub(crate) fn fail_upload(&mut self, slot_id: Uuid, error: String) -> bool {
        match self.slots.iter_mut().find(|s| s.local_id == slot_id) {
            Some(slot) => {
                slot.failure = Some(error);
                slot.upload_state = UploadState::Failed;
                true
            }
            None => false,
        }
    }

    /// Manual retry support: a failed slot that still holds its payload
    /// re-enters pending. Returns false otherwise.
    pub(crate) fn reset_for_retry(&mut self, slot_id: Uuid) -> bool {
        match self.slots.iter_mut().find(|s| s.local_id == slot_id) {
            Some(slot) if slot.upload_state == UploadState::Failed && slot.source.is_some() => {
                slot.upload_state = UploadState::Pending;
                slot.failure = None;
                true
            }
            _ => false,
        }
    }
}
