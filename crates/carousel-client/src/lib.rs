//! Carousel media attachment pipeline.
//!
//! Coordinates the bounded collection of mixed-media attachments for a
//! carousel record: intake validation, the ordered registry with its
//! video-first rule, eager asynchronous upload with per-slot progress and
//! failure tracking, and the submit-time reconciliation that turns local
//! state into the outbound record payload.
//!
//! The remote collaborators (upload endpoint, record endpoint) are traits
//! with a reqwest-backed [`ApiClient`] implementation; tests substitute
//! their own.

pub mod api;
pub mod coordinator;
pub mod envelope;
pub mod payload;
pub mod registry;
pub mod submit;

// Re-export commonly used types
pub use api::{ApiClient, RecordEndpoint, RecordReply, UploadEndpoint};
pub use coordinator::{TransferOutcome, TransferResult, UploadCoordinator};
pub use payload::{CarouselMediaPayload, CarouselPayload};
pub use registry::{
    lock, AutoConfirm, ConfirmPrompt, IntakeReport, MediaRegistry, RemoveOutcome, ReorderOutcome,
    SharedRegistry,
};
pub use submit::{ListRefresh, NoRefresh, SubmitOutcome, SubmitStage};
