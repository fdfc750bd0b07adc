//! Carousel Core Library
//!
//! This crate provides the domain models, error types, configuration, and
//! validation shared by the carousel media pipeline components.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{ClientConfig, MediaLimits};
pub use error::{RejectReason, SubmitError, TransferError};
pub use models::{
    CarouselForm, CarouselStatus, MediaCandidate, MediaKind, MediaSlot, UploadState,
};
