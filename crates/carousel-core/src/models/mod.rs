//! Domain models for the carousel media pipeline.

pub mod carousel;
pub mod slot;

pub use carousel::{CarouselForm, CarouselStatus};
pub use slot::{MediaCandidate, MediaKind, MediaSlot, UploadState};
