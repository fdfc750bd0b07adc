//! Pure intake validation for media candidates.
//!
//! Checks run in a fixed order with first-failure-wins semantics over a
//! snapshot of the current registry plus the candidate's metadata. Nothing
//! here mutates state or performs IO.

use crate::config::MediaLimits;
use crate::error::RejectReason;
use crate::models::{MediaCandidate, MediaKind};

/// Validate file size against the configured maximum.
pub fn validate_size(size_bytes: u64, limit_bytes: u64) -> Result<(), RejectReason> {
    if size_bytes > limit_bytes {
        return Err(RejectReason::TooLarge {
            size_bytes,
            limit_bytes,
        });
    }
    Ok(())
}

/// Validate that the content type belongs to the image or video MIME
/// class, returning the classified kind.
pub fn validate_content_type(content_type: &str) -> Result<MediaKind, RejectReason> {
    MediaKind::from_content_type(content_type).ok_or_else(|| RejectReason::UnsupportedType {
        content_type: content_type.to_string(),
    })
}

/// Validate remaining capacity.
pub fn validate_capacity(current_len: usize, limit: usize) -> Result<(), RejectReason> {
    if current_len >= limit {
        return Err(RejectReason::CapacityReached { limit });
    }
    Ok(())
}

/// Reject a candidate matching an existing slot on (name, size),
/// regardless of kind.
pub fn validate_not_duplicate<'a, I>(
    mut existing: I,
    name: &str,
    size_bytes: u64,
) -> Result<(), RejectReason>
where
    I: Iterator<Item = (&'a str, u64)>,
{
    if existing.any(|(n, s)| n == name && s == size_bytes) {
        return Err(RejectReason::Duplicate {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Run every intake check in order (size, MIME class, capacity,
/// duplicate); the first failure wins. Returns the classified media kind
/// on success. The one-video rule is insertion semantics and lives in the
/// registry, not here.
pub fn validate_candidate<'a, I>(
    existing: I,
    current_len: usize,
    candidate: &MediaCandidate,
    limits: &MediaLimits,
) -> Result<MediaKind, RejectReason>
where
    I: Iterator<Item = (&'a str, u64)>,
{
    validate_size(candidate.size_bytes, limits.max_file_size_bytes)?;
    let kind = validate_content_type(&candidate.content_type)?;
    validate_capacity(current_len, limits.max_slots)?;
    validate_not_duplicate(existing, &candidate.file_name, candidate.size_bytes)?;
    Ok(kind)
}
