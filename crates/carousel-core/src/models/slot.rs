use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Media kind enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a MIME content type into a media kind. Parameters are
    /// stripped before matching (e.g. "image/jpeg; charset=utf-8").
    pub fn from_content_type(content_type: &str) -> Option<MediaKind> {
        let normalized = content_type
            .split(';')
            .next()
            .map(|s| s.trim())
            .unwrap_or(content_type)
            .to_ascii_lowercase();
        if normalized.starts_with("image/") {
            Some(MediaKind::Image)
        } else if normalized.starts_with("video/") {
            Some(MediaKind::Video)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
        }
    }
}

/// Per-slot upload lifecycle.
///
/// Advances pending → uploading → succeeded | failed. The only backward
/// transition is a manual retry (failed → pending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadState {
    Pending,
    Uploading,
    Succeeded,
    Failed,
}

impl UploadState {
    /// True once the transfer has settled either way.
    pub fn is_settled(&self) -> bool {
        matches!(self, UploadState::Succeeded | UploadState::Failed)
    }
}

/// A newly selected file, before validation.
#[derive(Debug, Clone)]
pub struct MediaCandidate {
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
    pub data: Bytes,
}

impl MediaCandidate {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        size_bytes: u64,
        data: Bytes,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            size_bytes,
            data,
        }
    }
}

/// One attachment slot in the carousel.
///
/// Owned exclusively by the media registry; the upload coordinator holds
/// only the slot id plus the right to advance `upload_state` and set
/// `remote_url`.
#[derive(Debug, Clone)]
pub struct MediaSlot {
    /// Client-generated id, stable for the slot's lifetime.
    pub local_id: Uuid,
    pub display_name: String,
    pub kind: MediaKind,
    pub content_type: String,
    pub size_bytes: u64,
    /// Local file payload; present only until the upload completes.
    pub source: Option<Bytes>,
    /// Remote location; set only once the upload succeeded.
    pub remote_url: Option<String>,
    pub external_link: Option<String>,
    pub upload_state: UploadState,
    /// Last transfer error, user-facing.
    pub failure: Option<String>,
}

impl MediaSlot {
    /// Create a pending slot from a validated candidate.
    pub fn new(candidate: MediaCandidate, kind: MediaKind) -> Self {
        Self {
            local_id: Uuid::new_v4(),
            display_name: candidate.file_name,
            kind,
            content_type: candidate.content_type,
            size_bytes: candidate.size_bytes,
            source: Some(candidate.data),
            remote_url: None,
            external_link: None,
            upload_state: UploadState::Pending,
            failure: None,
        }
    }

    pub fn is_video(&self) -> bool {
        self.kind == MediaKind::Video
    }
}
