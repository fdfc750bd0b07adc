//! Error types module
//!
//! Three error families mirror the pipeline stages: [`RejectReason`] is
//! handled entirely at intake and never reaches submission, a transfer
//! failure is recorded per slot as [`TransferError`], and [`SubmitError`]
//! gates the reconciliation step. None of them are used as control flow;
//! every variant carries a message fit for direct display.

use thiserror::Error;

/// Why a candidate file was rejected at intake.
///
/// `Display` strings are the user-facing rejection messages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("File size {size_bytes} bytes exceeds the maximum of {limit_bytes} bytes")]
    TooLarge { size_bytes: u64, limit_bytes: u64 },

    #[error("Unsupported file type '{content_type}'; only image and video files are accepted")]
    UnsupportedType { content_type: String },

    #[error("Maximum of {limit} media attachments reached")]
    CapacityReached { limit: usize },

    #[error("A file named '{name}' with the same size is already attached")]
    Duplicate { name: String },

    #[error("A carousel can hold only one video")]
    VideoAlreadyPresent,
}

/// Why a single transfer failed. Recorded on the slot; sibling transfers
/// are unaffected.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Transfer failed: {0}")]
    Transport(String),

    #[error("Upload response did not contain a usable URL")]
    UnrecognizedResponse,
}

/// Why a submit attempt was blocked or rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("Title must not be empty")]
    TitleRequired,

    #[error("At least one media attachment is required")]
    MediaRequired,

    #[error("Invalid form: {0}")]
    InvalidForm(String),

    #[error("{count} media transfer(s) failed; remove or retry them before submitting")]
    TransfersFailed { count: usize },

    #[error("Server rejected the carousel (code {code}): {message}")]
    Endpoint { code: i64, message: String },

    #[error("Failed to reach the record endpoint: {0}")]
    Transport(String),
}

impl SubmitError {
    /// Message suitable for direct display. Endpoint failures surface the
    /// server-provided message verbatim.
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::Endpoint { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// True when the attempt may be retried without re-uploading media.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SubmitError::Endpoint { .. } | SubmitError::Transport(_)
        )
    }
}
