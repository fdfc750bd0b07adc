//! Shared constants for the carousel media pipeline.

/// Maximum number of media slots a carousel can hold.
pub const MAX_MEDIA_SLOTS: usize = 9;

/// Maximum accepted media file size in bytes (50 MiB).
pub const MAX_FILE_SIZE_BYTES: u64 = 50 * 1024 * 1024;

/// Response code that signals success on the record endpoint.
pub const RECORD_SUCCESS_CODE: i64 = 200;

/// Maximum carousel title length in characters.
pub const MAX_TITLE_LENGTH: u64 = 50;

/// Progress checkpoint reported when a transfer starts.
pub const PROGRESS_STARTED: u8 = 10;

/// Progress checkpoint reported once the transport response has arrived.
pub const PROGRESS_RESPONDED: u8 = 90;

/// Progress value reported only on coordinator-confirmed completion.
pub const PROGRESS_COMPLETE: u8 = 100;
