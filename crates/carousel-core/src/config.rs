//! Configuration module
//!
//! Provides intake limits for the media registry and HTTP settings for the
//! remote endpoints. Values come from the environment with sensible
//! defaults; a `.env` file is honored when present.

use std::env;
use std::fmt::Display;
use std::str::FromStr;

use crate::constants::{MAX_FILE_SIZE_BYTES, MAX_MEDIA_SLOTS, RECORD_SUCCESS_CODE};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Intake limits enforced by the media registry.
#[derive(Clone, Copy, Debug)]
pub struct MediaLimits {
    pub max_file_size_bytes: u64,
    pub max_slots: usize,
}

impl Default for MediaLimits {
    fn default() -> Self {
        Self {
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
            max_slots: MAX_MEDIA_SLOTS,
        }
    }
}

impl MediaLimits {
    /// Read limits from the environment, falling back to defaults.
    /// Recognized: `CAROUSEL_MAX_FILE_SIZE_BYTES`, `CAROUSEL_MAX_SLOTS`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            max_file_size_bytes: env_parse(
                "CAROUSEL_MAX_FILE_SIZE_BYTES",
                defaults.max_file_size_bytes,
            ),
            max_slots: env_parse("CAROUSEL_MAX_SLOTS", defaults.max_slots),
        }
    }
}

/// HTTP client configuration for the upload and record endpoints.
///
/// The timeout applies per request, which also bounds each individual
/// media transfer.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    pub success_code: i64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            success_code: RECORD_SUCCESS_CODE,
        }
    }
}

impl ClientConfig {
    /// Read configuration from the environment, falling back to defaults.
    /// Recognized: `CAROUSEL_API_URL`, `CAROUSEL_HTTP_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        let defaults = Self::default();
        Self {
            base_url: env::var("CAROUSEL_API_URL").unwrap_or(defaults.base_url),
            timeout_secs: env_parse("CAROUSEL_HTTP_TIMEOUT_SECS", defaults.timeout_secs),
            success_code: defaults.success_code,
        }
    }
}

/// Parse an env var, warning and falling back to the default on a value
/// that does not parse.
fn env_parse<T: FromStr + Display + Copy>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!(key = key, value = %raw, default = %default, "Ignoring unparseable env value");
            default
        }),
        Err(_) => default,
    }
}
