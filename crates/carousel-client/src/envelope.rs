//! Normalization of upload endpoint response envelopes.
//!
//! The remote store answers in one of two shapes:
//! `{ "success": true, "result": { "url", "fileName" } }` or
//! `{ "data": { "url" | "fileName" } }` / `{ "data": "<url>" }`.
//! Extraction strategies are tried in order against the raw body; the
//! first hit wins. This keeps the dual-shape handling out of the
//! coordinator itself.

use serde_json::Value;
use uuid::Uuid;

use carousel_core::error::TransferError;

/// File location extracted from an upload reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadedFile {
    pub url: Option<String>,
    pub file_name: Option<String>,
}

type Strategy = fn(&Value) -> Option<UploadedFile>;

/// Extraction strategies in priority order.
const STRATEGIES: &[Strategy] = &[from_success_result, from_data_object, from_data_string];

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `{ "success": true, "result": { "url", "fileName" } }`
fn from_success_result(value: &Value) -> Option<UploadedFile> {
    if !value.get("success")?.as_bool()? {
        return None;
    }
    let result = value.get("result")?;
    let url = string_field(result, "url");
    let file_name = string_field(result, "fileName");
    if url.is_none() && file_name.is_none() {
        return None;
    }
    Some(UploadedFile { url, file_name })
}

/// `{ "data": { "url" | "fileName" } }`
fn from_data_object(value: &Value) -> Option<UploadedFile> {
    let data = value.get("data")?;
    let url = string_field(data, "url");
    let file_name = string_field(data, "fileName");
    if url.is_none() && file_name.is_none() {
        return None;
    }
    Some(UploadedFile { url, file_name })
}

/// `{ "data": "<url>" }`
fn from_data_string(value: &Value) -> Option<UploadedFile> {
    let url = value.get("data")?.as_str()?;
    Some(UploadedFile {
        url: Some(url.to_string()),
        file_name: None,
    })
}

/// Try each extraction strategy in order.
pub fn extract_uploaded_file(value: &Value) -> Option<UploadedFile> {
    STRATEGIES.iter().find_map(|strategy| strategy(value))
}

/// Extract the uploaded file's URL, or classify the reply as
/// unrecognized.
pub fn try_remote_url(value: &Value) -> Result<String, TransferError> {
    extract_uploaded_file(value)
        .and_then(|file| file.url)
        .ok_or(TransferError::UnrecognizedResponse)
}

/// Placeholder reference for a file whose upload reply carried no usable
/// URL. The scheme marks it as not yet persisted remotely.
pub fn placeholder_url(local_id: Uuid, file_name: &str) -> String {
    format!("unresolved://{}/{}", local_id, file_name)
}

/// Resolve the remote URL for a settled upload, falling back to a
/// placeholder when neither envelope shape yields one.
pub fn resolve_remote_url(value: &Value, local_id: Uuid, file_name: &str) -> String {
    match try_remote_url(value) {
        Ok(url) => url,
        Err(error) => {
            tracing::warn!(
                slot_id = %local_id,
                error = %error,
                "Using a placeholder reference for an unresolved upload"
            );
            placeholder_url(local_id, file_name)
        }
    }
}
