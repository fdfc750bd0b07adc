//! HTTP transport for the remote upload and record endpoints.
//!
//! [`ApiClient`] is a thin reqwest wrapper with a client-level timeout;
//! the timeout also bounds each individual media transfer, so a stalled
//! upload settles as a failure instead of hanging the join point. The two
//! endpoint traits are the seams test doubles implement.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use carousel_core::config::ClientConfig;

use crate::payload::CarouselPayload;

/// Reply envelope from the record endpoint. The wire field is `msg`;
/// `message` is accepted as an alias.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordReply {
    pub code: i64,
    #[serde(alias = "message")]
    pub msg: String,
    #[serde(default)]
    pub data: Option<Value>,
}

impl RecordReply {
    pub fn is_success(&self, success_code: i64) -> bool {
        self.code == success_code
    }
}

/// Remote store accepting one file per call.
///
/// Returns the raw response body; envelope normalization happens in
/// [`crate::envelope`].
#[async_trait]
pub trait UploadEndpoint: Send + Sync {
    async fn upload(&self, file_name: &str, content_type: &str, data: Bytes) -> Result<Value>;
}

/// Remote carousel record endpoint: create for new records, update for
/// existing ones.
#[async_trait]
pub trait RecordEndpoint: Send + Sync {
    async fn create(&self, payload: &CarouselPayload) -> Result<RecordReply>;
    async fn update(&self, payload: &CarouselPayload) -> Result<RecordReply>;
}

/// HTTP client for the carousel admin API.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Create a client from the environment (`CAROUSEL_API_URL`,
    /// `CAROUSEL_HTTP_TIMEOUT_SECS`).
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(anyhow::anyhow!(
                "API request failed with status {}: {}",
                status,
                error_text
            ));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    async fn send_record(&self, request: reqwest::RequestBuilder) -> Result<RecordReply> {
        let response = request.send().await.context("Failed to send request")?;
        let value = Self::read_json(response).await?;
        serde_json::from_value(value).context("Unexpected record endpoint reply shape")
    }
}

#[async_trait]
impl UploadEndpoint for ApiClient {
    async fn upload(&self, file_name: &str, content_type: &str, data: Bytes) -> Result<Value> {
        let part = reqwest::multipart::Part::stream(data)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .context("Invalid content type for upload")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.build_url("/common/upload"))
            .query(&[("overwrite", "false")])
            .multipart(form)
            .send()
            .await
            .context("Failed to send upload request")?;

        Self::read_json(response).await
    }
}

#[async_trait]
impl RecordEndpoint for ApiClient {
    async fn create(&self, payload: &CarouselPayload) -> Result<RecordReply> {
        self.send_record(self.client.post(self.build_url("/h5/carousel")).json(payload))
            .await
    }

    async fn update(&self, payload: &CarouselPayload) -> Result<RecordReply> {
        self.send_record(self.client.put(self.build_url("/h5/carousel")).json(payload))
            .await
    }
}
