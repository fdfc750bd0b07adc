//! Shared fixtures and endpoint doubles for the pipeline tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{json, Value};
use tokio::sync::Semaphore;

use carousel_client::api::{RecordEndpoint, RecordReply, UploadEndpoint};
use carousel_client::payload::CarouselPayload;
use carousel_client::registry::MediaRegistry;
use carousel_client::submit::{ListRefresh, SubmitStage};
use carousel_client::{SharedRegistry, UploadCoordinator};
use carousel_core::constants::RECORD_SUCCESS_CODE;
use carousel_core::models::MediaCandidate;
use carousel_core::MediaLimits;

pub fn image_candidate(name: &str, size_mb: u64) -> MediaCandidate {
    MediaCandidate::new(
        name,
        "image/png",
        size_mb * 1024 * 1024,
        Bytes::from_static(b"image-bytes"),
    )
}

pub fn video_candidate(name: &str, size_mb: u64) -> MediaCandidate {
    MediaCandidate::new(
        name,
        "video/mp4",
        size_mb * 1024 * 1024,
        Bytes::from_static(b"video-bytes"),
    )
}

/// Per-file behavior of the mock upload endpoint.
#[derive(Clone)]
pub enum UploadBehavior {
    /// `{ success, result: { url, fileName } }`
    SuccessResult,
    /// `{ data: { url } }`
    SuccessData,
    /// `{ data: "<url>" }`
    SuccessDataString,
    /// A success envelope with no extractable URL.
    SuccessEmpty,
    Fail(String),
}

/// Upload endpoint double with per-file behaviors, an optional gate that
/// holds transfers until released, and a call counter.
pub struct MockUploadEndpoint {
    default: UploadBehavior,
    behaviors: Mutex<HashMap<String, UploadBehavior>>,
    gate: Option<Semaphore>,
    pub calls: AtomicUsize,
}

impl MockUploadEndpoint {
    pub fn new(default: UploadBehavior) -> Self {
        Self {
            default,
            behaviors: Mutex::new(HashMap::new()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A mock whose transfers block until [`MockUploadEndpoint::release`].
    pub fn gated(default: UploadBehavior) -> Self {
        Self {
            gate: Some(Semaphore::new(0)),
            ..Self::new(default)
        }
    }

    pub fn set_behavior(&self, file_name: &str, behavior: UploadBehavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(file_name.to_string(), behavior);
    }

    /// Let `n` gated transfers proceed.
    pub fn release(&self, n: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(n);
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UploadEndpoint for MockUploadEndpoint {
    async fn upload(&self, file_name: &str, _content_type: &str, _data: Bytes) -> Result<Value> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.calls.fetch_add(1, Ordering::SeqCst);

        let behavior = self
            .behaviors
            .lock()
            .unwrap()
            .get(file_name)
            .cloned()
            .unwrap_or_else(|| self.default.clone());

        match behavior {
            UploadBehavior::SuccessResult => Ok(json!({
                "success": true,
                "result": { "url": format!("/profile/upload/{file_name}"), "fileName": file_name }
            })),
            UploadBehavior::SuccessData => {
                Ok(json!({ "data": { "url": format!("/upload/{file_name}") } }))
            }
            UploadBehavior::SuccessDataString => Ok(json!({ "data": format!("/upload/{file_name}") })),
            UploadBehavior::SuccessEmpty => Ok(json!({ "success": true, "result": {} })),
            UploadBehavior::Fail(message) => Err(anyhow::anyhow!(message)),
        }
    }
}

/// Record endpoint double that captures dispatched payloads.
pub struct MockRecordEndpoint {
    code: i64,
    msg: String,
    pub creates: Mutex<Vec<CarouselPayload>>,
    pub updates: Mutex<Vec<CarouselPayload>>,
}

impl MockRecordEndpoint {
    pub fn ok() -> Self {
        Self::with_reply(RECORD_SUCCESS_CODE, "ok")
    }

    pub fn with_reply(code: i64, msg: &str) -> Self {
        Self {
            code,
            msg: msg.to_string(),
            creates: Mutex::new(Vec::new()),
            updates: Mutex::new(Vec::new()),
        }
    }

    pub fn create_count(&self) -> usize {
        self.creates.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        self.updates.lock().unwrap().len()
    }

    pub fn last_create(&self) -> Option<CarouselPayload> {
        self.creates.lock().unwrap().last().cloned()
    }

    fn reply(&self) -> RecordReply {
        RecordReply {
            code: self.code,
            msg: self.msg.clone(),
            data: None,
        }
    }
}

#[async_trait]
impl RecordEndpoint for MockRecordEndpoint {
    async fn create(&self, payload: &CarouselPayload) -> Result<RecordReply> {
        self.creates.lock().unwrap().push(payload.clone());
        Ok(self.reply())
    }

    async fn update(&self, payload: &CarouselPayload) -> Result<RecordReply> {
        self.updates.lock().unwrap().push(payload.clone());
        Ok(self.reply())
    }
}

/// List-refresh double that counts invocations.
#[derive(Default)]
pub struct CountingRefresh {
    pub count: AtomicUsize,
}

impl ListRefresh for CountingRefresh {
    fn refresh(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// A fully wired pipeline over mock endpoints.
pub struct TestPipeline {
    pub registry: SharedRegistry,
    pub coordinator: Arc<UploadCoordinator>,
    pub upload: Arc<MockUploadEndpoint>,
    pub record: Arc<MockRecordEndpoint>,
    pub refresh: Arc<CountingRefresh>,
    pub stage: SubmitStage,
}

pub fn pipeline_with(upload: MockUploadEndpoint, record: MockRecordEndpoint) -> TestPipeline {
    let registry = MediaRegistry::shared(MediaLimits::default());
    let upload = Arc::new(upload);
    let record = Arc::new(record);
    let refresh = Arc::new(CountingRefresh::default());
    let coordinator = Arc::new(UploadCoordinator::new(registry.clone(), upload.clone()));
    let stage = SubmitStage::new(
        registry.clone(),
        coordinator.clone(),
        record.clone(),
        refresh.clone(),
        RECORD_SUCCESS_CODE,
    );
    TestPipeline {
        registry,
        coordinator,
        upload,
        record,
        refresh,
        stage,
    }
}

pub fn pipeline() -> TestPipeline {
    pipeline_with(
        MockUploadEndpoint::new(UploadBehavior::SuccessResult),
        MockRecordEndpoint::ok(),
    )
}
