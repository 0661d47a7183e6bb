//! Scripted job service used by the tracker's tests

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use kiln_client::{ClientError, JobService, Result};
use kiln_core::domain::job::{JobState, TaskId};
use kiln_core::domain::upload::ImageUpload;
use kiln_core::dto::task::{GenerationResponse, TaskStatus};

pub fn sample_upload() -> ImageUpload {
    ImageUpload::new("hat.png", "image/png", vec![0x89, b'P', b'N', b'G'])
}

pub fn status(task_id: &str, state: JobState, progress: i64, step: &str) -> TaskStatus {
    TaskStatus {
        task_id: TaskId::new(task_id),
        status: state,
        progress,
        current_step: step.to_string(),
        result_url: None,
        mesh_url: None,
        error: None,
    }
}

/// Replays queued responses in order and counts every call
///
/// Once the status script runs dry every further query fails with a 503.
#[derive(Default)]
pub struct ScriptedService {
    submissions: Mutex<VecDeque<Result<GenerationResponse>>>,
    statuses: Mutex<VecDeque<Result<TaskStatus>>>,
    submit_latency: Duration,
    status_latency: Duration,
    submit_calls: AtomicUsize,
    status_calls: AtomicUsize,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(self, task_id: &str) -> Self {
        self.push_submission(Ok(GenerationResponse {
            task_id: TaskId::new(task_id),
            status: "queued".to_string(),
            message: "UGC generation from image started".to_string(),
        }))
    }

    pub fn reject(self, err: ClientError) -> Self {
        self.push_submission(Err(err))
    }

    pub fn then_status(self, status: TaskStatus) -> Self {
        self.push_status(Ok(status))
    }

    pub fn then_poll_error(self, err: ClientError) -> Self {
        self.push_status(Err(err))
    }

    pub fn with_submit_latency(mut self, latency: Duration) -> Self {
        self.submit_latency = latency;
        self
    }

    pub fn with_status_latency(mut self, latency: Duration) -> Self {
        self.status_latency = latency;
        self
    }

    pub fn submit_calls(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> usize {
        self.status_calls.load(Ordering::SeqCst)
    }

    fn push_submission(self, result: Result<GenerationResponse>) -> Self {
        self.submissions.lock().unwrap().push_back(result);
        self
    }

    fn push_status(self, result: Result<TaskStatus>) -> Self {
        self.statuses.lock().unwrap().push_back(result);
        self
    }
}

#[async_trait]
impl JobService for ScriptedService {
    async fn submit(&self, _upload: &ImageUpload) -> Result<GenerationResponse> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if !self.submit_latency.is_zero() {
            tokio::time::sleep(self.submit_latency).await;
        }

        self.submissions
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::api_error(503, "no scripted submission")))
    }

    async fn task_status(&self, _task_id: &TaskId) -> Result<TaskStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        if !self.status_latency.is_zero() {
            tokio::time::sleep(self.status_latency).await;
        }

        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ClientError::api_error(503, "no scripted status")))
    }
}
