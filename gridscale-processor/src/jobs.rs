use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle of a job in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

/// One tracked job: either a registered conversion artifact or a scale
/// job derived from one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub status: JobStatus,
    /// Original uploaded filename (for download naming)
    pub filename: String,
    /// Coordinate reference system of the artifact
    pub target_crs: String,
    pub output_format: String,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Current status message
    pub message: String,
    /// Path to the output artifact (set when completed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<PathBuf>,
    /// Scale factor applied (None for plain conversions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale_factor: Option<f64>,
    /// Reference to the original job (None for plain conversions)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_job_id: Option<Uuid>,
}

/// In-memory job registry, shared between the intake loop and the workers.
#[derive(Clone, Default)]
pub struct JobStore {
    jobs: Arc<Mutex<HashMap<Uuid, JobRecord>>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record under a fresh v4 UUID and returns the id.
    pub fn insert(&self, record: JobRecord) -> Uuid {
        let job_id = Uuid::new_v4();
        self.jobs.lock().unwrap().insert(job_id, record);
        job_id
    }

    pub fn get(&self, job_id: Uuid) -> Option<JobRecord> {
        self.jobs.lock().unwrap().get(&job_id).cloned()
    }

    /// Applies `update` to the record, returning false when the job is
    /// unknown.
    pub fn update(&self, job_id: Uuid, update: impl FnOnce(&mut JobRecord)) -> bool {
        match self.jobs.lock().unwrap().get_mut(&job_id) {
            Some(record) => {
                update(record);
                true
            }
            None => false,
        }
    }

    pub fn set_progress(&self, job_id: Uuid, progress: u8, message: impl Into<String>) {
        let message = message.into();
        self.update(job_id, |record| {
            record.status = JobStatus::Processing;
            record.progress = progress;
            record.message = message;
        });
    }

    pub fn mark_failed(&self, job_id: Uuid, message: impl Into<String>) {
        let message = message.into();
        self.update(job_id, |record| {
            record.status = JobStatus::Failed;
            record.progress = 0;
            record.message = message;
        });
    }
}
