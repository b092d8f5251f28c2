use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, ensure, Context, Result};
use gridscale::geojson::FeatureCollection;
use gridscale::SUPPORTED_FACTOR_RANGE;
use log::{error, info};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc, Semaphore};
use uuid::Uuid;

use crate::jobs::{JobRecord, JobStatus, JobStore};

/// Upper bound on concurrently running jobs.
const MAX_CONCURRENT_JOBS: usize = 20;

/// A single intake request (one JSON object per stdin line).
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum JobRequest {
    /// Registers an existing GeoJSON artifact (the output of the external
    /// conversion step) as a completed job, so scale jobs can reference it.
    #[serde(rename_all = "camelCase")]
    RegisterArtifact {
        filename: String,
        artifact_path: PathBuf,
        #[serde(default)]
        target_crs: Option<String>,
    },
    /// Applies a scale factor to a completed job's artifact, producing a
    /// new job and a new artifact linked to the original.
    #[serde(rename_all = "camelCase")]
    ApplyScaleFactor {
        parent_job_id: Uuid,
        scale_factor: f64,
        #[serde(default)]
        output_format: Option<String>,
    },
}

/// Worker handling scale-factor job requests against a filesystem
/// artifact store.
#[derive(Clone)]
pub struct JobProcessor {
    store: JobStore,
    output_dir: PathBuf,
}

impl JobProcessor {
    pub fn new(store: JobStore, output_dir: PathBuf) -> Self {
        Self { store, output_dir }
    }

    pub fn store(&self) -> &JobStore {
        &self.store
    }

    /// Parses one intake line and runs the request to completion.
    ///
    /// Request-level validation failures (unknown parent, bad factor) are
    /// returned as errors; failures of an accepted job are recorded on the
    /// job itself and never bubble out of the worker.
    pub async fn process_message(&self, body: &str) -> Result<()> {
        let request: JobRequest = serde_json::from_str(body).map_err(|e| {
            anyhow!(
                "failed to parse request: {}. Body (first 200 chars): {}",
                e,
                body.chars().take(200).collect::<String>()
            )
        })?;

        match request {
            JobRequest::RegisterArtifact {
                filename,
                artifact_path,
                target_crs,
            } => {
                let job_id = self.register_artifact(filename, artifact_path, target_crs)?;
                info!("registered artifact as completed job {job_id}");
                Ok(())
            }
            JobRequest::ApplyScaleFactor {
                parent_job_id,
                scale_factor,
                output_format,
            } => {
                let job_id = self.submit_scale_job(parent_job_id, scale_factor, output_format)?;
                info!("created scale job {job_id} for parent {parent_job_id} with factor {scale_factor}");
                self.process_scale_job(job_id).await;
                Ok(())
            }
        }
    }

    /// Records an existing GeoJSON artifact as a completed job.
    pub fn register_artifact(
        &self,
        filename: String,
        artifact_path: PathBuf,
        target_crs: Option<String>,
    ) -> Result<Uuid> {
        ensure!(
            artifact_path.is_file(),
            "artifact file not found: {}",
            artifact_path.display()
        );
        let job_id = self.store.insert(JobRecord {
            status: JobStatus::Completed,
            filename,
            target_crs: target_crs.unwrap_or_else(|| "EPSG:4326".to_string()),
            output_format: "geojson".to_string(),
            progress: 100,
            message: "artifact registered".to_string(),
            output_path: Some(artifact_path),
            scale_factor: None,
            parent_job_id: None,
        });
        Ok(job_id)
    }

    /// Validates a scale request against its parent job and creates the
    /// pending child job. Mirrors the checks a caller-facing endpoint
    /// performs before any processing starts.
    pub fn submit_scale_job(
        &self,
        parent_job_id: Uuid,
        scale_factor: f64,
        output_format: Option<String>,
    ) -> Result<Uuid> {
        let parent = self
            .store
            .get(parent_job_id)
            .ok_or_else(|| anyhow!("job {parent_job_id} not found"))?;

        ensure!(
            parent.status == JobStatus::Completed,
            "original job must be completed, current status: {:?}",
            parent.status
        );

        let artifact = parent
            .output_path
            .as_ref()
            .ok_or_else(|| anyhow!("original job {parent_job_id} has no output artifact"))?;
        ensure!(
            artifact.is_file(),
            "original artifact not found: {}",
            artifact.display()
        );

        ensure!(
            scale_factor.is_finite() && scale_factor > 0.0,
            "scale factor must be a finite number greater than 0, got {scale_factor}"
        );
        ensure!(
            SUPPORTED_FACTOR_RANGE.contains(&scale_factor),
            "scale factor {scale_factor} is outside the valid range ({} to {})",
            SUPPORTED_FACTOR_RANGE.start(),
            SUPPORTED_FACTOR_RANGE.end()
        );

        let output_format = output_format.unwrap_or_else(|| parent.output_format.clone());
        if output_format != "geojson" {
            bail!("output format must be \"geojson\", got {output_format:?}");
        }

        let job_id = self.store.insert(JobRecord {
            status: JobStatus::Pending,
            filename: parent.filename.clone(),
            target_crs: parent.target_crs.clone(),
            output_format,
            progress: 0,
            message: format!("applying scale factor {scale_factor}..."),
            output_path: None,
            scale_factor: Some(scale_factor),
            parent_job_id: Some(parent_job_id),
        });
        Ok(job_id)
    }

    /// Runs an accepted scale job to completion. Any failure marks the job
    /// failed with the error's message; previously persisted artifacts are
    /// left intact.
    pub async fn process_scale_job(&self, job_id: Uuid) {
        if let Err(e) = self.run_scale_job(job_id).await {
            let message = format!("scale factor application failed: {e:#}");
            error!("job {job_id}: {message}");
            self.store.mark_failed(job_id, message);
        }
    }

    async fn run_scale_job(&self, job_id: Uuid) -> Result<()> {
        let job = self
            .store
            .get(job_id)
            .ok_or_else(|| anyhow!("job {job_id} not found"))?;
        let scale_factor = job
            .scale_factor
            .ok_or_else(|| anyhow!("job {job_id} has no scale factor"))?;
        let parent_job_id = job
            .parent_job_id
            .ok_or_else(|| anyhow!("job {job_id} has no parent job"))?;

        self.store
            .set_progress(job_id, 10, "initializing scale factor application...");

        let parent = self
            .store
            .get(parent_job_id)
            .ok_or_else(|| anyhow!("parent job {parent_job_id} not found"))?;
        let artifact = parent
            .output_path
            .ok_or_else(|| anyhow!("parent job {parent_job_id} has no output artifact"))?;

        self.store
            .set_progress(job_id, 20, "loading original conversion...");
        let raw = tokio::fs::read(&artifact)
            .await
            .with_context(|| format!("failed to read original artifact: {}", artifact.display()))?;

        self.store.set_progress(
            job_id,
            40,
            format!("applying scale factor {scale_factor}..."),
        );
        // The transform is pure CPU work; keep it off the async runtime.
        let scaled = tokio::task::spawn_blocking(move || -> Result<FeatureCollection> {
            let collection: FeatureCollection = serde_json::from_slice(&raw)
                .context("original artifact is not a valid FeatureCollection")?;
            Ok(gridscale::apply_scale_factor(&collection, scale_factor)?)
        })
        .await
        .context("scale task panicked")??;

        self.store.set_progress(job_id, 70, "saving scaled output...");
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .with_context(|| {
                format!(
                    "could not create output directory: {}",
                    self.output_dir.display()
                )
            })?;
        let output_path = self.output_dir.join(format!("{job_id}_scaled.geojson"));
        let payload =
            serde_json::to_vec_pretty(&scaled).context("failed to serialize scaled collection")?;
        tokio::fs::write(&output_path, &payload)
            .await
            .with_context(|| format!("failed to write output file: {}", output_path.display()))?;

        let file_size = tokio::fs::metadata(&output_path)
            .await
            .context("output file was not created")?
            .len();
        ensure!(file_size > 0, "output file is empty");

        self.store.update(job_id, |record| {
            record.status = JobStatus::Completed;
            record.progress = 100;
            record.output_path = Some(output_path.clone());
            record.message = format!("scale factor {scale_factor} applied successfully");
        });

        info!("scale job {job_id} completed: {} ({file_size} bytes)", output_path.display());
        Ok(())
    }

    /// Consumes intake messages until shutdown or intake close, processing
    /// up to [`MAX_CONCURRENT_JOBS`] requests concurrently.
    pub async fn listen_and_process(
        &self,
        mut requests: mpsc::Receiver<String>,
        mut shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<()> {
        info!("starting worker (max {MAX_CONCURRENT_JOBS} concurrent jobs)");
        let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENT_JOBS));

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("received shutdown signal");
                    break;
                }
                message = requests.recv() => {
                    let Some(body) = message else {
                        info!("intake closed, draining in-flight jobs");
                        break;
                    };

                    let processor = self.clone();
                    let semaphore = semaphore.clone();
                    tokio::spawn(async move {
                        let _permit = match semaphore.acquire().await {
                            Ok(permit) => permit,
                            Err(e) => {
                                error!("failed to acquire semaphore permit: {e}");
                                return;
                            }
                        };
                        if let Err(e) = processor.process_message(&body).await {
                            error!("error during request processing: {e:#}");
                        }
                    });
                }
            }
        }

        // Wait until every in-flight job has released its permit.
        let _ = semaphore.acquire_many(MAX_CONCURRENT_JOBS as u32).await;
        info!("worker exiting gracefully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_parse_from_action_tagged_json() {
        let body = r#"{
            "action": "applyScaleFactor",
            "parentJobId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
            "scaleFactor": 1.00013
        }"#;
        let request: JobRequest = serde_json::from_str(body).unwrap();
        match request {
            JobRequest::ApplyScaleFactor {
                scale_factor,
                output_format,
                ..
            } => {
                assert_eq!(scale_factor, 1.00013);
                assert!(output_format.is_none());
            }
            other => panic!("expected ApplyScaleFactor, got {other:?}"),
        }
    }

    #[test]
    fn register_request_defaults_the_crs_field() {
        let body = r#"{
            "action": "registerArtifact",
            "filename": "site_plan.dxf",
            "artifactPath": "/tmp/site_plan.geojson"
        }"#;
        let request: JobRequest = serde_json::from_str(body).unwrap();
        match request {
            JobRequest::RegisterArtifact { target_crs, .. } => assert!(target_crs.is_none()),
            other => panic!("expected RegisterArtifact, got {other:?}"),
        }
    }

    #[test]
    fn unknown_parent_is_rejected_at_submission() {
        let processor = JobProcessor::new(JobStore::new(), std::env::temp_dir());
        let err = processor
            .submit_scale_job(Uuid::new_v4(), 1.05, None)
            .unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn missing_artifact_file_is_rejected_at_registration() {
        let processor = JobProcessor::new(JobStore::new(), std::env::temp_dir());
        let err = processor
            .register_artifact(
                "missing.dxf".into(),
                PathBuf::from("/nonexistent/missing.geojson"),
                None,
            )
            .unwrap_err();
        assert!(err.to_string().contains("artifact file not found"));
    }
}
