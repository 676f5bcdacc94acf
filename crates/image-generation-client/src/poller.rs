//! Submit-then-poll loop for image jobs.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, instrument};

use crate::{normalize_output, JobError, PredictionBackend, PredictionRequest, PredictionStatus};

/// Polling cadence and bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait between two status requests.
    pub interval: Duration,
    /// Status requests made before giving up on a pending job. Zero is treated as one.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_attempts: 150,
        }
    }
}

/// Runs image jobs against a [`PredictionBackend`].
#[derive(Clone)]
pub struct JobPoller {
    backend: Arc<dyn PredictionBackend>,
    config: PollConfig,
}

impl JobPoller {
    pub fn new(backend: Arc<dyn PredictionBackend>, config: PollConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Submits `request` and polls until the job leaves the pending status.
    ///
    /// The first status request is made right after submission; every pending answer is
    /// followed by one `interval` wait. Returns the result image URL.
    #[instrument(skip(self, request), fields(version = %request.version))]
    pub async fn run_job(&self, request: &PredictionRequest) -> Result<String, JobError> {
        let id = self.backend.create(request).await?;
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let prediction = self.backend.fetch(&id).await?;
            debug!(job_id = %id, attempt, status = ?prediction.status, "job polled");

            match prediction.status {
                PredictionStatus::Succeeded => {
                    let url = normalize_output(prediction.output.as_ref())
                        .ok_or_else(|| JobError::MissingOutput { id: id.clone() })?;
                    info!(job_id = %id, attempt, image_url = %url, "job succeeded");
                    return Ok(url);
                }
                PredictionStatus::Failed => {
                    let reason = prediction.error_message();
                    error!(job_id = %id, attempt, reason = ?reason, "job failed");
                    return Err(JobError::Failed { id, reason });
                }
                PredictionStatus::Pending if attempt < max_attempts => {
                    tokio::time::sleep(self.config.interval).await;
                }
                PredictionStatus::Pending => {}
            }
        }

        error!(job_id = %id, attempts = max_attempts, "job polling gave up");
        Err(JobError::TimedOut {
            id,
            attempts: max_attempts,
        })
    }
}
