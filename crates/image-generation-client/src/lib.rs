//! # Image generation client
//!
//! Image generation and editing run as asynchronous remote jobs ("predictions"): a job is
//! submitted, then its status is polled until it succeeds or fails.
//!
//! - [`PredictionBackend`]: submit / fetch seam; [`ReplicateClient`] implements it over HTTP.
//! - [`JobPoller`]: submits a [`PredictionRequest`] and polls with a fixed interval and a
//!   maximum number of attempts, returning the result image URL.

use async_trait::async_trait;

mod error;
mod poller;
mod prediction;
mod replicate;

pub use error::JobError;
pub use poller::{JobPoller, PollConfig};
pub use prediction::{normalize_output, Prediction, PredictionRequest, PredictionStatus};
pub use replicate::{ReplicateClient, DEFAULT_BASE_URL};

/// Remote job API.
#[async_trait]
pub trait PredictionBackend: Send + Sync {
    /// Submits a job and returns its id.
    async fn create(&self, request: &PredictionRequest) -> Result<String, JobError>;

    /// Fetches the current status of job `id`.
    async fn fetch(&self, id: &str) -> Result<Prediction, JobError>;
}
