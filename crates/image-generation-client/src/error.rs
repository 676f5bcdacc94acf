use thiserror::Error;

/// Failure of an image job. Each is reported once; nothing is retried.
#[derive(Error, Debug)]
pub enum JobError {
    /// Job creation was not acknowledged with 201.
    #[error("job submission rejected with {status}: {body}")]
    Submit { status: u16, body: String },

    /// A status request was answered with a non-success status.
    #[error("job status request for {id} returned {status}: {body}")]
    Poll { id: String, status: u16, body: String },

    /// The job reached the failed (or canceled) terminal status.
    #[error("job {id} failed: {}", .reason.as_deref().unwrap_or("no reason given"))]
    Failed { id: String, reason: Option<String> },

    /// The job was still pending after the maximum number of polls.
    #[error("job {id} still pending after {attempts} polls")]
    TimedOut { id: String, attempts: u32 },

    /// The job succeeded but its output holds no image URL.
    #[error("job {id} succeeded without an image URL")]
    MissingOutput { id: String },

    #[error("malformed job payload: {0}")]
    MalformedPayload(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
