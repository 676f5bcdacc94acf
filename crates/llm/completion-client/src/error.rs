use thiserror::Error;

/// Failure of a completion request. None of these are retried.
#[derive(Error, Debug)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status.
    #[error("completion endpoint returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// Success status, but no reply text where one was expected.
    #[error("malformed completion payload: {0}")]
    MalformedPayload(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
