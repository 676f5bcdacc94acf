//! Job payloads and status types.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Body of a job-creation request: a model version and model-specific input fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRequest {
    pub version: String,
    pub input: Value,
}

impl PredictionRequest {
    /// Text-to-image job.
    pub fn text_to_image(version: impl Into<String>, prompt: &str) -> Self {
        Self {
            version: version.into(),
            input: json!({ "prompt": prompt }),
        }
    }

    /// Edit of an existing image, fetched by the model from `image_url`.
    pub fn image_edit(version: impl Into<String>, image_url: &str, prompt: &str) -> Self {
        Self {
            version: version.into(),
            input: json!({ "image": image_url, "prompt": prompt }),
        }
    }
}

/// Job status reduced to what the poller branches on. `starting`, `processing` and any
/// unknown value are pending; `canceled` counts as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum PredictionStatus {
    Pending,
    Succeeded,
    Failed,
}

impl From<String> for PredictionStatus {
    fn from(status: String) -> Self {
        match status.as_str() {
            "succeeded" => PredictionStatus::Succeeded,
            "failed" | "canceled" => PredictionStatus::Failed,
            _ => PredictionStatus::Pending,
        }
    }
}

/// Snapshot returned by the job-status endpoint. Status bodies may omit `id`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: String,
    pub status: PredictionStatus,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Prediction {
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Reduces a job output to one URL: a string as-is, a list to its first string element.
pub fn normalize_output(output: Option<&Value>) -> Option<String> {
    match output? {
        Value::String(url) if !url.is_empty() => Some(url.clone()),
        Value::Array(items) => items.iter().find_map(|item| match item {
            Value::String(url) if !url.is_empty() => Some(url.clone()),
            _ => None,
        }),
        _ => None,
    }
}
