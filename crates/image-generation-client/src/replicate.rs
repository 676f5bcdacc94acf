//! Replicate-style prediction API over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::{JobError, Prediction, PredictionBackend, PredictionRequest};

pub const DEFAULT_BASE_URL: &str = "https://api.replicate.com/v1";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct CreatedPrediction {
    id: String,
}

/// Client for `POST /predictions` and `GET /predictions/{id}` with `Authorization: Token`.
#[derive(Clone)]
pub struct ReplicateClient {
    http: reqwest::Client,
    api_token: String,
    base_url: String,
}

impl ReplicateClient {
    pub fn new(api_token: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            http,
            api_token,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn auth_header(&self) -> String {
        format!("Token {}", self.api_token)
    }
}

#[async_trait]
impl PredictionBackend for ReplicateClient {
    #[instrument(skip(self, request), fields(version = %request.version))]
    async fn create(&self, request: &PredictionRequest) -> Result<String, JobError> {
        let response = self
            .http
            .post(self.url("predictions"))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if status != StatusCode::CREATED {
            warn!(status = status.as_u16(), "job submission rejected");
            return Err(JobError::Submit {
                status: status.as_u16(),
                body,
            });
        }

        let created: CreatedPrediction =
            serde_json::from_str(&body).map_err(|e| JobError::MalformedPayload(e.to_string()))?;
        info!(job_id = %created.id, "job submitted");
        Ok(created.id)
    }

    #[instrument(skip(self))]
    async fn fetch(&self, id: &str) -> Result<Prediction, JobError> {
        let response = self
            .http
            .get(self.url(&format!("predictions/{id}")))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(JobError::Poll {
                id: id.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        let mut prediction: Prediction =
            serde_json::from_str(&body).map_err(|e| JobError::MalformedPayload(e.to_string()))?;
        if prediction.id.is_empty() {
            prediction.id = id.to_string();
        }
        debug!(job_id = %id, status = ?prediction.status, "job status fetched");
        Ok(prediction)
    }
}
