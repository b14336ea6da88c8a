use std::path::Path;

use async_trait::async_trait;
use reqwest::{multipart::{Form, Part}, Client};
use tracing::instrument;

use crate::{
    entities::matching::{GatewayJob, GatewayResponse},
    errors::AppError,
    repositories::match_gateway::MatchGateway,
    settings::AppConfig,
};

const RESUME_FIELD: &str = "resume";
const JOBS_FIELD: &str = "jobs";

/// HTTP client for the external resume scoring service.
#[derive(Clone)]
pub struct MlServiceClient {
    client: Client,
    endpoint: String,
}

impl MlServiceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        MlServiceClient {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.ml_service_url.clone())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn build_form(resume: &Path, jobs: &[GatewayJob]) -> Result<Form, AppError> {
        let bytes = tokio::fs::read(resume).await?;
        let file_name = resume
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| RESUME_FIELD.to_string());

        let jobs_json = serde_json::to_string(jobs)
            .map_err(|e| AppError::InternalError(format!("Failed to encode jobs: {}", e)))?;

        Ok(Form::new()
            .part(RESUME_FIELD, Part::bytes(bytes).file_name(file_name))
            .text(JOBS_FIELD, jobs_json))
    }
}

#[async_trait]
impl MatchGateway for MlServiceClient {
    #[instrument(skip(self, jobs), fields(endpoint = %self.endpoint, job_count = jobs.len()))]
    async fn score(&self, resume: &Path, jobs: &[GatewayJob]) -> Result<GatewayResponse, AppError> {
        let form = Self::build_form(resume, jobs).await?;

        let response = self.client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let body = response.json::<GatewayResponse>().await?;
        tracing::debug!(status = %body.status, "Scoring service answered");
        Ok(body)
    }
}
