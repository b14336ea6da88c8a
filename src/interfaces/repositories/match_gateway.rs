use std::{path::Path, sync::Arc};

use async_trait::async_trait;

use crate::{
    entities::matching::{GatewayJob, GatewayResponse},
    errors::AppError,
};

/// Boundary to the external resume scoring service.
#[async_trait]
pub trait MatchGateway: Send + Sync {
    /// Sends the resume and job records in one request and returns the parsed
    /// body. Transport failures and non-2xx answers are `Upstream` errors;
    /// nothing is retried.
    async fn score(&self, resume: &Path, jobs: &[GatewayJob]) -> Result<GatewayResponse, AppError>;
}

#[async_trait]
impl<T: MatchGateway + ?Sized> MatchGateway for Arc<T> {
    async fn score(&self, resume: &Path, jobs: &[GatewayJob]) -> Result<GatewayResponse, AppError> {
        (**self).score(resume, jobs).await
    }
}
