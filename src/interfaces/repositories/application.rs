use std::{borrow::Cow, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::application::{Application, ApplicationInsert, ApplicationStatus},
    errors::AppError,
    repositories::sqlx_repo::{collect_rows, ApplicationRow, SqlxRepo},
};

const APPLICATION_COLUMNS: &str = "id, job_id, candidate_id, score, matching_skills, \
    missing_skills, status, source, applied_at";

pub const ALREADY_APPLIED: &str = "Already applied to this job";

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Conditional insert: fails with `Conflict` when the candidate already
    /// applied to the job.
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError>;
    async fn get_application_by_id(&self, id: &Uuid) -> Result<Option<Application>, AppError>;
    /// The candidate's applications, newest first.
    async fn list_applications_by_candidate(&self, candidate_id: &Uuid) -> Result<Vec<Application>, AppError>;
    /// Applications to the job, highest score first.
    async fn list_applications_by_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError>;
    async fn count_applications_by_job(&self, job_id: &Uuid) -> Result<i64, AppError>;
    /// Moves a pending application to `status`. Returns `None` when the
    /// application is missing or no longer pending.
    async fn decide_application(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError>;
}

#[async_trait]
impl<T: ApplicationRepository + ?Sized> ApplicationRepository for Arc<T> {
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError> {
        (**self).create_application(application).await
    }

    async fn get_application_by_id(&self, id: &Uuid) -> Result<Option<Application>, AppError> {
        (**self).get_application_by_id(id).await
    }

    async fn list_applications_by_candidate(&self, candidate_id: &Uuid) -> Result<Vec<Application>, AppError> {
        (**self).list_applications_by_candidate(candidate_id).await
    }

    async fn list_applications_by_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError> {
        (**self).list_applications_by_job(job_id).await
    }

    async fn count_applications_by_job(&self, job_id: &Uuid) -> Result<i64, AppError> {
        (**self).count_applications_by_job(job_id).await
    }

    async fn decide_application(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError> {
        (**self).decide_application(id, status).await
    }
}

#[async_trait]
impl ApplicationRepository for SqlxRepo {
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO applications (
                job_id, candidate_id, score, matching_skills, missing_skills,
                status, source, applied_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(application.job_id)
        .bind(application.candidate_id)
        .bind(application.score)
        .bind(&application.matching_skills)
        .bind(&application.missing_skills)
        .bind(application.status.as_str())
        .bind(application.source.as_str())
        .bind(application.applied_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            match e {
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                    AppError::Conflict(ALREADY_APPLIED.to_string())
                }
                sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23503")) => {
                    AppError::NotFound("Job not found".to_string())
                }
                _ => AppError::from(e),
            }
        })?;

        Application::try_from(row)
    }

    async fn get_application_by_id(&self, id: &Uuid) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }

    async fn list_applications_by_candidate(&self, candidate_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE candidate_id = $1 ORDER BY applied_at DESC"
        ))
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        collect_rows(rows)
    }

    async fn list_applications_by_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE job_id = $1 \
             ORDER BY score DESC NULLS LAST, applied_at ASC"
        ))
        .bind(job_id)
        .fetch_all(&self.pool)
        .await?;

        collect_rows(rows)
    }

    async fn count_applications_by_job(&self, job_id: &Uuid) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM applications WHERE job_id = $1")
            .bind(job_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn decide_application(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            UPDATE applications
            SET status = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Application::try_from).transpose()
    }
}
