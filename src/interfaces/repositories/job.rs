use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    entities::job::{Job, JobInsert},
    errors::AppError,
    repositories::sqlx_repo::{collect_rows, JobCountRow, JobRow, SqlxRepo},
};

const JOB_COLUMNS: &str = "j.id, j.recruiter_id, j.title, j.description, j.required_skills, \
    j.min_experience, j.max_experience, j.education, j.job_type, j.location, j.company_name, j.created_at";

#[async_trait]
pub trait JobRepository: Send + Sync {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError>;
    async fn get_job_by_id(&self, id: &Uuid) -> Result<Option<Job>, AppError>;
    /// All jobs, newest first.
    async fn list_jobs(&self) -> Result<Vec<Job>, AppError>;
    /// Jobs owned by the recruiter, newest first, with live application counts.
    async fn list_jobs_with_counts(&self, recruiter_id: &Uuid) -> Result<Vec<(Job, i64)>, AppError>;
    /// Removes the job and every application referencing it; returns the
    /// number of applications removed.
    async fn delete_job_cascade(&self, id: &Uuid) -> Result<u64, AppError>;
}

#[async_trait]
impl<T: JobRepository + ?Sized> JobRepository for Arc<T> {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        (**self).create_job(job).await
    }

    async fn get_job_by_id(&self, id: &Uuid) -> Result<Option<Job>, AppError> {
        (**self).get_job_by_id(id).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        (**self).list_jobs().await
    }

    async fn list_jobs_with_counts(&self, recruiter_id: &Uuid) -> Result<Vec<(Job, i64)>, AppError> {
        (**self).list_jobs_with_counts(recruiter_id).await
    }

    async fn delete_job_cascade(&self, id: &Uuid) -> Result<u64, AppError> {
        (**self).delete_job_cascade(id).await
    }
}

#[async_trait]
impl JobRepository for SqlxRepo {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let row = sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO jobs AS j (
                recruiter_id, title, description, required_skills, min_experience,
                max_experience, education, job_type, location, company_name, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING j.id, j.recruiter_id, j.title, j.description, j.required_skills,
                j.min_experience, j.max_experience, j.education, j.job_type, j.location,
                j.company_name, j.created_at
            "#,
        )
        .bind(job.recruiter_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.required_skills)
        .bind(job.min_experience)
        .bind(job.max_experience)
        .bind(&job.education)
        .bind(job.job_type.as_str())
        .bind(&job.location)
        .bind(&job.company_name)
        .bind(job.created_at)
        .fetch_one(&self.pool)
        .await?;

        Job::try_from(row)
    }

    async fn get_job_by_id(&self, id: &Uuid) -> Result<Option<Job>, AppError> {
        let row = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j WHERE j.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Job::try_from).transpose()
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let rows = sqlx::query_as::<_, JobRow>(&format!(
            "SELECT {JOB_COLUMNS} FROM jobs j ORDER BY j.created_at DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        collect_rows(rows)
    }

    async fn list_jobs_with_counts(&self, recruiter_id: &Uuid) -> Result<Vec<(Job, i64)>, AppError> {
        let rows = sqlx::query_as::<_, JobCountRow>(&format!(
            r#"
            SELECT {JOB_COLUMNS}, COUNT(a.id) AS application_count
            FROM jobs j
            LEFT JOIN applications a ON a.job_id = j.id
            WHERE j.recruiter_id = $1
            GROUP BY j.id
            ORDER BY j.created_at DESC
            "#
        ))
        .bind(recruiter_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| Ok((Job::try_from(row.job)?, row.application_count)))
            .collect()
    }

    async fn delete_job_cascade(&self, id: &Uuid) -> Result<u64, AppError> {
        let mut tx = self.pool.begin().await?;

        let removed = sqlx::query("DELETE FROM applications WHERE job_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        let deleted = sqlx::query("DELETE FROM jobs WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if deleted.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::NotFound("Job not found".to_string()));
        }

        tx.commit().await?;
        Ok(removed)
    }
}
