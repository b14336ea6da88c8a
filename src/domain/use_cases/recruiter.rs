use std::collections::HashMap;

use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        application::{Applicant, Application, StatusAction},
        job::{Job, JobDeletedResponse, JobView, NewJob, RecruiterJob},
        user::{CandidateSummary, User},
    },
    errors::AppError,
    repositories::{
        application::ApplicationRepository,
        job::JobRepository,
        user::UserRepository,
    },
};

pub struct RecruiterHandler<S>
where
    S: UserRepository + JobRepository + ApplicationRepository,
{
    pub store: S,
}

impl<S> RecruiterHandler<S>
where
    S: UserRepository + JobRepository + ApplicationRepository,
{
    pub fn new(store: S) -> Self {
        RecruiterHandler { store }
    }

    /// Own jobs, newest first, with live application counts.
    #[instrument(skip(self))]
    pub async fn list_own_jobs(&self, recruiter_id: &Uuid) -> Result<Vec<RecruiterJob>, AppError> {
        let company = self.company_of(recruiter_id).await?;
        let jobs = self.store.list_jobs_with_counts(recruiter_id).await?;

        Ok(jobs
            .into_iter()
            .map(|(job, application_count)| RecruiterJob {
                job: JobView::new(job, company.as_deref()),
                application_count,
            })
            .collect())
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    pub async fn post_job(&self, recruiter_id: &Uuid, request: NewJob) -> Result<RecruiterJob, AppError> {
        request.validate()?;

        let job = self.store.create_job(&request.prepare_for_insert(*recruiter_id)).await?;
        let company = self.company_of(recruiter_id).await?;

        tracing::info!(job_id = %job.id, "Job posted");
        Ok(RecruiterJob {
            job: JobView::new(job, company.as_deref()),
            application_count: 0,
        })
    }

    /// Applicants for an owned job, highest score first.
    #[instrument(skip(self))]
    pub async fn list_applicants(&self, recruiter_id: &Uuid, job_id: &Uuid) -> Result<Vec<Applicant>, AppError> {
        let job = self.find_job(job_id).await?;
        ensure_owner(&job, recruiter_id, "Not authorized to view this job applications")?;

        let applications = self.store.list_applications_by_job(job_id).await?;
        let candidate_ids: Vec<Uuid> = applications.iter().map(|a| a.candidate_id).collect();
        let candidates: HashMap<Uuid, User> = self.store
            .get_users_by_ids(&candidate_ids)
            .await?
            .into_iter()
            .map(|user| (user.id, user))
            .collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let candidate = candidates.get(&application.candidate_id).map(CandidateSummary::from);
                Applicant { application, candidate }
            })
            .collect())
    }

    /// Moves a pending application to accepted or rejected. Repeating the
    /// decision already taken is a no-op; reversing it is a conflict.
    #[instrument(skip(self))]
    pub async fn update_status(
        &self,
        recruiter_id: &Uuid,
        application_id: &Uuid,
        action: StatusAction,
    ) -> Result<Application, AppError> {
        let application = self.store
            .get_application_by_id(application_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;

        let job = self.find_job(&application.job_id).await?;
        ensure_owner(&job, recruiter_id, "Not authorized")?;

        let target = action.target_status();
        if application.status == target {
            return Ok(application);
        }

        match self.store.decide_application(application_id, target).await? {
            Some(updated) => {
                tracing::info!(status = %updated.status, "Application decided");
                Ok(updated)
            }
            None => {
                // lost a race or already decided the other way
                let current = self.store
                    .get_application_by_id(application_id)
                    .await?
                    .ok_or_else(|| AppError::NotFound("Application not found".to_string()))?;
                if current.status == target {
                    Ok(current)
                } else {
                    Err(AppError::Conflict(format!("Application already {}", current.status)))
                }
            }
        }
    }

    /// Deletes an owned job together with its applications.
    #[instrument(skip(self))]
    pub async fn delete_job(&self, recruiter_id: &Uuid, job_id: &Uuid) -> Result<JobDeletedResponse, AppError> {
        let job = self.find_job(job_id).await?;
        ensure_owner(&job, recruiter_id, "Not authorized to delete this job")?;

        let deleted_applications = self.store.delete_job_cascade(job_id).await?;
        tracing::info!(deleted_applications, "Job removed");

        Ok(JobDeletedResponse {
            message: "Job removed".to_string(),
            deleted_applications,
        })
    }

    async fn find_job(&self, job_id: &Uuid) -> Result<Job, AppError> {
        self.store
            .get_job_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    async fn company_of(&self, recruiter_id: &Uuid) -> Result<Option<String>, AppError> {
        Ok(self.store
            .get_user_by_id(recruiter_id)
            .await?
            .and_then(|user| user.company_name))
    }
}

fn ensure_owner(job: &Job, recruiter_id: &Uuid, message: &str) -> Result<(), AppError> {
    if job.recruiter_id == *recruiter_id {
        Ok(())
    } else {
        tracing::warn!(job_id = %job.id, %recruiter_id, "Recruiter does not own job");
        Err(AppError::Forbidden(message.to_string()))
    }
}
