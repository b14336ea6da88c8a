use std::{collections::HashMap, path::Path};

use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        application::{ApplyRequest, CandidateApplication, ApplySubmittedResponse},
        job::{Job, JobView},
        matching::{GatewayJob, GatewayMatch, JobMatch, MatchResults, ScoreCheck},
    },
    errors::AppError,
    upload::resume::StoredResume,
    repositories::{
        application::ApplicationRepository,
        job::JobRepository,
        match_gateway::MatchGateway,
        user::UserRepository,
    },
};

pub struct CandidateHandler<S, G>
where
    S: UserRepository + JobRepository + ApplicationRepository,
    G: MatchGateway,
{
    pub store: S,
    pub gateway: G,
}

impl<S, G> CandidateHandler<S, G>
where
    S: UserRepository + JobRepository + ApplicationRepository,
    G: MatchGateway,
{
    pub fn new(store: S, gateway: G) -> Self {
        CandidateHandler { store, gateway }
    }

    /// Scores the resume against every job. Nothing is persisted and the
    /// resume is deleted whatever the outcome.
    #[instrument(skip(self, resume), fields(resume = %resume.original_name()))]
    pub async fn match_jobs(&self, resume: StoredResume) -> Result<MatchResults, AppError> {
        let outcome = self.score_all_jobs(resume.path()).await;
        resume.discard().await;
        outcome
    }

    /// Scores the resume against one job; the resume is deleted on every path.
    #[instrument(skip(self, resume), fields(resume = %resume.original_name()))]
    pub async fn check_score(&self, job_id: &Uuid, resume: StoredResume) -> Result<ScoreCheck, AppError> {
        let outcome = self.score_one_job(job_id, resume.path()).await;
        resume.discard().await;
        outcome
    }

    async fn score_all_jobs(&self, resume: &Path) -> Result<MatchResults, AppError> {
        let jobs = self.store.list_jobs().await?;
        if jobs.is_empty() {
            return Err(AppError::NotFound("No jobs available".to_string()));
        }

        let matches = self.request_matches(resume, &jobs).await?;
        let companies = self.recruiter_companies(&jobs).await?;
        let by_id: HashMap<String, &Job> = jobs.iter().map(|job| (job.id.to_string(), job)).collect();

        let results = matches
            .into_iter()
            .filter_map(|scored| {
                let Some(job) = by_id.get(&scored.job_id) else {
                    tracing::warn!(job_id = %scored.job_id, "Scoring service returned an unknown job");
                    return None;
                };
                let company = job.resolve_company_name(company_of(&companies, &job.recruiter_id));
                Some(JobMatch::merge(job, company, scored))
            })
            .collect();

        Ok(MatchResults { success: true, results })
    }

    async fn score_one_job(&self, job_id: &Uuid, resume: &Path) -> Result<ScoreCheck, AppError> {
        let job = self.find_job(job_id).await?;

        let scored = self.request_matches(resume, std::slice::from_ref(&job))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::Upstream("Scoring service returned no matches".to_string()))?;

        let recruiter = self.store.get_user_by_id(&job.recruiter_id).await?;
        let company = job.resolve_company_name(recruiter.as_ref().and_then(|r| r.company_name.as_deref()));

        Ok(ScoreCheck {
            success: true,
            result: JobMatch::merge(&job, company, scored),
        })
    }

    async fn request_matches(&self, resume: &Path, jobs: &[Job]) -> Result<Vec<GatewayMatch>, AppError> {
        let payload: Vec<GatewayJob> = jobs.iter().map(GatewayJob::from).collect();
        let response = self.gateway.score(resume, &payload).await?;

        let status = response.status.clone();
        response
            .into_matches()
            .ok_or_else(|| AppError::Upstream(format!("Invalid response from scoring service (status: {})", status)))
    }

    #[instrument(skip(self))]
    pub async fn list_jobs(&self) -> Result<Vec<JobView>, AppError> {
        let jobs = self.store.list_jobs().await?;
        let companies = self.recruiter_companies(&jobs).await?;

        Ok(jobs
            .into_iter()
            .map(|job| {
                let recruiter_id = job.recruiter_id;
                JobView::new(job, company_of(&companies, &recruiter_id))
            })
            .collect())
    }

    #[instrument(skip(self, request))]
    pub async fn apply(
        &self,
        job_id: &Uuid,
        candidate_id: &Uuid,
        request: ApplyRequest,
    ) -> Result<ApplySubmittedResponse, AppError> {
        request.validate()?;
        self.find_job(job_id).await?;

        // uniqueness of (job, candidate) is decided by the store
        let application = self.store
            .create_application(&request.prepare_for_insert(*job_id, *candidate_id))
            .await?;

        tracing::info!(application_id = %application.id, "Application submitted");
        Ok(ApplySubmittedResponse {
            success: true,
            message: "Application submitted".to_string(),
            application,
        })
    }

    /// The candidate's applications, newest first, each with its job.
    #[instrument(skip(self))]
    pub async fn list_applications(&self, candidate_id: &Uuid) -> Result<Vec<CandidateApplication>, AppError> {
        let applications = self.store.list_applications_by_candidate(candidate_id).await?;

        let mut jobs = Vec::new();
        for application in &applications {
            if let Some(job) = self.store.get_job_by_id(&application.job_id).await? {
                jobs.push(job);
            }
        }
        let companies = self.recruiter_companies(&jobs).await?;
        let mut jobs: HashMap<Uuid, Job> = jobs.into_iter().map(|job| (job.id, job)).collect();

        Ok(applications
            .into_iter()
            .map(|application| {
                let job = jobs.remove(&application.job_id).map(|job| {
                    let recruiter_id = job.recruiter_id;
                    JobView::new(job, company_of(&companies, &recruiter_id))
                });
                CandidateApplication { application, job }
            })
            .collect())
    }

    async fn find_job(&self, job_id: &Uuid) -> Result<Job, AppError> {
        self.store
            .get_job_by_id(job_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Job not found".to_string()))
    }

    async fn recruiter_companies(&self, jobs: &[Job]) -> Result<HashMap<Uuid, Option<String>>, AppError> {
        let mut ids: Vec<Uuid> = jobs.iter().map(|job| job.recruiter_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let recruiters = self.store.get_users_by_ids(&ids).await?;
        Ok(recruiters
            .into_iter()
            .map(|user| (user.id, user.company_name))
            .collect())
    }
}

fn company_of<'a>(companies: &'a HashMap<Uuid, Option<String>>, recruiter_id: &Uuid) -> Option<&'a str> {
    companies.get(recruiter_id).and_then(|company| company.as_deref())
}
