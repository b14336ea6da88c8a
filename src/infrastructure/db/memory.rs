use std::{cmp::Ordering, sync::Arc};

use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use uuid::Uuid;

use crate::{
    entities::{
        application::{Application, ApplicationInsert, ApplicationStatus},
        job::{Job, JobInsert},
        user::{User, UserInsert},
    },
    errors::AppError,
    repositories::{
        application::{ApplicationRepository, ALREADY_APPLIED},
        job::JobRepository,
        user::UserRepository,
    },
};

/// In-process store backing `memory://` deployments and the test suite.
/// Uniqueness of emails and of (job, candidate) pairs is enforced through
/// map entries, so concurrent inserts cannot both win.
#[derive(Clone, Default)]
pub struct MemoryRepo {
    users: Arc<DashMap<Uuid, User>>,
    emails: Arc<DashMap<String, Uuid>>,
    jobs: Arc<DashMap<Uuid, Job>>,
    applications: Arc<DashMap<Uuid, Application>>,
    applied: Arc<DashMap<(Uuid, Uuid), Uuid>>,
}

impl MemoryRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = self
            .emails
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|u| u.clone()));
        Ok(user)
    }

    async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.get(id).map(|u| u.clone()))
    }

    async fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.users.get(id).map(|u| u.clone()))
            .collect())
    }

    async fn create_user(&self, user: &UserInsert) -> Result<User, AppError> {
        let id = Uuid::new_v4();
        match self.emails.entry(user.email.clone()) {
            Entry::Occupied(_) => return Err(AppError::Conflict("User already exists".to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let record = User {
            id,
            name: user.name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            skills: user.skills.clone(),
            created_at: user.created_at,
        };
        self.users.insert(id, record.clone());
        Ok(record)
    }
}

#[async_trait]
impl JobRepository for MemoryRepo {
    async fn create_job(&self, job: &JobInsert) -> Result<Job, AppError> {
        let record = Job {
            id: Uuid::new_v4(),
            recruiter_id: job.recruiter_id,
            title: job.title.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            min_experience: job.min_experience,
            max_experience: job.max_experience,
            education: job.education.clone(),
            job_type: job.job_type,
            location: job.location.clone(),
            company_name: job.company_name.clone(),
            created_at: job.created_at,
        };
        self.jobs.insert(record.id, record.clone());
        Ok(record)
    }

    async fn get_job_by_id(&self, id: &Uuid) -> Result<Option<Job>, AppError> {
        Ok(self.jobs.get(id).map(|j| j.clone()))
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, AppError> {
        let mut jobs: Vec<Job> = self.jobs.iter().map(|j| j.value().clone()).collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(jobs)
    }

    async fn list_jobs_with_counts(&self, recruiter_id: &Uuid) -> Result<Vec<(Job, i64)>, AppError> {
        let mut jobs: Vec<Job> = self
            .jobs
            .iter()
            .filter(|j| j.recruiter_id == *recruiter_id)
            .map(|j| j.value().clone())
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut counted = Vec::with_capacity(jobs.len());
        for job in jobs {
            let count = self.count_applications_by_job(&job.id).await?;
            counted.push((job, count));
        }
        Ok(counted)
    }

    async fn delete_job_cascade(&self, id: &Uuid) -> Result<u64, AppError> {
        if self.jobs.remove(id).is_none() {
            return Err(AppError::NotFound("Job not found".to_string()));
        }

        let doomed: Vec<(Uuid, Uuid)> = self
            .applications
            .iter()
            .filter(|a| a.job_id == *id)
            .map(|a| (a.id, a.candidate_id))
            .collect();

        for (application_id, candidate_id) in &doomed {
            self.applications.remove(application_id);
            self.applied.remove(&(*id, *candidate_id));
        }
        Ok(doomed.len() as u64)
    }
}

#[async_trait]
impl ApplicationRepository for MemoryRepo {
    async fn create_application(&self, application: &ApplicationInsert) -> Result<Application, AppError> {
        if !self.jobs.contains_key(&application.job_id) {
            return Err(AppError::NotFound("Job not found".to_string()));
        }

        let id = Uuid::new_v4();
        match self.applied.entry((application.job_id, application.candidate_id)) {
            Entry::Occupied(_) => return Err(AppError::Conflict(ALREADY_APPLIED.to_string())),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let record = Application {
            id,
            job_id: application.job_id,
            candidate_id: application.candidate_id,
            score: application.score,
            matching_skills: application.matching_skills.clone(),
            missing_skills: application.missing_skills.clone(),
            status: application.status,
            source: application.source,
            applied_at: application.applied_at,
        };
        self.applications.insert(id, record.clone());
        Ok(record)
    }

    async fn get_application_by_id(&self, id: &Uuid) -> Result<Option<Application>, AppError> {
        Ok(self.applications.get(id).map(|a| a.clone()))
    }

    async fn list_applications_by_candidate(&self, candidate_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let mut applications: Vec<Application> = self
            .applications
            .iter()
            .filter(|a| a.candidate_id == *candidate_id)
            .map(|a| a.value().clone())
            .collect();
        applications.sort_by(|a, b| b.applied_at.cmp(&a.applied_at));
        Ok(applications)
    }

    async fn list_applications_by_job(&self, job_id: &Uuid) -> Result<Vec<Application>, AppError> {
        let mut applications: Vec<Application> = self
            .applications
            .iter()
            .filter(|a| a.job_id == *job_id)
            .map(|a| a.value().clone())
            .collect();
        applications.sort_by(|a, b| by_score_desc(a.score, b.score).then(a.applied_at.cmp(&b.applied_at)));
        Ok(applications)
    }

    async fn count_applications_by_job(&self, job_id: &Uuid) -> Result<i64, AppError> {
        Ok(self.applications.iter().filter(|a| a.job_id == *job_id).count() as i64)
    }

    async fn decide_application(&self, id: &Uuid, status: ApplicationStatus) -> Result<Option<Application>, AppError> {
        let Some(mut application) = self.applications.get_mut(id) else {
            return Ok(None);
        };
        if application.status != ApplicationStatus::Pending {
            return Ok(None);
        }
        application.status = status;
        Ok(Some(application.clone()))
    }
}

/// Descending by score with unscored applications last.
fn by_score_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
