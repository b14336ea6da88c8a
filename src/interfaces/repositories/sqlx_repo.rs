use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    entities::{
        application::{Application, ApplicationSource, ApplicationStatus},
        job::{Job, JobType},
        user::{Role, User},
    },
    errors::AppError,
};

#[derive(Clone)]
pub struct SqlxRepo {
    pub pool: PgPool,
}

impl SqlxRepo {
    pub fn new(pool: PgPool) -> Self {
        SqlxRepo { pool }
    }
}

fn decode<T: FromStr<Err = String>>(raw: &str) -> Result<T, AppError> {
    T::from_str(raw).map_err(|e| AppError::InternalError(format!("Corrupt row: {}", e)))
}

// ───── Row Models ───────────────────────────────────────────────────

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AppError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role: decode::<Role>(&row.role)?,
            company_name: row.company_name,
            skills: row.skills,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub min_experience: i32,
    pub max_experience: Option<i32>,
    pub education: String,
    pub job_type: String,
    pub location: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = AppError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        Ok(Job {
            id: row.id,
            recruiter_id: row.recruiter_id,
            title: row.title,
            description: row.description,
            required_skills: row.required_skills,
            min_experience: row.min_experience,
            max_experience: row.max_experience,
            education: row.education,
            job_type: decode::<JobType>(&row.job_type)?,
            location: row.location,
            company_name: row.company_name,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct JobCountRow {
    #[sqlx(flatten)]
    pub job: JobRow,
    pub application_count: i64,
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub score: Option<f64>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub status: String,
    pub source: String,
    pub applied_at: DateTime<Utc>,
}

impl TryFrom<ApplicationRow> for Application {
    type Error = AppError;

    fn try_from(row: ApplicationRow) -> Result<Self, Self::Error> {
        Ok(Application {
            id: row.id,
            job_id: row.job_id,
            candidate_id: row.candidate_id,
            score: row.score,
            matching_skills: row.matching_skills,
            missing_skills: row.missing_skills,
            status: decode::<ApplicationStatus>(&row.status)?,
            source: decode::<ApplicationSource>(&row.source)?,
            applied_at: row.applied_at,
        })
    }
}

pub(crate) fn collect_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, AppError>
where
    T: TryFrom<R, Error = AppError>,
{
    rows.into_iter().map(T::try_from).collect()
}
