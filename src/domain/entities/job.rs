use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::domain::validation::not_blank;

// ───── Constants ──────────────────────────────────────────────────────
pub const DEFAULT_COMPANY_NAME: &str = "Company Not Specified";
pub const DEFAULT_EDUCATION: &str = "Any Degree";
pub const DEFAULT_LOCATION: &str = "Remote";
const MAX_TITLE_LENGTH: u64 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    Internship,
    Contract,
}

impl JobType {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::Internship => "Internship",
            JobType::Contract => "Contract",
        }
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Full-time" => Ok(JobType::FullTime),
            "Internship" => Ok(JobType::Internship),
            "Contract" => Ok(JobType::Contract),
            other => Err(format!("unknown job type: {other}")),
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub min_experience: i32,
    pub max_experience: Option<i32>,
    pub education: String,
    pub job_type: JobType,
    pub location: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct JobInsert {
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub min_experience: i32,
    pub max_experience: Option<i32>,
    pub education: String,
    pub job_type: JobType,
    pub location: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

impl Job {
    /// Structured text handed to the scoring service in place of the raw
    /// description, so structured attributes take part in scoring.
    pub fn composite_text(&self) -> String {
        // a zero ceiling reads as open-ended, same as no ceiling
        let max_experience = self
            .max_experience
            .filter(|max| *max > 0)
            .map(|max| max.to_string())
            .unwrap_or_else(|| "Any".to_string());

        [
            format!("Job Title: {}", self.title),
            format!("Description: {}", self.description),
            format!("Required Skills: {}", self.required_skills.join(", ")),
            format!("Experience: {} - {} years", self.min_experience, max_experience),
            format!("Education: {}", self.education),
            format!("Job Type: {}", self.job_type),
            format!("Location: {}", self.location),
        ]
        .join("\n")
    }

    /// The job's own company name when meaningful, else the recruiter's,
    /// else the placeholder.
    pub fn resolve_company_name(&self, recruiter_company: Option<&str>) -> String {
        resolve_company_name(&self.company_name, recruiter_company)
    }
}

pub fn resolve_company_name(job_company: &str, recruiter_company: Option<&str>) -> String {
    let job_company = job_company.trim();
    if !job_company.is_empty() && job_company != DEFAULT_COMPANY_NAME {
        return job_company.to_string();
    }

    match recruiter_company.map(str::trim) {
        Some(company) if !company.is_empty() => company.to_string(),
        _ => DEFAULT_COMPANY_NAME.to_string(),
    }
}

// ───── API Response Models ──────────────────────────────────────────

/// A job with its company name already resolved for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobView {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub min_experience: i32,
    pub max_experience: Option<i32>,
    pub education: String,
    pub job_type: JobType,
    pub location: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
}

impl JobView {
    pub fn new(job: Job, recruiter_company: Option<&str>) -> Self {
        let company_name = job.resolve_company_name(recruiter_company);
        JobView {
            id: job.id,
            recruiter_id: job.recruiter_id,
            title: job.title,
            description: job.description,
            required_skills: job.required_skills,
            min_experience: job.min_experience,
            max_experience: job.max_experience,
            education: job.education,
            job_type: job.job_type,
            location: job.location,
            company_name,
            created_at: job.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterJob {
    #[serde(flatten)]
    pub job: JobView,
    pub application_count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDeletedResponse {
    pub message: String,
    pub deleted_applications: u64,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_experience_range", skip_on_field_errors = false))]
pub struct NewJob {
    #[serde(default)]
    #[validate(
        length(max = MAX_TITLE_LENGTH, message = "Title is too long"),
        custom(function = "not_blank", message = "Title is required")
    )]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Description is required"))]
    pub description: String,

    #[serde(default)]
    pub required_skills: Option<Vec<String>>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Minimum experience cannot be negative"))]
    pub min_experience: Option<i32>,

    #[serde(default)]
    #[validate(range(min = 0, message = "Maximum experience cannot be negative"))]
    pub max_experience: Option<i32>,

    #[serde(default)]
    pub education: Option<String>,

    #[serde(default)]
    pub job_type: Option<JobType>,

    #[serde(default)]
    pub location: Option<String>,

    #[serde(default)]
    pub company_name: Option<String>,
}

fn validate_experience_range(job: &NewJob) -> Result<(), ValidationError> {
    if let (Some(min), Some(max)) = (job.min_experience, job.max_experience) {
        if max < min {
            let mut error = ValidationError::new("max_experience");
            error.message = Some("Maximum experience cannot be below minimum experience".into());
            return Err(error);
        }
    }
    Ok(())
}

/// Blank optional strings fall back to the schema default.
fn or_default(value: Option<&String>, default: &str) -> String {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl NewJob {
    pub fn prepare_for_insert(&self, recruiter_id: Uuid) -> JobInsert {
        let required_skills = self
            .required_skills
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        JobInsert {
            recruiter_id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            required_skills,
            min_experience: self.min_experience.unwrap_or(0),
            max_experience: self.max_experience,
            education: or_default(self.education.as_ref(), DEFAULT_EDUCATION),
            job_type: self.job_type.unwrap_or_default(),
            location: or_default(self.location.as_ref(), DEFAULT_LOCATION),
            company_name: or_default(self.company_name.as_ref(), DEFAULT_COMPANY_NAME),
            created_at: Utc::now(),
        }
    }
}
