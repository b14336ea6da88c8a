use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::job::{Job, JobType};

pub const SUCCESS_STATUS: &str = "success";

/// One job record as sent to the scoring service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayJob {
    pub id: String,
    pub title: String,
    pub description: String,
}

impl From<&Job> for GatewayJob {
    fn from(job: &Job) -> Self {
        GatewayJob {
            id: job.id.to_string(),
            title: job.title.clone(),
            description: job.composite_text(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayResponse {
    pub status: String,
    #[serde(default)]
    pub matches: Option<Vec<GatewayMatch>>,
    #[serde(default)]
    pub message: Option<String>,
}

impl GatewayResponse {
    /// Matches of a well-formed success response, `None` otherwise.
    pub fn into_matches(self) -> Option<Vec<GatewayMatch>> {
        if self.status == SUCCESS_STATUS {
            self.matches
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayMatch {
    pub job_id: String,
    pub score: f64,
    #[serde(default)]
    pub matching_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
}

// ───── API Response Models ──────────────────────────────────────────

/// A scoring result merged with the stored job fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobMatch {
    pub job_id: Uuid,
    pub title: String,
    pub description: String,
    pub required_skills: Vec<String>,
    pub min_experience: i32,
    pub max_experience: Option<i32>,
    pub education: String,
    pub job_type: JobType,
    pub location: String,
    pub company_name: String,
    pub score: f64,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

impl JobMatch {
    pub fn merge(job: &Job, company_name: String, scored: GatewayMatch) -> Self {
        JobMatch {
            job_id: job.id,
            title: job.title.clone(),
            description: job.description.clone(),
            required_skills: job.required_skills.clone(),
            min_experience: job.min_experience,
            max_experience: job.max_experience,
            education: job.education.clone(),
            job_type: job.job_type,
            location: job.location.clone(),
            company_name,
            score: scored.score,
            matching_skills: scored.matching_skills,
            missing_skills: scored.missing_skills,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MatchResults {
    pub success: bool,
    pub results: Vec<JobMatch>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreCheck {
    pub success: bool,
    #[serde(flatten)]
    pub result: JobMatch,
}
