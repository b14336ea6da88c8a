use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::{job::JobView, user::CandidateSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "accepted" => Ok(ApplicationStatus::Accepted),
            "rejected" => Ok(ApplicationStatus::Rejected),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

/// Which flow produced the score attached to an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationSource {
    #[default]
    GlobalMatch,
    SpecificMatch,
}

impl ApplicationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationSource::GlobalMatch => "global_match",
            ApplicationSource::SpecificMatch => "specific_match",
        }
    }
}

impl FromStr for ApplicationSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "global_match" => Ok(ApplicationSource::GlobalMatch),
            "specific_match" => Ok(ApplicationSource::SpecificMatch),
            other => Err(format!("unknown application source: {other}")),
        }
    }
}

/// Recruiter decision on an application, as named in the route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusAction {
    Accept,
    Reject,
}

impl StatusAction {
    pub fn target_status(&self) -> ApplicationStatus {
        match self {
            StatusAction::Accept => ApplicationStatus::Accepted,
            StatusAction::Reject => ApplicationStatus::Rejected,
        }
    }
}

// ───── Database Models ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub score: Option<f64>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub status: ApplicationStatus,
    pub source: ApplicationSource,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ApplicationInsert {
    pub job_id: Uuid,
    pub candidate_id: Uuid,
    pub score: Option<f64>,
    pub matching_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub status: ApplicationStatus,
    pub source: ApplicationSource,
    pub applied_at: DateTime<Utc>,
}

// ───── Input & Validation ───────────────────────────────────────────

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    #[serde(default)]
    #[validate(range(min = 0.0, max = 100.0, message = "Score must be between 0 and 100"))]
    pub score: Option<f64>,

    #[serde(default)]
    pub matching_skills: Option<Vec<String>>,

    #[serde(default)]
    pub missing_skills: Option<Vec<String>>,

    #[serde(default)]
    pub source: Option<ApplicationSource>,
}

impl ApplyRequest {
    pub fn prepare_for_insert(self, job_id: Uuid, candidate_id: Uuid) -> ApplicationInsert {
        ApplicationInsert {
            job_id,
            candidate_id,
            score: Some(self.score.unwrap_or(0.0)),
            matching_skills: self.matching_skills.unwrap_or_default(),
            missing_skills: self.missing_skills.unwrap_or_default(),
            status: ApplicationStatus::Pending,
            source: self.source.unwrap_or_default(),
            applied_at: Utc::now(),
        }
    }
}

// ───── API Response Models ──────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplySubmittedResponse {
    pub success: bool,
    pub message: String,
    pub application: Application,
}

/// A candidate's application with the referenced job embedded.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateApplication {
    #[serde(flatten)]
    pub application: Application,
    pub job: Option<JobView>,
}

/// An application as seen by the recruiter owning the job.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Applicant {
    #[serde(flatten)]
    pub application: Application,
    pub candidate: Option<CandidateSummary>,
}
