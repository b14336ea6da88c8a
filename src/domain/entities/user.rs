use std::{fmt, str::FromStr};

use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use validator::{Validate, ValidationError};
use uuid::Uuid;

use crate::domain::validation::not_blank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Candidate,
    Recruiter,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Candidate => "candidate",
            Role::Recruiter => "recruiter",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "candidate" => Ok(Role::Candidate),
            "recruiter" => Ok(Role::Recruiter),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct UserInsert {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_company_for_role", skip_on_field_errors = false))]
pub struct NewUser {
    #[serde(default)]
    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(required(message = "Role is required"))]
    pub role: Option<Role>,

    #[serde(default)]
    pub company_name: Option<String>,

    #[serde(default)]
    pub skills: Vec<String>,
}

fn validate_company_for_role(user: &NewUser) -> Result<(), ValidationError> {
    let has_company = user
        .company_name
        .as_deref()
        .is_some_and(|name| !name.trim().is_empty());

    if user.role == Some(Role::Recruiter) && !has_company {
        let mut error = ValidationError::new("company_name");
        error.message = Some("Company name is required for recruiters".into());
        return Err(error);
    }
    Ok(())
}

impl NewUser {
    /// Company names are only kept for recruiters.
    pub fn prepare_for_insert(&self, password_hash: String) -> UserInsert {
        let role = self.role.unwrap_or(Role::Candidate);
        let company_name = match role {
            Role::Recruiter => self.company_name.as_ref().map(|c| c.trim().to_string()),
            Role::Candidate => None,
        };

        UserInsert {
            name: self.name.trim().to_string(),
            email: normalize_email(&self.email),
            password_hash,
            role,
            company_name,
            skills: self.skills.clone(),
            created_at: Utc::now(),
        }
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[derive(Debug, Default, Serialize, Deserialize, Validate)]
pub struct LoginUser {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,

    #[validate(required(message = "Role is required"))]
    pub role: Option<Role>,
}

/// User record as exposed to other users; never carries the password hash.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub skills: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            company_name: user.company_name,
            skills: user.skills,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
}

impl From<&User> for CandidateSummary {
    fn from(user: &User) -> Self {
        CandidateSummary {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            skills: user.skills.clone(),
        }
    }
}
