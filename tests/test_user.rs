#![allow(dead_code)]

use job_match_backend::entities::user::{LoginUser, NewUser, Role};
use uuid::Uuid;

pub const PASSWORD: &str = "ValidPass123!";

pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.com", prefix, Uuid::new_v4())
}

pub fn candidate(email: &str) -> NewUser {
    NewUser {
        name: "Casey Candidate".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role: Some(Role::Candidate),
        company_name: None,
        skills: vec!["Rust".to_string(), "SQL".to_string()],
    }
}

pub fn recruiter(email: &str, company: &str) -> NewUser {
    NewUser {
        name: "Riley Recruiter".to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role: Some(Role::Recruiter),
        company_name: Some(company.to_string()),
        skills: Vec::new(),
    }
}

pub fn login_as(email: &str, role: Role) -> LoginUser {
    LoginUser {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        role: Some(role),
    }
}

pub fn backend_job() -> serde_json::Value {
    serde_json::json!({
        "title": "Backend Engineer",
        "description": "Build and run the matching API",
        "requiredSkills": ["Rust", "PostgreSQL"],
        "minExperience": 2,
        "maxExperience": 5,
        "education": "BSc Computer Science",
        "jobType": "Full-time",
        "location": "Lagos"
    })
}

pub fn minimal_job(title: &str) -> serde_json::Value {
    serde_json::json!({
        "title": title,
        "description": "Short description"
    })
}

pub fn pdf_bytes() -> Vec<u8> {
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n".to_vec()
}

pub fn text_resume() -> Vec<u8> {
    b"Casey Candidate\nSkills: Rust, SQL, Actix\nExperience: 3 years\n".to_vec()
}
