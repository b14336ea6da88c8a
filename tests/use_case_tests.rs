use std::path::Path;

use actix_web::{http::StatusCode, ResponseError};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::TokenData;
use mockall::mock;
use uuid::Uuid;

use job_match_backend::{
    db::memory::MemoryRepo,
    entities::{
        application::{ApplicationStatus, ApplyRequest, StatusAction},
        job::{resolve_company_name, Job, JobType, NewJob, DEFAULT_COMPANY_NAME},
        matching::{GatewayJob, GatewayMatch, GatewayResponse},
        token::Claims,
        user::{LoginUser, Role, User, UserInsert},
    },
    errors::{AppError, AuthError},
    repositories::{
        job::JobRepository, match_gateway::MatchGateway, token::TokenServiceRepository,
        user::UserRepository,
    },
    upload::resume::{IncomingResume, StoredResume, UploadReceiver},
    use_cases::{auth::AuthHandler, candidate::CandidateHandler, recruiter::RecruiterHandler},
};

mock! {
    pub Gateway {}

    #[async_trait]
    impl MatchGateway for Gateway {
        async fn score(&self, resume: &Path, jobs: &[GatewayJob]) -> Result<GatewayResponse, AppError>;
    }
}

mock! {
    pub Users {}

    #[async_trait]
    impl UserRepository for Users {
        async fn check_connection(&self) -> Result<(), AppError>;
        async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
        async fn get_user_by_id(&self, id: &Uuid) -> Result<Option<User>, AppError>;
        async fn get_users_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, AppError>;
        async fn create_user(&self, user: &UserInsert) -> Result<User, AppError>;
    }
}

mock! {
    pub Tokens {}

    impl TokenServiceRepository for Tokens {
        fn create_jwt(&self, user: &User) -> Result<String, AuthError>;
        fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
    }
}

const MAX_BYTES: usize = 1024;

fn user_insert(role: Role, company: Option<&str>) -> UserInsert {
    UserInsert {
        name: "Test User".to_string(),
        email: format!("{}@example.com", Uuid::new_v4()),
        password_hash: "unused".to_string(),
        role,
        company_name: company.map(str::to_string),
        skills: Vec::new(),
        created_at: Utc::now(),
    }
}

async fn seed_job(store: &MemoryRepo, company: Option<&str>, job_company: Option<&str>) -> (User, Job) {
    let recruiter = store.create_user(&user_insert(Role::Recruiter, company)).await.unwrap();
    let request = NewJob {
        title: "Data Engineer".to_string(),
        description: "Pipelines".to_string(),
        company_name: job_company.map(str::to_string),
        ..Default::default()
    };
    let job = store.create_job(&request.prepare_for_insert(recruiter.id)).await.unwrap();
    (recruiter, job)
}

async fn stored_resume(receiver: &UploadReceiver, source_dir: &Path) -> StoredResume {
    let source = source_dir.join("incoming.txt");
    std::fs::write(&source, b"Rust developer with five years of experience").unwrap();
    let size = std::fs::metadata(&source).unwrap().len() as usize;

    receiver
        .accept(IncomingResume {
            file_name: Some("resume.txt"),
            size,
            path: &source,
        })
        .await
        .unwrap()
}

fn success(matches: Vec<GatewayMatch>) -> GatewayResponse {
    GatewayResponse {
        status: "success".to_string(),
        matches: Some(matches),
        message: None,
    }
}

fn scored(job: &Job, score: f64) -> GatewayMatch {
    GatewayMatch {
        job_id: job.id.to_string(),
        score,
        matching_skills: vec!["SQL".to_string()],
        missing_skills: Vec::new(),
    }
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

#[actix_rt::test]
async fn match_with_no_jobs_never_calls_gateway_and_removes_resume() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);

    let mut gateway = MockGateway::new();
    gateway.expect_score().never();
    let handler = CandidateHandler::new(MemoryRepo::new(), gateway);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let result = handler.match_jobs(resume).await;

    assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "No jobs available"));
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn gateway_failure_is_upstream_and_removes_resume() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);
    let store = MemoryRepo::new();
    seed_job(&store, Some("Acme"), None).await;

    let mut gateway = MockGateway::new();
    gateway
        .expect_score()
        .times(1)
        .returning(|_, _| Err(AppError::Upstream("connection refused".to_string())));
    let handler = CandidateHandler::new(store, gateway);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let result = handler.match_jobs(resume).await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn non_success_status_is_upstream() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);
    let store = MemoryRepo::new();
    seed_job(&store, Some("Acme"), None).await;

    let mut gateway = MockGateway::new();
    gateway.expect_score().times(1).returning(|_, _| {
        Ok(GatewayResponse {
            status: "error".to_string(),
            matches: None,
            message: Some("model offline".to_string()),
        })
    });
    let handler = CandidateHandler::new(store, gateway);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let result = handler.match_jobs(resume).await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn gateway_receives_the_stored_resume_and_composite_jobs() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);
    let store = MemoryRepo::new();
    let (_, job) = seed_job(&store, Some("Acme"), None).await;
    let expected = job.composite_text();
    let expected_job = job.clone();

    let mut gateway = MockGateway::new();
    gateway
        .expect_score()
        .withf(move |resume, jobs| {
            resume.exists()
                && resume.to_string_lossy().ends_with("resume.txt")
                && jobs.len() == 1
                && jobs[0].description == expected
        })
        .times(1)
        .returning(move |_, _| Ok(success(vec![scored(&expected_job, 77.0)])));
    let handler = CandidateHandler::new(store, gateway);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let results = handler.match_jobs(resume).await.unwrap();

    assert_eq!(results.results.len(), 1);
    assert_eq!(results.results[0].score, 77.0);
    assert_eq!(results.results[0].company_name, "Acme");
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn check_score_with_empty_matches_is_upstream() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);
    let store = MemoryRepo::new();
    let (_, job) = seed_job(&store, None, Some("Initech")).await;

    let mut gateway = MockGateway::new();
    gateway.expect_score().times(1).returning(|_, _| Ok(success(Vec::new())));
    let handler = CandidateHandler::new(store, gateway);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let result = handler.check_score(&job.id, resume).await;

    assert!(matches!(result, Err(AppError::Upstream(_))));
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn oversized_resume_is_rejected_before_storage() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);
    let store = MemoryRepo::new();
    seed_job(&store, Some("Acme"), None).await;

    let mut gateway = MockGateway::new();
    gateway.expect_score().never();
    let handler = CandidateHandler::new(store, gateway);

    let source = incoming.path().join("big.pdf");
    std::fs::write(&source, vec![0u8; MAX_BYTES + 1]).unwrap();

    let result = receiver
        .accept(IncomingResume {
            file_name: Some("big.pdf"),
            size: MAX_BYTES + 1,
            path: &source,
        })
        .await;

    let result = match result {
        Ok(resume) => handler.match_jobs(resume).await.map(|_| ()),
        Err(e) => Err(e),
    };

    match result {
        Err(AppError::ValidationError(errors)) => {
            assert_eq!(errors[0].field, "resume");
            assert!(errors[0].message.starts_with("File too large"));
        }
        other => panic!("expected a validation error, got {:?}", other),
    }
    assert!(is_empty_dir(uploads.path()));
}

#[actix_rt::test]
async fn dropped_resume_is_removed_from_disk() {
    let uploads = tempfile::tempdir().unwrap();
    let incoming = tempfile::tempdir().unwrap();
    let receiver = UploadReceiver::new(uploads.path(), MAX_BYTES);

    let resume = stored_resume(&receiver, incoming.path()).await;
    let path = resume.path().to_path_buf();
    assert!(path.exists());

    drop(resume);
    assert!(!path.exists());
}

#[actix_rt::test]
async fn deciding_twice_the_same_way_is_a_no_op() {
    let store = MemoryRepo::new();
    let (recruiter, job) = seed_job(&store, Some("Acme"), None).await;
    let candidate = store.create_user(&user_insert(Role::Candidate, None)).await.unwrap();
    let gateway = MockGateway::new();
    let candidates = CandidateHandler::new(store.clone(), gateway);
    let recruiters = RecruiterHandler::new(store.clone());

    let applied = candidates.apply(&job.id, &candidate.id, ApplyRequest::default()).await.unwrap();
    let id = applied.application.id;

    let first = recruiters.update_status(&recruiter.id, &id, StatusAction::Accept).await.unwrap();
    let second = recruiters.update_status(&recruiter.id, &id, StatusAction::Accept).await.unwrap();
    let flipped = recruiters.update_status(&recruiter.id, &id, StatusAction::Reject).await;

    assert_eq!(first.status, ApplicationStatus::Accepted);
    assert_eq!(second.status, ApplicationStatus::Accepted);
    assert!(matches!(flipped, Err(AppError::Conflict(_))));
}

#[actix_rt::test]
async fn delete_by_stranger_leaves_applications_in_place() {
    let store = MemoryRepo::new();
    let (_, job) = seed_job(&store, Some("Acme"), None).await;
    let stranger = store.create_user(&user_insert(Role::Recruiter, Some("Globex"))).await.unwrap();
    let candidate = store.create_user(&user_insert(Role::Candidate, None)).await.unwrap();
    let candidates = CandidateHandler::new(store.clone(), MockGateway::new());
    let recruiters = RecruiterHandler::new(store.clone());
    candidates.apply(&job.id, &candidate.id, ApplyRequest::default()).await.unwrap();

    let result = recruiters.delete_job(&stranger.id, &job.id).await;

    assert!(matches!(result, Err(AppError::Forbidden(_))));
    assert!(store.get_job_by_id(&job.id).await.unwrap().is_some());
}

fn job_from(request: NewJob) -> Job {
    let insert = request.prepare_for_insert(Uuid::new_v4());
    Job {
        id: Uuid::new_v4(),
        recruiter_id: insert.recruiter_id,
        title: insert.title,
        description: insert.description,
        required_skills: insert.required_skills,
        min_experience: insert.min_experience,
        max_experience: insert.max_experience,
        education: insert.education,
        job_type: insert.job_type,
        location: insert.location,
        company_name: insert.company_name,
        created_at: insert.created_at,
    }
}

#[test]
fn composite_text_uses_any_for_open_ended_experience() {
    let job = job_from(NewJob {
        title: "Intern".to_string(),
        description: "Learn things".to_string(),
        required_skills: Some(vec!["Git".to_string(), "Linux".to_string()]),
        job_type: Some(JobType::Internship),
        ..Default::default()
    });

    assert_eq!(
        job.composite_text(),
        "Job Title: Intern\n\
         Description: Learn things\n\
         Required Skills: Git, Linux\n\
         Experience: 0 - Any years\n\
         Education: Any Degree\n\
         Job Type: Internship\n\
         Location: Remote"
    );
}

#[test]
fn composite_text_treats_zero_ceiling_as_open_ended() {
    let open = job_from(NewJob {
        title: "Support".to_string(),
        description: "Help desk".to_string(),
        max_experience: Some(0),
        ..Default::default()
    });
    let bounded = job_from(NewJob {
        title: "Support".to_string(),
        description: "Help desk".to_string(),
        min_experience: Some(1),
        max_experience: Some(3),
        ..Default::default()
    });

    assert!(open.composite_text().contains("\nExperience: 0 - Any years\n"));
    assert!(bounded.composite_text().contains("\nExperience: 1 - 3 years\n"));
}

fn login_request() -> LoginUser {
    LoginUser {
        email: "someone@example.com".to_string(),
        password: "Secret123!".to_string(),
        role: Some(Role::Candidate),
    }
}

#[actix_rt::test]
async fn login_surfaces_store_failure_as_internal_error() {
    let mut users = MockUsers::new();
    users
        .expect_get_user_by_email()
        .times(1)
        .returning(|_| Err(AppError::InternalError("Database error: connection refused".to_string())));
    let mut tokens = MockTokens::new();
    tokens.expect_create_jwt().never();
    let handler = AuthHandler::new(users, tokens);

    let error = handler.login(login_request()).await.unwrap_err();

    assert!(matches!(error, AuthError::Internal(_)), "got {:?}", error);
    assert_eq!(error.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(matches!(AppError::from(error), AppError::InternalError(_)));
}

#[actix_rt::test]
async fn login_with_unknown_email_is_wrong_credentials() {
    let mut users = MockUsers::new();
    users.expect_get_user_by_email().times(1).returning(|_| Ok(None));
    let mut tokens = MockTokens::new();
    tokens.expect_create_jwt().never();
    let handler = AuthHandler::new(users, tokens);

    let error = handler.login(login_request()).await.unwrap_err();

    assert!(matches!(error, AuthError::WrongCredentials), "got {:?}", error);
    assert_eq!(error.status_code(), StatusCode::BAD_REQUEST);
}

#[test]
fn company_name_falls_back_from_job_to_recruiter_to_placeholder() {
    assert_eq!(resolve_company_name("Initech", Some("Acme")), "Initech");
    assert_eq!(resolve_company_name(DEFAULT_COMPANY_NAME, Some("Acme")), "Acme");
    assert_eq!(resolve_company_name("", Some("Acme")), "Acme");
    assert_eq!(resolve_company_name(DEFAULT_COMPANY_NAME, Some("  ")), DEFAULT_COMPANY_NAME);
    assert_eq!(resolve_company_name(DEFAULT_COMPANY_NAME, None), DEFAULT_COMPANY_NAME);
}
