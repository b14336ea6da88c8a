use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{get, post, web, HttpResponse, Responder};

use crate::{
    entities::application::ApplyRequest,
    errors::AppError,
    handlers::parse_path_id,
    upload::resume::{IncomingResume, StoredResume, UploadReceiver, RESUME_FIELD},
    use_cases::extractors::CandidateClaims,
    AppState,
};

/// Multipart body carrying the single resume file.
#[derive(Debug, MultipartForm)]
#[multipart(duplicate_field = "deny")]
pub struct ResumeForm {
    #[multipart(rename = "resume")]
    pub resume: Option<TempFile>,
}

async fn receive_resume(receiver: &UploadReceiver, form: ResumeForm) -> Result<StoredResume, AppError> {
    let file = form
        .resume
        .ok_or_else(|| AppError::field(RESUME_FIELD, "Resume file is required"))?;

    receiver
        .accept(IncomingResume {
            file_name: file.file_name.as_deref(),
            size: file.size,
            path: file.file.path(),
        })
        .await
}

#[post("/match")]
pub async fn match_jobs(
    _claims: CandidateClaims,
    state: web::Data<AppState>,
    MultipartForm(form): MultipartForm<ResumeForm>,
) -> impl Responder {
    let resume = match receive_resume(&state.upload_receiver, form).await {
        Ok(resume) => resume,
        Err(e) => return e.to_http_response(),
    };

    match state.candidate_handler.match_jobs(resume).await {
        Ok(results) => HttpResponse::Ok().json(results),
        Err(e) => e.to_http_response(),
    }
}

#[post("/check-score/{job_id}")]
pub async fn check_score(
    _claims: CandidateClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    MultipartForm(form): MultipartForm<ResumeForm>,
) -> impl Responder {
    let resume = match receive_resume(&state.upload_receiver, form).await {
        Ok(resume) => resume,
        Err(e) => return e.to_http_response(),
    };
    let job_id = match parse_path_id(&path, "Job not found") {
        Ok(id) => id,
        Err(e) => {
            resume.discard().await;
            return e.to_http_response();
        }
    };

    match state.candidate_handler.check_score(&job_id, resume).await {
        Ok(check) => HttpResponse::Ok().json(check),
        Err(e) => e.to_http_response(),
    }
}

#[get("/jobs")]
pub async fn list_jobs(
    _claims: CandidateClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.candidate_handler.list_jobs().await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => e.to_http_response(),
    }
}

#[post("/apply/{job_id}")]
pub async fn apply(
    claims: CandidateClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<ApplyRequest>,
) -> impl Responder {
    let job_id = match parse_path_id(&path, "Job not found") {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.candidate_handler.apply(&job_id, claims.user_id(), body.into_inner()).await {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("/applications")]
pub async fn list_applications(
    claims: CandidateClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.candidate_handler.list_applications(claims.user_id()).await {
        Ok(applications) => HttpResponse::Ok().json(applications),
        Err(e) => e.to_http_response(),
    }
}
