use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};

use crate::{
    entities::{application::StatusAction, job::NewJob},
    handlers::parse_path_id,
    use_cases::extractors::RecruiterClaims,
    AppState,
};

#[get("/jobs")]
pub async fn list_own_jobs(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
) -> impl Responder {
    match state.recruiter_handler.list_own_jobs(claims.user_id()).await {
        Ok(jobs) => HttpResponse::Ok().json(jobs),
        Err(e) => e.to_http_response(),
    }
}

#[post("/jobs")]
pub async fn post_job(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
    job: web::Json<NewJob>,
) -> impl Responder {
    match state.recruiter_handler.post_job(claims.user_id(), job.into_inner()).await {
        Ok(created) => HttpResponse::Created().json(created),
        Err(e) => e.to_http_response(),
    }
}

#[delete("/jobs/{job_id}")]
pub async fn delete_job(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let job_id = match parse_path_id(&path, "Job not found") {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.recruiter_handler.delete_job(claims.user_id(), &job_id).await {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.to_http_response(),
    }
}

#[get("/applications/{job_id}")]
pub async fn list_applicants(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let job_id = match parse_path_id(&path, "Job not found") {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.recruiter_handler.list_applicants(claims.user_id(), &job_id).await {
        Ok(applicants) => HttpResponse::Ok().json(applicants),
        Err(e) => e.to_http_response(),
    }
}

#[patch("/applications/{application_id}/accept")]
pub async fn accept_application(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    decide(&claims, &state, &path, StatusAction::Accept).await
}

#[patch("/applications/{application_id}/reject")]
pub async fn reject_application(
    claims: RecruiterClaims,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    decide(&claims, &state, &path, StatusAction::Reject).await
}

async fn decide(claims: &RecruiterClaims, state: &AppState, raw_id: &str, action: StatusAction) -> HttpResponse {
    let application_id = match parse_path_id(raw_id, "Application not found") {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.recruiter_handler.update_status(claims.user_id(), &application_id, action).await {
        Ok(application) => HttpResponse::Ok().json(application),
        Err(e) => e.to_http_response(),
    }
}
