use actix_web::{get, web, HttpResponse, Responder};

use crate::{entities::user::Role, handlers::parse_path_id, AppState};

#[get("/recruiter/{id}")]
pub async fn recruiter_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    profile(&state, &path, Role::Recruiter).await
}

#[get("/candidate/{id}")]
pub async fn candidate_profile(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    profile(&state, &path, Role::Candidate).await
}

async fn profile(state: &AppState, raw_id: &str, role: Role) -> HttpResponse {
    let user_id = match parse_path_id(raw_id, "User not found") {
        Ok(id) => id,
        Err(e) => return e.to_http_response(),
    };

    match state.profile_handler.get_profile(&user_id, role).await {
        Ok(user) => HttpResponse::Ok().json(user),
        Err(e) => e.to_http_response(),
    }
}
