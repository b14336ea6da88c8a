use actix_web::{http::StatusCode, HttpResponse};

pub fn json_error(status: StatusCode, error: &str, details: &str) -> HttpResponse {
    HttpResponse::build(status).json(serde_json::json!({
        "error": error,
        "details": details
    }))
}

/// Fallback for routes that do not exist.
pub async fn not_found() -> HttpResponse {
    json_error(StatusCode::NOT_FOUND, "Not found", "No route matches this path")
}
