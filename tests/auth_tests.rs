mod test_utils;
mod test_user;

use job_match_backend::{
    auth::jwt::JwtService,
    entities::user::Role,
    repositories::user::UserRepository,
};
use reqwest::StatusCode;
use serde_json::Value;
use test_user::*;
use test_utils::*;

#[actix_rt::test]
async fn register_returns_201_with_token_for_requested_role() {
    let app = TestApp::spawn().await;
    let email = unique_email("recruiter");

    let auth = app.register_ok(&recruiter(&email, "Acme")).await;

    assert_eq!(auth.email, email);
    assert_eq!(auth.role, Role::Recruiter);
    assert_eq!(auth.company_name.as_deref(), Some("Acme"));
    assert_eq!(auth.token_type, "Bearer");

    let claims = JwtService::new(&app.config).decode_jwt(&auth.token).unwrap().claims;
    assert_eq!(claims.role, Role::Recruiter);
    assert_eq!(claims.user_id(), Some(auth.id));
}

#[actix_rt::test]
async fn token_is_valid_for_thirty_days() {
    let app = TestApp::spawn().await;

    let auth = app.register_ok(&candidate(&unique_email("candidate"))).await;

    let claims = JwtService::new(&app.config).decode_jwt(&auth.token).unwrap().claims;
    let lifetime = claims.exp - claims.iat;
    assert_eq!(lifetime, 30 * 24 * 60 * 60);
}

#[actix_rt::test]
async fn register_never_exposes_password_hash() {
    let app = TestApp::spawn().await;

    let response = app.register_user(&candidate(&unique_email("candidate"))).await;
    let body: Value = response.json().await.unwrap();

    assert!(body.get("password").is_none());
    assert!(body.get("passwordHash").is_none());
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn candidates_do_not_keep_a_company_name() {
    let app = TestApp::spawn().await;
    let mut user = candidate(&unique_email("candidate"));
    user.company_name = Some("Should Vanish".to_string());

    let auth = app.register_ok(&user).await;

    assert_eq!(auth.company_name, None);
}

#[actix_rt::test]
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;
    let email = unique_email("dup");
    app.register_ok(&candidate(&email)).await;

    let response = app.register_user(&recruiter(&email.to_uppercase(), "Acme")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "User already exists");
}

#[actix_rt::test]
async fn recruiter_without_company_fails_validation() {
    let app = TestApp::spawn().await;
    let mut user = recruiter(&unique_email("recruiter"), "");
    user.company_name = None;

    let response = app.register_user(&user).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Validation failed");
    let details = body["details"].as_array().unwrap();
    assert!(details.iter().any(|d| d["message"] == "Company name is required for recruiters"));
}

#[actix_rt::test]
async fn register_with_missing_fields_fails_validation() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/auth/register"))
        .json(&serde_json::json!({ "email": "someone@example.com" }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|d| d["field"].as_str())
        .collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"password"));
    assert!(fields.contains(&"role"));
}

#[actix_rt::test]
async fn login_returns_token_for_matching_role() {
    let app = TestApp::spawn().await;
    let email = unique_email("candidate");
    let registered = app.register_ok(&candidate(&email)).await;

    let response = app.login(&login_as(&email, Role::Candidate)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["id"], registered.id.to_string());
    assert_eq!(body["role"], "candidate");
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
}

#[actix_rt::test]
async fn login_with_other_role_is_refused() {
    let app = TestApp::spawn().await;
    let email = unique_email("candidate");
    app.register_ok(&candidate(&email)).await;

    let response = app.login(&login_as(&email, Role::Recruiter)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "No account found for this role");
}

#[actix_rt::test]
async fn login_with_wrong_password_is_refused() {
    let app = TestApp::spawn().await;
    let email = unique_email("candidate");
    app.register_ok(&candidate(&email)).await;
    let mut credentials = login_as(&email, Role::Candidate);
    credentials.password = "not-the-password".to_string();

    let response = app.login(&credentials).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[actix_rt::test]
async fn login_with_unknown_email_is_refused() {
    let app = TestApp::spawn().await;

    let response = app.login(&login_as("nobody@example.com", Role::Candidate)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid credentials");
}

#[actix_rt::test]
async fn login_without_role_is_a_missing_field() {
    let app = TestApp::spawn().await;
    let email = unique_email("candidate");
    app.register_ok(&candidate(&email)).await;

    let response = app.client
        .post(app.url("/api/auth/login"))
        .json(&serde_json::json!({ "email": email, "password": PASSWORD }))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Please enter all fields including role");
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app.client
        .post(app.url("/api/auth/login"))
        .header("Content-Type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn protected_routes_require_a_bearer_token() {
    let app = TestApp::spawn().await;

    let response = app.client
        .get(app.url("/api/candidate/jobs"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn invalid_tokens_are_rejected() {
    let app = TestApp::spawn().await;

    let response = app.client
        .get(app.url("/api/recruiter/jobs"))
        .bearer_auth("definitely.not.a-token")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn expired_tokens_are_rejected() {
    let app = TestApp::spawn().await;
    let auth = app.register_ok(&candidate(&unique_email("candidate"))).await;
    let user = app.store.get_user_by_id(&auth.id).await.unwrap().unwrap();
    let expired = JwtService::new(&app.config)
        .create_jwt_with_expiration(&user, chrono::Duration::seconds(-120))
        .unwrap();

    let response = app.client
        .get(app.url("/api/candidate/jobs"))
        .bearer_auth(expired)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn role_scoped_routes_reject_the_other_role() {
    let app = TestApp::spawn().await;
    let candidate_auth = app.register_ok(&candidate(&unique_email("candidate"))).await;
    let recruiter_auth = app.register_ok(&recruiter(&unique_email("recruiter"), "Acme")).await;

    let as_candidate = app.client
        .get(app.url("/api/recruiter/jobs"))
        .bearer_auth(&candidate_auth.token)
        .send()
        .await
        .unwrap();
    let as_recruiter = app.client
        .get(app.url("/api/candidate/applications"))
        .bearer_auth(&recruiter_auth.token)
        .send()
        .await
        .unwrap();

    assert_eq!(as_candidate.status(), StatusCode::FORBIDDEN);
    assert_eq!(as_recruiter.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn profiles_are_public_and_role_checked() {
    let app = TestApp::spawn().await;
    let recruiter_auth = app.register_ok(&recruiter(&unique_email("recruiter"), "Acme")).await;

    let found = app.client
        .get(app.url(&format!("/api/profile/recruiter/{}", recruiter_auth.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(found.status(), StatusCode::OK);
    let body: Value = found.json().await.unwrap();
    assert_eq!(body["companyName"], "Acme");
    assert!(body.get("passwordHash").is_none());

    let wrong_role = app.client
        .get(app.url(&format!("/api/profile/candidate/{}", recruiter_auth.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(wrong_role.status(), StatusCode::BAD_REQUEST);
    let body: Value = wrong_role.json().await.unwrap();
    assert_eq!(body["error"], "User is not a candidate");

    let missing = app.client
        .get(app.url(&format!("/api/profile/recruiter/{}", uuid::Uuid::new_v4())))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let malformed = app.client
        .get(app.url("/api/profile/recruiter/not-a-uuid"))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn health_and_banner_are_public() {
    let app = TestApp::spawn().await;

    let banner = app.client.get(app.url("/")).send().await.unwrap();
    assert_eq!(banner.status(), StatusCode::OK);

    let health = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), StatusCode::OK);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body["database"], "OK");
    assert_eq!(body["storage"], "memory");
}
