use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::Method,
    web, Error, HttpMessage, HttpResponse, ResponseError,
};
use futures_util::future::{ok, Ready, LocalBoxFuture};
use std::{rc::Rc, task::{Context, Poll}};

use crate::{
    entities::{token::Claims, user::Role},
    errors::AuthError,
    repositories::token::TokenServiceRepository,
    AppState,
};

/// Verifies the bearer token on every non-public request and stores the
/// decoded [`Claims`] in the request extensions.
pub struct AuthMiddleware;

impl<S> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(AuthMiddlewareService {
            service: Rc::new(service),
        })
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
}

impl<S> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            if is_public_route(req.path(), req.method()) {
                return service.call(req).await;
            }

            let claims = match get_valid_claims(&req) {
                Ok(claims) => claims,
                Err(e) => {
                    tracing::warn!(path = %req.path(), "Rejected request: {}", e);
                    return Ok(custom_error_response(req, unauthorized(&e)));
                }
            };

            if let Err(forbidden_response) = enforce_role_scope(req.path(), &claims) {
                return Ok(custom_error_response(req, forbidden_response));
            }

            req.extensions_mut().insert(claims);
            service.call(req).await
        })
    }
}

fn is_public_route(path: &str, method: &Method) -> bool {
    if method == Method::OPTIONS {
        return true;
    }

    if method == Method::GET {
        return matches!(path, "/" | "/health") || path.starts_with("/api/profile/");
    }

    method == Method::POST && matches!(path, "/api/auth/register" | "/api/auth/login")
}

fn extract_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| {
            let parts: Vec<&str> = header.split_whitespace().collect();
            if parts.len() == 2 && parts[0].eq_ignore_ascii_case("bearer") {
                Some(parts[1].to_string())
            } else {
                None
            }
        })
}

fn get_valid_claims(req: &ServiceRequest) -> Result<Claims, AuthError> {
    let state = req.app_data::<web::Data<AppState>>()
        .ok_or_else(|| {
            tracing::error!("AppState missing in middleware");
            AuthError::MissingJwtService
        })?;

    let token = extract_token(req).ok_or(AuthError::InvalidToken)?;
    let decoded = state.auth_handler.token_service.decode_jwt(&token)?;
    decoded.claims.user_id().ok_or(AuthError::InvalidUserId)?;
    Ok(decoded.claims)
}

fn unauthorized(error: &AuthError) -> HttpResponse {
    match error {
        AuthError::MissingJwtService => error.error_response(),
        AuthError::TokenExpired => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Token has expired"
        })),
        _ => HttpResponse::Unauthorized().json(serde_json::json!({
            "error": "Not authorized, token failed"
        })),
    }
}

fn enforce_role_scope(path: &str, claims: &Claims) -> Result<(), HttpResponse> {
    let required = if path.starts_with("/api/candidate") {
        Role::Candidate
    } else if path.starts_with("/api/recruiter") {
        Role::Recruiter
    } else {
        return Ok(());
    };

    if claims.role != required {
        tracing::warn!(path, role = %claims.role, "Role not allowed on path");
        return Err(
            HttpResponse::Forbidden().json(serde_json::json!({
                "error": format!("Access restricted to {}s", required)
            }))
        );
    }
    Ok(())
}

fn custom_error_response(req: ServiceRequest, res: HttpResponse) -> ServiceResponse<BoxBody> {
    req.into_response(res)
}
