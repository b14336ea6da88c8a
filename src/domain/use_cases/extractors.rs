use actix_web::{FromRequest, HttpRequest, HttpMessage};
use futures_util::future::{ready, Ready};
use uuid::Uuid;

use crate::{
    entities::{token::Claims, user::Role},
    errors::AuthError,
};

/// Claims inserted by the auth middleware, wrapped by the role extractors
/// below. A request without them yields 401.
#[derive(Debug)]
pub struct AuthClaims {
    pub user_id: Uuid,
    pub claims: Claims,
}

/// Caller authenticated as a candidate; 403 for any other role.
#[derive(Debug)]
pub struct CandidateClaims(pub AuthClaims);

impl CandidateClaims {
    pub fn user_id(&self) -> &Uuid {
        &self.0.user_id
    }
}

impl FromRequest for CandidateClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            claims_with_role(req, Role::Candidate)
                .map(CandidateClaims)
                .map_err(Into::into),
        )
    }
}

/// Caller authenticated as a recruiter; 403 for any other role.
#[derive(Debug)]
pub struct RecruiterClaims(pub AuthClaims);

impl RecruiterClaims {
    pub fn user_id(&self) -> &Uuid {
        &self.0.user_id
    }
}

impl FromRequest for RecruiterClaims {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        ready(
            claims_with_role(req, Role::Recruiter)
                .map(RecruiterClaims)
                .map_err(Into::into),
        )
    }
}

fn session_claims(req: &HttpRequest) -> Result<AuthClaims, AuthError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .cloned()
        .ok_or(AuthError::InvalidToken)?;
    let user_id = claims.user_id().ok_or(AuthError::InvalidUserId)?;

    Ok(AuthClaims { user_id, claims })
}

fn claims_with_role(req: &HttpRequest, role: Role) -> Result<AuthClaims, AuthError> {
    let session = session_claims(req)?;
    if session.claims.role != role {
        return Err(AuthError::Forbidden(format!("{} access required", role)));
    }
    Ok(session)
}
