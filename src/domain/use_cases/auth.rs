use tracing::instrument;
use validator::Validate;

use crate::entities::token::AuthResponse;
use crate::entities::user::{normalize_email, LoginUser, NewUser, User};
use crate::errors::{AppError, AuthError};
use crate::auth::password::{hash_password, verify_password};
use crate::repositories::{token::TokenServiceRepository, user::UserRepository};

pub struct AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub user_repo: R,
    pub token_service: T,
}

impl<R, T> AuthHandler<R, T>
where
    R: UserRepository,
    T: TokenServiceRepository,
{
    pub fn new(user_repo: R, token_service: T) -> Self {
        AuthHandler {
            user_repo,
            token_service,
        }
    }

    /// Registers a user and signs them in straight away.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: NewUser) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = normalize_email(&request.email);
        if self.user_repo.get_user_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict("User already exists".to_string()));
        }

        let hashed_password = hash_password(&request.password)?;
        let user_insert = request.prepare_for_insert(hashed_password);

        // the unique index still decides concurrent registrations
        let user = self.user_repo.create_user(&user_insert).await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        Ok(self.create_auth_response(&user)?)
    }

    /// Role is part of the credentials: a matching password under another
    /// role is refused.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: LoginUser) -> Result<AuthResponse, AuthError> {
        request.validate()?;
        let role = request.role.ok_or(AuthError::MissingCredentials)?;

        // a failed lookup is a server fault, only a missing user is a bad credential
        let user = self.user_repo.get_user_by_email(&normalize_email(&request.email))
            .await?
            .ok_or(AuthError::WrongCredentials)?;

        let is_password_valid = verify_password(&request.password, &user.password_hash)?;
        if !is_password_valid {
            return Err(AuthError::WrongCredentials);
        }

        if user.role != role {
            tracing::warn!(user_id = %user.id, requested = %role, "Login with mismatched role");
            return Err(AuthError::RoleMismatch);
        }

        let response = self.create_auth_response(&user)?;

        tracing::info!(user_id = %user.id, "User logged in successfully");
        Ok(response)
    }

    pub fn create_auth_response(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.token_service.create_jwt(user)?;
        Ok(AuthResponse::new(user, token))
    }
}
