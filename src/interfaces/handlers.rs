pub mod auth;
pub mod candidate;
pub mod home;
pub mod json_error;
pub mod profile;
pub mod recruiter;
pub mod system;

use uuid::Uuid;

use crate::errors::AppError;

/// Ids arrive as path text; anything that is not a UUID cannot exist.
pub fn parse_path_id(raw: &str, not_found: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::NotFound(not_found.to_string()))
}
