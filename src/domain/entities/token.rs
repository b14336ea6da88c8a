use serde::{Serialize, Deserialize};
use uuid::Uuid;

use crate::entities::user::{Role, User};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub company_name: Option<String>,
    pub token: String,
    pub token_type: String,
}

impl AuthResponse {
    pub fn new(user: &User, token: String) -> Self {
        AuthResponse {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            token,
            token_type: "Bearer".to_string(),
        }
    }
}

/// Self-describing session: every protected request is authorized from
/// these claims alone.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

impl Claims {
    pub fn user_id(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.sub).ok()
    }
}
