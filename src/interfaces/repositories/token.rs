use jsonwebtoken::TokenData;
use crate::{entities::{token::Claims, user::User}, errors::AuthError};

pub trait TokenServiceRepository: Send + Sync {
    /// Issues a signed token embedding the user's id and role
    fn create_jwt(&self, user: &User) -> Result<String, AuthError>;

    /// Verifies signature and expiry, then returns the claims
    fn decode_jwt(&self, token: &str) -> Result<TokenData<Claims>, AuthError>;
}
