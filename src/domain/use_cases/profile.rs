use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::user::{PublicUser, Role},
    errors::AppError,
    repositories::user::UserRepository,
};

pub struct ProfileHandler<R>
where
    R: UserRepository,
{
    pub user_repo: R,
}

impl<R> ProfileHandler<R>
where
    R: UserRepository,
{
    pub fn new(user_repo: R) -> Self {
        ProfileHandler { user_repo }
    }

    /// Public profile of a user holding `role`.
    #[instrument(skip(self))]
    pub async fn get_profile(&self, user_id: &Uuid, role: Role) -> Result<PublicUser, AppError> {
        let user = self.user_repo
            .get_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.role != role {
            return Err(AppError::InvalidInput(format!("User is not a {}", role)));
        }

        Ok(PublicUser::from(user))
    }
}
