pub mod memory;
pub mod postgres;

use std::sync::Arc;

use crate::{
    errors::AppError,
    repositories::{sqlx_repo::SqlxRepo, SharedStore},
    settings::AppConfig,
};

/// Opens the store named by `database_url`: the in-process store for
/// `memory://`, PostgreSQL (with migrations applied) otherwise.
pub async fn connect(config: &AppConfig) -> Result<SharedStore, AppError> {
    if config.uses_memory_store() {
        tracing::warn!("Using in-memory store; data is lost on restart");
        return Ok(Arc::new(memory::MemoryRepo::new()));
    }

    let pool = postgres::create_pool(&config.database_url).await?;
    postgres::run_migrations(&pool).await?;
    Ok(Arc::new(SqlxRepo::new(pool)))
}
