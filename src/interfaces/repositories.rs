pub mod application;
pub mod job;
pub mod match_gateway;
pub mod sqlx_repo;
pub mod token;
pub mod user;

use std::sync::Arc;

use application::ApplicationRepository;
use job::JobRepository;
use user::UserRepository;

/// Every repository the job board needs, behind one object so the backend
/// (PostgreSQL or in-memory) can be picked at startup.
pub trait JobBoardStore: UserRepository + JobRepository + ApplicationRepository {}

impl<T> JobBoardStore for T where T: UserRepository + JobRepository + ApplicationRepository {}

pub type SharedStore = Arc<dyn JobBoardStore>;
