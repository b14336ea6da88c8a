mod domain;
mod interfaces;
mod infrastructure;
pub mod errors;
pub mod settings;
pub mod constants;
pub mod graceful_shutdown;
pub mod telemetry;

pub use domain::{entities, use_cases, validation};
pub use interfaces::{handlers, repositories, middlewares, routes};
pub use infrastructure::{auth, db, gateway, upload};

use auth::jwt::JwtService;
use gateway::ml_client::MlServiceClient;
use repositories::SharedStore;
use settings::AppConfig;
use upload::resume::UploadReceiver;
use use_cases::{
    auth::AuthHandler,
    candidate::CandidateHandler,
    profile::ProfileHandler,
    recruiter::RecruiterHandler,
};

pub struct AppState {
    pub store: SharedStore,
    pub auth_handler: AppAuthHandler,
    pub profile_handler: AppProfileHandler,
    pub candidate_handler: AppCandidateHandler,
    pub recruiter_handler: AppRecruiterHandler,
    pub upload_receiver: UploadReceiver,
    pub config: AppConfig,
}

pub type AppAuthHandler = AuthHandler<SharedStore, JwtService>;
pub type AppProfileHandler = ProfileHandler<SharedStore>;
pub type AppCandidateHandler = CandidateHandler<SharedStore, MlServiceClient>;
pub type AppRecruiterHandler = RecruiterHandler<SharedStore>;

impl AppState {
    pub fn new(config: &AppConfig, store: SharedStore) -> Self {
        let jwt_service = JwtService::new(config);
        let gateway = MlServiceClient::from_config(config);

        AppState {
            auth_handler: AuthHandler::new(store.clone(), jwt_service),
            profile_handler: ProfileHandler::new(store.clone()),
            candidate_handler: CandidateHandler::new(store.clone(), gateway),
            recruiter_handler: RecruiterHandler::new(store.clone()),
            upload_receiver: UploadReceiver::from_config(config),
            config: config.clone(),
            store,
        }
    }
}
