use actix_web::web;

use crate::handlers::{home::home, json_error::not_found, system::health_check};
use crate::constants::API_PREFIX;
use crate::upload::resume::UploadReceiver;

mod auth;
mod candidate;
mod json_error;
mod profile;
mod recruiter;
mod upload;

/// Mounts every route. Payload extractors are configured here so tests and
/// the binary share the same limits.
pub fn configure_routes(cfg: &mut web::ServiceConfig, receiver: &UploadReceiver) {
    cfg.service(home);
    cfg.service(health_check);

    cfg.service(
        web::scope(API_PREFIX)
            .configure(auth::config_routes)
            .configure(profile::config_routes)
            .configure(candidate::config_routes)
            .configure(recruiter::config_routes)
    );

    cfg.configure(json_error::config_routes);
    cfg.configure(|cfg| upload::config_routes(cfg, receiver));
    cfg.default_service(web::to(not_found));
}
