use actix_web::web;

use crate::handlers::candidate;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/candidate")
            .service(candidate::match_jobs)
            .service(candidate::list_jobs)
            .service(candidate::check_score)
            .service(candidate::apply)
            .service(candidate::list_applications)
    );
}
