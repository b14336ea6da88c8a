use actix_web::web;

use crate::handlers::recruiter;

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/recruiter")
            .service(recruiter::list_own_jobs)
            .service(recruiter::post_job)
            .service(recruiter::delete_job)
            .service(recruiter::list_applicants)
            .service(recruiter::accept_application)
            .service(recruiter::reject_application)
    );
}
