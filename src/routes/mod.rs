// Route exports
pub mod compare;
pub mod quiz;

use actix_web::web;

pub use compare::AppState;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(compare::configure)
            .configure(quiz::configure),
    );
}
