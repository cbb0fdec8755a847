pub mod academics;

pub mod assessments;

pub mod auth;

pub mod enrollments;

pub mod submissions;

pub mod tenants;

pub mod users;

#[cfg(test)]
mod tests;

pub use academics::configure_academic_routes;
pub use assessments::configure_assessment_routes;
pub use auth::configure_auth_routes;
pub use enrollments::configure_enrollment_routes;
pub use submissions::configure_submission_routes;
pub use tenants::configure_tenant_routes;
pub use users::configure_user_routes;

use actix_web::web;

/// 注册全部业务路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_tenant_routes)
        .configure(configure_user_routes)
        .configure(configure_academic_routes)
        .configure(configure_enrollment_routes)
        .configure(configure_assessment_routes)
        .configure(configure_submission_routes);
}
