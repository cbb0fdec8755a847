use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::enrollments::requests::{
    CloseEnrollmentRequest, CreateEnrollmentRequest, EnrollmentListParams,
};
use crate::models::users::entities::UserType;
use crate::services::EnrollmentService;
use crate::utils::SafeIDI64;

static ENROLLMENT_SERVICE: Lazy<EnrollmentService> = Lazy::new(EnrollmentService::new_lazy);

pub async fn list_enrollments(
    req: HttpRequest,
    query: web::Query<EnrollmentListParams>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .list_enrollments(&req, query.into_inner())
        .await
}

pub async fn create_enrollment(
    req: HttpRequest,
    data: web::Json<CreateEnrollmentRequest>,
) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE
        .create_enrollment(&req, data.into_inner())
        .await
}

pub async fn get_enrollment(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ENROLLMENT_SERVICE.get_enrollment(&req, id.0).await
}

// 请求体可省略，日期默认当天
pub async fn drop_enrollment(
    req: HttpRequest,
    id: SafeIDI64,
    data: Option<web::Json<CloseEnrollmentRequest>>,
) -> ActixResult<HttpResponse> {
    let data = data.map(web::Json::into_inner).unwrap_or_default();
    ENROLLMENT_SERVICE.drop_enrollment(&req, id.0, data).await
}

pub async fn complete_enrollment(
    req: HttpRequest,
    id: SafeIDI64,
    data: Option<web::Json<CloseEnrollmentRequest>>,
) -> ActixResult<HttpResponse> {
    let data = data.map(web::Json::into_inner).unwrap_or_default();
    ENROLLMENT_SERVICE
        .complete_enrollment(&req, id.0, data)
        .await
}

// 配置路由
pub fn configure_enrollment_routes(cfg: &mut web::ServiceConfig) {
    let admin_only = || middlewares::RequireRole::new_any(UserType::admin_roles());

    cfg.service(
        web::scope("/api/v1/enrollments")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_enrollments))
                    .route(web::post().to(create_enrollment).wrap(admin_only())),
            )
            .service(web::resource("/{id}").route(web::get().to(get_enrollment)))
            .service(
                web::resource("/{id}/drop")
                    .wrap(admin_only())
                    .route(web::post().to(drop_enrollment)),
            )
            .service(
                web::resource("/{id}/complete")
                    .wrap(admin_only())
                    .route(web::post().to(complete_enrollment)),
            ),
    );
}
