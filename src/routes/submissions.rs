use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::assessments::requests::{
    CreateSubmissionRequest, GradeSubmissionRequest, ReturnSubmissionRequest,
    SubmissionListParams, UpdateSubmissionContentRequest,
};
use crate::models::users::entities::UserType;
use crate::services::SubmissionService;
use crate::utils::SafeIDI64;

// 懒加载的全局 SubmissionService 实例
static SUBMISSION_SERVICE: Lazy<SubmissionService> = Lazy::new(SubmissionService::new_lazy);

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .list_submissions(&req, query.into_inner())
        .await
}

pub async fn create_submission(
    req: HttpRequest,
    data: web::Json<CreateSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .create_submission(&req, data.into_inner())
        .await
}

pub async fn get_submission(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.get_submission(&req, id.0).await
}

pub async fn update_content(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSubmissionContentRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE
        .update_content(&req, id.0, data.into_inner())
        .await
}

pub async fn submit(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.submit(&req, id.0).await
}

pub async fn grade(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    SUBMISSION_SERVICE.grade(&req, id.0, data.into_inner()).await
}

pub async fn return_to_student(
    req: HttpRequest,
    id: SafeIDI64,
    data: Option<web::Json<ReturnSubmissionRequest>>,
) -> ActixResult<HttpResponse> {
    let data = data.map(web::Json::into_inner).unwrap_or_default();
    SUBMISSION_SERVICE.return_to_student(&req, id.0, data).await
}

// 配置路由
pub fn configure_submission_routes(cfg: &mut web::ServiceConfig) {
    let writers = || {
        middlewares::RequireRole::new_any(&[
            &UserType::Admin,
            &UserType::Teacher,
            &UserType::Student,
        ])
    };
    let staff_only = || middlewares::RequireRole::new_any(UserType::staff_roles());

    cfg.service(
        web::scope("/api/v1/submissions")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_submissions))
                    .route(web::post().to(create_submission).wrap(writers())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_submission))
                    .route(web::put().to(update_content).wrap(writers())),
            )
            .service(
                web::resource("/{id}/submit")
                    .wrap(writers())
                    .route(web::post().to(submit)),
            )
            .service(
                web::resource("/{id}/grade")
                    .wrap(staff_only())
                    .route(web::post().to(grade)),
            )
            .service(
                web::resource("/{id}/return")
                    .wrap(staff_only())
                    .route(web::post().to(return_to_student)),
            ),
    );
}
