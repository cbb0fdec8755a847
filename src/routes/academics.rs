//! 学年、年级、分组、科目与班级
//!
//! 读接口对租户内所有身份开放，写接口仅限管理员。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::academics::requests::{
    AcademicListParams, AcademicYearListParams, ClassListParams, CreateAcademicYearRequest,
    CreateClassRequest, CreateGradeRequest, CreateSectionRequest, CreateSubjectRequest,
    SectionListParams, UpdateAcademicYearRequest, UpdateClassRequest, UpdateGradeRequest,
    UpdateSectionRequest, UpdateSubjectRequest,
};
use crate::models::users::entities::UserType;
use crate::services::AcademicService;
use crate::utils::SafeIDI64;

static ACADEMIC_SERVICE: Lazy<AcademicService> = Lazy::new(AcademicService::new_lazy);

// 学年
pub async fn list_years(
    req: HttpRequest,
    query: web::Query<AcademicYearListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_years(&req, query.into_inner()).await
}

pub async fn create_year(
    req: HttpRequest,
    data: web::Json<CreateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_year(&req, data.into_inner()).await
}

pub async fn get_year(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_year(&req, id.0).await
}

pub async fn update_year(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateAcademicYearRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_year(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_year(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_year(&req, id.0).await
}

// 年级
pub async fn list_grades(
    req: HttpRequest,
    query: web::Query<AcademicListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_grades(&req, query.into_inner()).await
}

pub async fn create_grade(
    req: HttpRequest,
    data: web::Json<CreateGradeRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_grade(&req, data.into_inner()).await
}

pub async fn get_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_grade(&req, id.0).await
}

pub async fn update_grade(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateGradeRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_grade(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_grade(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_grade(&req, id.0).await
}

// 分组
pub async fn list_sections(
    req: HttpRequest,
    query: web::Query<SectionListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_sections(&req, query.into_inner()).await
}

pub async fn create_section(
    req: HttpRequest,
    data: web::Json<CreateSectionRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_section(&req, data.into_inner()).await
}

pub async fn get_section(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_section(&req, id.0).await
}

pub async fn update_section(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSectionRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_section(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_section(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_section(&req, id.0).await
}

// 科目
pub async fn list_subjects(
    req: HttpRequest,
    query: web::Query<AcademicListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_subjects(&req, query.into_inner()).await
}

pub async fn create_subject(
    req: HttpRequest,
    data: web::Json<CreateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_subject(&req, data.into_inner()).await
}

pub async fn get_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_subject(&req, id.0).await
}

pub async fn update_subject(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateSubjectRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_subject(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_subject(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_subject(&req, id.0).await
}

// 班级
pub async fn list_classes(
    req: HttpRequest,
    query: web::Query<ClassListParams>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.list_classes(&req, query.into_inner()).await
}

pub async fn create_class(
    req: HttpRequest,
    data: web::Json<CreateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.create_class(&req, data.into_inner()).await
}

pub async fn get_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.get_class(&req, id.0).await
}

pub async fn update_class(
    req: HttpRequest,
    id: SafeIDI64,
    data: web::Json<UpdateClassRequest>,
) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE
        .update_class(&req, id.0, data.into_inner())
        .await
}

pub async fn delete_class(req: HttpRequest, id: SafeIDI64) -> ActixResult<HttpResponse> {
    ACADEMIC_SERVICE.delete_class(&req, id.0).await
}

fn admin_only() -> middlewares::RequireRole {
    middlewares::RequireRole::new_any(UserType::admin_roles())
}

// 配置路由
pub fn configure_academic_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/academic-years")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_years))
                    .route(web::post().to(create_year).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_year))
                    .route(web::put().to(update_year).wrap(admin_only()))
                    .route(web::delete().to(delete_year).wrap(admin_only())),
            ),
    )
    .service(
        web::scope("/api/v1/grades")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_grades))
                    .route(web::post().to(create_grade).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_grade))
                    .route(web::put().to(update_grade).wrap(admin_only()))
                    .route(web::delete().to(delete_grade).wrap(admin_only())),
            ),
    )
    .service(
        web::scope("/api/v1/sections")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_sections))
                    .route(web::post().to(create_section).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_section))
                    .route(web::put().to(update_section).wrap(admin_only()))
                    .route(web::delete().to(delete_section).wrap(admin_only())),
            ),
    )
    .service(
        web::scope("/api/v1/subjects")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_subjects))
                    .route(web::post().to(create_subject).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_subject))
                    .route(web::put().to(update_subject).wrap(admin_only()))
                    .route(web::delete().to(delete_subject).wrap(admin_only())),
            ),
    )
    .service(
        web::scope("/api/v1/classes")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(web::get().to(list_classes))
                    .route(web::post().to(create_class).wrap(admin_only())),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_class))
                    .route(web::put().to(update_class).wrap(admin_only()))
                    .route(web::delete().to(delete_class).wrap(admin_only())),
            ),
    );
}
