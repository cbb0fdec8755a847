use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::users::entities::UserType;
use crate::models::users::requests::{
    CreateUserRequest, LinkChildRequest, UpdateUserRequest, UserListParams,
};
use crate::services::UserService;
use crate::utils::{SafeIDI64, SafeStudentIdI64};

// 懒加载的全局 UserService 实例
static USER_SERVICE: Lazy<UserService> = Lazy::new(UserService::new_lazy);

// HTTP处理程序
pub async fn list_users(
    req: HttpRequest,
    query: web::Query<UserListParams>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_users(query.into_inner(), &req).await
}

pub async fn create_user(
    req: HttpRequest,
    user_data: web::Json<CreateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE.create_user(user_data.into_inner(), &req).await
}

pub async fn get_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.get_user(user_id.0, &req).await
}

pub async fn update_user(
    req: HttpRequest,
    user_id: SafeIDI64,
    update_data: web::Json<UpdateUserRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .update_user(user_id.0, update_data.into_inner(), &req)
        .await
}

pub async fn delete_user(req: HttpRequest, user_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.delete_user(user_id.0, &req).await
}

pub async fn list_children(req: HttpRequest, parent_id: SafeIDI64) -> ActixResult<HttpResponse> {
    USER_SERVICE.list_children(parent_id.0, &req).await
}

pub async fn link_child(
    req: HttpRequest,
    parent_id: SafeIDI64,
    link: web::Json<LinkChildRequest>,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .link_child(parent_id.0, link.into_inner(), &req)
        .await
}

pub async fn unlink_child(
    req: HttpRequest,
    parent_id: SafeIDI64,
    student_id: SafeStudentIdI64,
) -> ActixResult<HttpResponse> {
    USER_SERVICE
        .unlink_child(parent_id.0, student_id.0, &req)
        .await
}

// 配置路由
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/users")
            .wrap(middlewares::RequireJWT)
            .service(
                web::scope("")
                    .wrap(middlewares::RequireRole::new_any(UserType::admin_roles()))
                    .route("", web::get().to(list_users))
                    .route("", web::post().to(create_user))
                    .route("/{id}", web::get().to(get_user))
                    .route("/{id}", web::put().to(update_user))
                    .route("/{id}", web::delete().to(delete_user)),
            ),
    )
    .service(
        web::scope("/api/v1/parents/{id}/children")
            .wrap(middlewares::RequireJWT)
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_children)
                            // 家长只能查看自己名下的学生
                            .wrap(middlewares::RequireRole::new_any(&[
                                &UserType::Admin,
                                &UserType::Parent,
                            ])),
                    )
                    .route(
                        web::post()
                            .to(link_child)
                            .wrap(middlewares::RequireRole::new(&UserType::Admin)),
                    ),
            )
            .service(
                web::resource("/{student_id}")
                    .wrap(middlewares::RequireRole::new(&UserType::Admin))
                    .route(web::delete().to(unlink_child)),
            ),
    );
}
