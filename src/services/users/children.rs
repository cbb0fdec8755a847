use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::EduHubError;
use crate::models::{ApiResponse, users::entities::UserType, users::requests::LinkChildRequest};
use crate::tenancy::CurrentUser;

// 管理员可以查看任意家长，家长只能查看自己
pub async fn list_children(
    service: &UserService,
    parent_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let own = current.user_type == UserType::Parent && current.id == parent_id;
    if !(current.is_admin() || own) {
        return Err(EduHubError::permission_denied("Access denied").into());
    }

    let storage = service.get_storage(request)?;
    let children = storage.list_children(current.tenant_id, parent_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(children, "Children retrieved")))
}

pub async fn link_child(
    service: &UserService,
    parent_id: i64,
    link: LinkChildRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage
        .link_child(current.tenant_id, parent_id, link.student_id)
        .await?;

    info!(
        "Student {} linked to parent {} in tenant {}",
        link.student_id, parent_id, current.tenant_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success_empty("Child linked successfully")))
}

pub async fn unlink_child(
    service: &UserService,
    parent_id: i64,
    student_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage
        .unlink_child(current.tenant_id, parent_id, student_id)
        .await?;

    info!(
        "Student {} unlinked from parent {} in tenant {}",
        student_id, parent_id, current.tenant_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Child unlinked successfully")))
}
