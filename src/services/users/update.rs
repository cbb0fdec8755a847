use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::EduHubError;
use crate::models::{ApiResponse, users::requests::UpdateUserRequest};
use crate::tenancy::CurrentUser;

pub async fn update_user(
    service: &UserService,
    user_id: i64,
    update_data: UpdateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    if user_id == current.id && update_data.is_active == Some(false) {
        return Err(EduHubError::validation("You cannot deactivate your own account").into());
    }

    let user = storage.get_user(current.tenant_id, user_id).await?;
    update_data.validate(&user.user_type)?;

    let detail = storage
        .update_user(current.tenant_id, user_id, update_data)
        .await?;

    info!("User {} updated by {}", user_id, current.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "User information updated successfully",
    )))
}
