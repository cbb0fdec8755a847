use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::errors::EduHubError;
use crate::models::ApiResponse;
use crate::tenancy::CurrentUser;

pub async fn delete_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;

    if user_id == current.id {
        return Err(EduHubError::validation("You cannot delete your own account").into());
    }

    let storage = service.get_storage(request)?;
    storage.delete_user(current.tenant_id, user_id).await?;

    info!(
        "User {} deleted from tenant {} by {}",
        user_id, current.tenant_id, current.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("User deleted successfully")))
}
