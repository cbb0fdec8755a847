use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::models::ApiResponse;
use crate::tenancy::CurrentUser;

pub async fn get_user(
    service: &UserService,
    user_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let detail = storage.get_user_detail(current.tenant_id, user_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        detail,
        "User information retrieved",
    )))
}
