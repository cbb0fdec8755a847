use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;

use super::AuthService;
use crate::models::{ApiResponse, auth::responses::MeResponse};
use crate::tenancy::CurrentUser;

pub async fn handle_me(service: &AuthService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let detail = storage.get_user_detail(current.tenant_id, current.id).await?;
    let response = MeResponse {
        password_change_required: detail.user.password_change_required(Utc::now()),
        detail,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "User information retrieved")))
}
