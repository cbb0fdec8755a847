use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{Duration, Utc};
use tracing::info;

use super::AuthService;
use crate::config::AppConfig;
use crate::errors::EduHubError;
use crate::models::{ApiResponse, auth::requests::ChangePasswordRequest};
use crate::services::app_data;
use crate::tenancy::CurrentUser;
use crate::utils::password::{PasswordService, calculate_password_strength};

pub async fn handle_change_password(
    service: &AuthService,
    change_request: ChangePasswordRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;
    let passwords = app_data::<PasswordService>(request)?;
    let config = app_data::<AppConfig>(request)?;

    let user = storage.get_user(current.tenant_id, current.id).await?;

    if !passwords.verify_password(&change_request.current_password, &user.password_hash) {
        return Err(EduHubError::authentication("Current password is incorrect").into());
    }
    if change_request.new_password == change_request.current_password {
        return Err(
            EduHubError::validation("New password must differ from the current one").into(),
        );
    }

    let strength = calculate_password_strength(&change_request.new_password);
    if strength < config.password.min_strength {
        return Err(EduHubError::validation(format!(
            "Password is too weak (strength {strength:.2}, required {:.2})",
            config.password.min_strength
        ))
        .into());
    }

    let hash = passwords.hash_password(&change_request.new_password)?;
    let expires_at = Utc::now() + Duration::days(config.password.expiry_days);
    let user = storage
        .update_password(current.tenant_id, current.id, hash, expires_at)
        .await?;

    info!("User {} changed password", user.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Password changed successfully")))
}
