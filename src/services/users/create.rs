use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::UserService;
use crate::config::AppConfig;
use crate::errors::EduHubError;
use crate::models::{
    ApiResponse,
    users::{requests::CreateUserRequest, responses::CreateUserResponse},
};
use crate::services::app_data;
use crate::tenancy::CurrentUser;
use crate::utils::password::{
    PasswordService, calculate_password_strength, generate_default_password,
};

pub async fn create_user(
    service: &UserService,
    mut user_data: CreateUserRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    user_data.validate()?;

    let storage = service.get_storage(request)?;
    let passwords = app_data::<PasswordService>(request)?;
    let config = app_data::<AppConfig>(request)?;

    // 未提供密码时生成默认密码，只在本次响应中返回
    let (password, generated) = match user_data.password.take() {
        Some(password) => {
            if calculate_password_strength(&password) < config.password.min_strength {
                return Err(EduHubError::validation("Password is too weak").into());
            }
            (password, false)
        }
        None => (
            generate_default_password(config.password.default_length),
            true,
        ),
    };
    let hash = passwords.hash_password(&password)?;

    let detail = storage
        .create_user(current.tenant_id, user_data, hash)
        .await?;

    info!(
        "User {} ({}) created in tenant {} by {}",
        detail.user.id, detail.user.user_type, current.tenant_id, current.id
    );

    Ok(HttpResponse::Created().json(ApiResponse::success(
        CreateUserResponse {
            detail,
            generated_password: generated.then_some(password),
        },
        "User created successfully",
    )))
}
