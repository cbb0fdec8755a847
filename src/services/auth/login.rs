use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::{error, info};

use super::AuthService;
use crate::errors::EduHubError;
use crate::models::{
    ApiResponse,
    auth::{requests::LoginRequest, responses::LoginResponse},
};
use crate::services::app_data;
use crate::utils::coerce_uuid;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordService;

// 未知租户、未知邮箱、密码错误与停用账号返回同一个错误
fn invalid_credentials() -> EduHubError {
    EduHubError::authentication("Invalid tenant, email or password")
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;
    let jwt = app_data::<JwtUtils>(request)?;
    let passwords = app_data::<PasswordService>(request)?;

    // 租户或账号不可用时仍对占位哈希做一次校验，使各类失败耗时一致
    let tenant = match coerce_uuid(&login_request.tenant_id) {
        Ok(tenant_id) => match storage.get_tenant(tenant_id).await {
            Ok(tenant) => Some(tenant),
            Err(EduHubError::NotFound(_)) => None,
            Err(e) => return Err(e.into()),
        },
        Err(_) => None,
    };
    let Some(tenant) = tenant.filter(|t| t.is_active) else {
        passwords.verify_against_dummy(&login_request.password);
        return Err(invalid_credentials().into());
    };
    let tenant_id = tenant.id;

    // 1. 按租户 + 邮箱查找身份
    let Some(user) = storage
        .get_user_by_email(tenant_id, &login_request.email)
        .await?
    else {
        passwords.verify_against_dummy(&login_request.password);
        return Err(invalid_credentials().into());
    };

    // 2. 验证密码
    let verified = if user.is_active {
        passwords.verify_password(&login_request.password, &user.password_hash)
    } else {
        passwords.verify_against_dummy(&login_request.password)
    };
    if !verified {
        info!("Failed login for {} in tenant {}", user.id, tenant_id);
        return Err(invalid_credentials().into());
    }

    // 3. 更新最后登录时间
    storage.update_last_login(tenant_id, user.id).await?;

    // 4. 签发访问令牌
    let access_token = jwt
        .generate_access_token(user.id, tenant_id, user.user_type.as_str())
        .map_err(|e| {
            error!("Failed to generate JWT token: {}", e);
            EduHubError::internal("Unable to generate token")
        })?;

    info!("User {} logged in to tenant {}", user.id, tenant_id);

    let response = LoginResponse {
        access_token,
        expires_in: jwt.access_token_expiry_secs(),
        password_change_required: user.password_change_required(Utc::now()),
        user,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response, "Login successful")))
}
