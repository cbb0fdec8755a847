use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::{info, warn};

use super::TenantService;
use crate::config::AppConfig;
use crate::errors::EduHubError;
use crate::models::{
    ApiResponse,
    tenants::{requests::ProvisionTenantRequest, responses::ProvisionTenantResponse},
};
use crate::services::app_data;
use crate::utils::password::{PasswordService, generate_default_password};

pub const PLATFORM_KEY_HEADER: &str = "X-Platform-Key";

pub async fn provision_tenant(
    service: &TenantService,
    request: &HttpRequest,
    provision_request: ProvisionTenantRequest,
) -> ActixResult<HttpResponse> {
    let config = app_data::<AppConfig>(request)?;

    // 未配置平台密钥时接口整体关闭
    if config.platform.api_key.is_empty() {
        return Err(EduHubError::permission_denied("Tenant provisioning is disabled").into());
    }
    let supplied = request
        .headers()
        .get(PLATFORM_KEY_HEADER)
        .and_then(|h| h.to_str().ok());
    if supplied != Some(config.platform.api_key.as_str()) {
        warn!("Rejected tenant provisioning with missing or wrong platform key");
        return Err(EduHubError::authentication("Invalid platform key").into());
    }

    provision_request.validate()?;

    let storage = service.get_storage(request)?;
    let passwords = app_data::<PasswordService>(request)?;

    let admin_password = generate_default_password(config.password.default_length);
    let hash = passwords.hash_password(&admin_password)?;

    let (tenant, admin) = storage.provision_tenant(provision_request, hash).await?;
    info!("Tenant {} ({}) provisioned via platform API", tenant.id, tenant.name);

    Ok(HttpResponse::Created().json(ApiResponse::success(
        ProvisionTenantResponse {
            tenant,
            admin,
            admin_password,
        },
        "Tenant provisioned successfully",
    )))
}
