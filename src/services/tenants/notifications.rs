use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TenantService;
use crate::models::{ApiResponse, tenants::requests::UpdateNotificationConfigRequest};
use crate::tenancy::CurrentUser;

pub async fn get_notification_config(
    service: &TenantService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let config = storage.get_notification_config(current.tenant_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        config,
        "Notification configuration retrieved",
    )))
}

pub async fn update_notification_config(
    service: &TenantService,
    request: &HttpRequest,
    update: UpdateNotificationConfigRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    update.validate()?;

    let storage = service.get_storage(request)?;
    let config = storage
        .update_notification_config(current.tenant_id, update)
        .await?;

    info!(
        "Notification configuration of tenant {} updated by {}",
        current.tenant_id, current.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        config,
        "Notification configuration updated successfully",
    )))
}
