use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::TenantService;
use crate::models::{
    ApiResponse,
    tenants::{entities::Branding, requests::UpdateBrandingRequest},
};
use crate::tenancy::CurrentUser;

pub async fn get_branding(
    service: &TenantService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let tenant = storage.get_tenant(current.tenant_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        Branding::from(tenant),
        "Branding retrieved",
    )))
}

pub async fn update_branding(
    service: &TenantService,
    request: &HttpRequest,
    update: UpdateBrandingRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    update.validate()?;

    let storage = service.get_storage(request)?;
    let tenant = storage.update_branding(current.tenant_id, update).await?;

    info!("Branding of tenant {} updated by {}", tenant.id, current.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        Branding::from(tenant),
        "Branding updated successfully",
    )))
}
