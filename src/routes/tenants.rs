use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares;
use crate::models::tenants::requests::{
    ProvisionTenantRequest, UpdateBrandingRequest, UpdateNotificationConfigRequest,
};
use crate::models::users::entities::UserType;
use crate::services::TenantService;

static TENANT_SERVICE: Lazy<TenantService> = Lazy::new(TenantService::new_lazy);

// 平台开通租户，由平台密钥保护
pub async fn provision_tenant(
    req: HttpRequest,
    data: web::Json<ProvisionTenantRequest>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE
        .provision_tenant(&req, data.into_inner())
        .await
}

pub async fn get_branding(req: HttpRequest) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.get_branding(&req).await
}

pub async fn update_branding(
    req: HttpRequest,
    data: web::Json<UpdateBrandingRequest>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.update_branding(&req, data.into_inner()).await
}

pub async fn get_notification_config(req: HttpRequest) -> ActixResult<HttpResponse> {
    TENANT_SERVICE.get_notification_config(&req).await
}

pub async fn update_notification_config(
    req: HttpRequest,
    data: web::Json<UpdateNotificationConfigRequest>,
) -> ActixResult<HttpResponse> {
    TENANT_SERVICE
        .update_notification_config(&req, data.into_inner())
        .await
}

// 配置路由
pub fn configure_tenant_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/v1/tenants", web::post().to(provision_tenant))
        .service(
            web::scope("/api/v1/tenant")
                .wrap(middlewares::RequireJWT)
                .service(
                    web::resource("/branding")
                        .route(web::get().to(get_branding))
                        .route(
                            web::put()
                                .to(update_branding)
                                .wrap(middlewares::RequireRole::new(&UserType::Admin)),
                        ),
                )
                .service(
                    web::resource("/notifications")
                        .wrap(middlewares::RequireRole::new(&UserType::Admin))
                        .route(web::get().to(get_notification_config))
                        .route(web::put().to(update_notification_config)),
                ),
        );
}
