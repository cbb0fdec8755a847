pub mod branding;
pub mod notifications;
pub mod provision;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::storage_from;
use crate::errors::Result;
use crate::models::tenants::requests::{
    ProvisionTenantRequest, UpdateBrandingRequest, UpdateNotificationConfigRequest,
};
use crate::storage::Storage;

pub struct TenantService {
    storage: Option<Arc<dyn Storage>>,
}

impl TenantService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from(request),
        }
    }

    // 开通租户（平台密钥保护）
    pub async fn provision_tenant(
        &self,
        request: &HttpRequest,
        provision_request: ProvisionTenantRequest,
    ) -> ActixResult<HttpResponse> {
        provision::provision_tenant(self, request, provision_request).await
    }

    // 获取当前租户品牌信息
    pub async fn get_branding(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        branding::get_branding(self, request).await
    }

    // 更新当前租户品牌信息
    pub async fn update_branding(
        &self,
        request: &HttpRequest,
        update: UpdateBrandingRequest,
    ) -> ActixResult<HttpResponse> {
        branding::update_branding(self, request, update).await
    }

    // 获取通知配置
    pub async fn get_notification_config(
        &self,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        notifications::get_notification_config(self, request).await
    }

    // 更新通知配置
    pub async fn update_notification_config(
        &self,
        request: &HttpRequest,
        update: UpdateNotificationConfigRequest,
    ) -> ActixResult<HttpResponse> {
        notifications::update_notification_config(self, request, update).await
    }
}
