use serde::Serialize;

use super::entities::Tenant;
use crate::models::users::entities::User;

// 开通租户响应，管理员初始密码只返回这一次
#[derive(Debug, Serialize)]
pub struct ProvisionTenantResponse {
    pub tenant: Tenant,
    pub admin: User,
    pub admin_password: String,
}
