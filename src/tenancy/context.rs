use actix_web::{HttpMessage, HttpRequest};
use uuid::Uuid;

use crate::errors::{EduHubError, Result};
use crate::models::users::entities::{User, UserType};

/// 已认证的调用方，由 `RequireJWT` 写入请求扩展
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub tenant_id: Uuid,
    pub user_type: UserType,
    pub email: String,
}

impl CurrentUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            tenant_id: user.tenant_id,
            user_type: user.user_type.clone(),
            email: user.email.clone(),
        }
    }

    /// 从请求扩展中取出调用方，缺失视为未认证
    pub fn from_request(req: &HttpRequest) -> Result<Self> {
        req.extensions()
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| EduHubError::authentication("Authentication required"))
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_staff(&self) -> bool {
        UserType::staff_roles().contains(&&self.user_type)
    }
}
