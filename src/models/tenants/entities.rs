use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 租户（学校）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// 租户品牌信息
#[derive(Debug, Clone, Serialize)]
pub struct Branding {
    pub name: String,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

impl From<Tenant> for Branding {
    fn from(tenant: Tenant) -> Self {
        Self {
            name: tenant.name,
            subdomain: tenant.subdomain,
            domain: tenant.domain,
            logo: tenant.logo,
            primary_color: tenant.primary_color,
            secondary_color: tenant.secondary_color,
        }
    }
}

// 通知配置，消息投递不在本服务内
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub tenant_id: Uuid,
    pub whatsapp_enabled: bool,
    pub whatsapp_sender: Option<String>,
    pub enrollment_template: Option<String>,
    pub assessment_template: Option<String>,
    pub grade_template: Option<String>,
    pub password_reset_template: Option<String>,
    pub updated_at: DateTime<Utc>,
}
