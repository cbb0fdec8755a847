//! 租户通知配置（每个租户一行）

use sea_orm::entity::prelude::*;

use super::to_datetime;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notification_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub tenant_id: Uuid,
    pub whatsapp_enabled: bool,
    pub whatsapp_sender: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub enrollment_template: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub assessment_template: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub grade_template: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub password_reset_template: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tenants::Entity",
        from = "Column::TenantId",
        to = "super::tenants::Column::Id"
    )]
    Tenant,
}

impl Related<super::tenants::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tenant.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_notification_config(self) -> crate::models::tenants::entities::NotificationConfig {
        crate::models::tenants::entities::NotificationConfig {
            tenant_id: self.tenant_id,
            whatsapp_enabled: self.whatsapp_enabled,
            whatsapp_sender: self.whatsapp_sender,
            enrollment_template: self.enrollment_template,
            assessment_template: self.assessment_template,
            grade_template: self.grade_template,
            password_reset_template: self.password_reset_template,
            updated_at: to_datetime(self.updated_at),
        }
    }
}
