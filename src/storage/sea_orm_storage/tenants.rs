//! 租户、品牌与通知配置存储操作

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::users::insert_user_with_profile;
use super::{SeaOrmStorage, now_ts};
use crate::entity::notification_configs::{
    ActiveModel as NotificationActiveModel, Column as NotificationColumn,
    Entity as NotificationConfigs, Model as NotificationModel,
};
use crate::entity::tenants::{ActiveModel, Entity as Tenants};
use crate::errors::{EduHubError, Result};
use crate::models::tenants::{
    entities::{NotificationConfig, Tenant},
    requests::{ProvisionTenantRequest, UpdateBrandingRequest, UpdateNotificationConfigRequest},
};
use crate::models::users::{
    entities::{AdminProfile, Profile, User},
    requests::CreateUserRequest,
};

/// 读取租户的通知配置，不存在时按默认值插入
async fn ensure_notification_config<C>(db: &C, tenant_id: Uuid) -> Result<NotificationModel>
where
    C: ConnectionTrait,
{
    let existing = NotificationConfigs::find()
        .filter(NotificationColumn::TenantId.eq(tenant_id))
        .one(db)
        .await
        .map_err(|e| EduHubError::from_db("查询通知配置失败", e))?;

    if let Some(model) = existing {
        return Ok(model);
    }

    let now = now_ts();
    let model = NotificationActiveModel {
        tenant_id: Set(tenant_id),
        whatsapp_enabled: Set(false),
        whatsapp_sender: Set(None),
        enrollment_template: Set(None),
        assessment_template: Set(None),
        grade_template: Set(None),
        password_reset_template: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    model
        .insert(db)
        .await
        .map_err(|e| EduHubError::from_db("创建通知配置失败", e))
}

impl SeaOrmStorage {
    /// 开通租户：租户行 + 首个管理员，在同一事务中完成
    pub async fn provision_tenant_impl(
        &self,
        req: ProvisionTenantRequest,
        admin_password_hash: String,
    ) -> Result<(Tenant, User)> {
        let now = now_ts();
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        let tenant = ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(req.name.trim().to_string()),
            subdomain: Set(req.subdomain.map(|s| s.to_lowercase())),
            domain: Set(None),
            logo: Set(None),
            primary_color: Set(None),
            secondary_color: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| EduHubError::from_db("创建租户失败", e))?;

        let admin = insert_user_with_profile(
            &txn,
            tenant.id,
            CreateUserRequest {
                email: req.admin_email,
                first_name: req.admin_first_name,
                last_name: req.admin_last_name,
                password: None,
                address: None,
                profile: Profile::Admin(AdminProfile {
                    job_title: None,
                    is_super_admin: true,
                }),
            },
            admin_password_hash,
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        info!("租户已开通: {} ({})", tenant.name, tenant.id);
        Ok((tenant.into_tenant(), admin.user))
    }

    pub async fn get_tenant_impl(&self, tenant_id: Uuid) -> Result<Tenant> {
        Tenants::find_by_id(tenant_id)
            .one(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询租户失败", e))?
            .map(|m| m.into_tenant())
            .ok_or_else(|| EduHubError::not_found("Tenant not found"))
    }

    pub async fn count_tenants_impl(&self) -> Result<u64> {
        Tenants::find()
            .count(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询租户总数失败", e))
    }

    /// 部分更新品牌字段
    pub async fn update_branding_impl(
        &self,
        tenant_id: Uuid,
        update: UpdateBrandingRequest,
    ) -> Result<Tenant> {
        let current = Tenants::find_by_id(tenant_id)
            .one(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询租户失败", e))?
            .ok_or_else(|| EduHubError::not_found("Tenant not found"))?;

        let mut model = current.into_active_model();
        if let Some(name) = update.name {
            model.name = Set(name.trim().to_string());
        }
        if let Some(subdomain) = update.subdomain {
            model.subdomain = Set(Some(subdomain.to_lowercase()));
        }
        if let Some(domain) = update.domain {
            model.domain = Set(Some(domain.to_lowercase()));
        }
        if let Some(logo) = update.logo {
            model.logo = Set(Some(logo));
        }
        if let Some(color) = update.primary_color {
            model.primary_color = Set(Some(color.to_uppercase()));
        }
        if let Some(color) = update.secondary_color {
            model.secondary_color = Set(Some(color.to_uppercase()));
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("更新品牌信息失败", e))?;

        Ok(updated.into_tenant())
    }

    pub async fn get_notification_config_impl(
        &self,
        tenant_id: Uuid,
    ) -> Result<NotificationConfig> {
        Ok(ensure_notification_config(&self.db, tenant_id)
            .await?
            .into_notification_config())
    }

    pub async fn update_notification_config_impl(
        &self,
        tenant_id: Uuid,
        update: UpdateNotificationConfigRequest,
    ) -> Result<NotificationConfig> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        let mut model = ensure_notification_config(&txn, tenant_id)
            .await?
            .into_active_model();

        if let Some(enabled) = update.whatsapp_enabled {
            model.whatsapp_enabled = Set(enabled);
        }
        if let Some(sender) = update.whatsapp_sender {
            model.whatsapp_sender = Set(Some(sender));
        }
        if let Some(template) = update.enrollment_template {
            model.enrollment_template = Set(Some(template));
        }
        if let Some(template) = update.assessment_template {
            model.assessment_template = Set(Some(template));
        }
        if let Some(template) = update.grade_template {
            model.grade_template = Set(Some(template));
        }
        if let Some(template) = update.password_reset_template {
            model.password_reset_template = Set(Some(template));
        }
        model.updated_at = Set(now_ts());

        let updated = model
            .update(&txn)
            .await
            .map_err(|e| EduHubError::from_db("更新通知配置失败", e))?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        Ok(updated.into_notification_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provision_request(name: &str, subdomain: &str) -> ProvisionTenantRequest {
        ProvisionTenantRequest {
            name: name.to_string(),
            subdomain: Some(subdomain.to_string()),
            admin_email: "admin@school.test".to_string(),
            admin_first_name: "Ada".to_string(),
            admin_last_name: "Admin".to_string(),
        }
    }

    #[tokio::test]
    async fn test_provision_creates_tenant_and_admin() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, admin) = storage
            .provision_tenant_impl(provision_request("North High", "north"), "hash".into())
            .await
            .unwrap();

        assert_eq!(tenant.subdomain.as_deref(), Some("north"));
        assert_eq!(admin.tenant_id, tenant.id);
        assert!(admin.is_first_login);
        assert_eq!(storage.count_tenants_impl().await.unwrap(), 1);

        let detail = storage
            .get_user_detail_impl(tenant.id, admin.id)
            .await
            .unwrap();
        assert!(matches!(
            detail.profile,
            Profile::Admin(AdminProfile {
                is_super_admin: true,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_duplicate_subdomain_is_conflict_and_rolls_back() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        storage
            .provision_tenant_impl(provision_request("North High", "north"), "hash".into())
            .await
            .unwrap();

        let err = storage
            .provision_tenant_impl(provision_request("North Again", "north"), "hash".into())
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));
        assert_eq!(storage.count_tenants_impl().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_branding_patch_keeps_untouched_fields() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = storage
            .provision_tenant_impl(provision_request("North High", "north"), "hash".into())
            .await
            .unwrap();

        let updated = storage
            .update_branding_impl(
                tenant.id,
                UpdateBrandingRequest {
                    primary_color: Some("#a1b2c3".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.primary_color.as_deref(), Some("#A1B2C3"));
        assert_eq!(updated.subdomain.as_deref(), Some("north"));
        assert_eq!(updated.name, "North High");
    }

    #[tokio::test]
    async fn test_notification_config_is_created_lazily() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = storage
            .provision_tenant_impl(provision_request("North High", "north"), "hash".into())
            .await
            .unwrap();

        let config = storage
            .get_notification_config_impl(tenant.id)
            .await
            .unwrap();
        assert!(!config.whatsapp_enabled);

        let updated = storage
            .update_notification_config_impl(
                tenant.id,
                UpdateNotificationConfigRequest {
                    whatsapp_enabled: Some(true),
                    grade_template: Some("{student_name} scored {score}".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.whatsapp_enabled);
        assert_eq!(
            updated.grade_template.as_deref(),
            Some("{student_name} scored {score}")
        );

        // 再次读取不会重复创建
        let again = storage
            .get_notification_config_impl(tenant.id)
            .await
            .unwrap();
        assert!(again.whatsapp_enabled);
    }

    #[tokio::test]
    async fn test_unknown_tenant_is_not_found() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let err = storage.get_tenant_impl(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));
    }
}
