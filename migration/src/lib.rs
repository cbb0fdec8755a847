pub use sea_orm_migration::prelude::*;

pub mod enum_ext;
pub mod guard;

mod m20250123_000001_create_tables;
mod m20250201_000001_add_user_security_columns;
mod m20250210_000001_add_tenant_branding;
mod m20250215_000001_create_notification_configs;
mod m20250301_000001_unique_active_enrollments;

pub use enum_ext::{ENUM_EXTENSIONS, EnumExtension, apply_enum_extensions};

use sea_orm_migration::sea_orm::DatabaseConnection;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250123_000001_create_tables::Migration),
            Box::new(m20250201_000001_add_user_security_columns::Migration),
            Box::new(m20250210_000001_add_tenant_branding::Migration),
            Box::new(m20250215_000001_create_notification_configs::Migration),
            Box::new(m20250301_000001_unique_active_enrollments::Migration),
        ]
    }
}

/// 回滚入口：按步回退迁移链（`None` 表示全部回退）
///
/// 前驱步骤被回退的枚举扩值会调用 [`EnumExtension::revert`]，返回这些扩值。
pub async fn rollback(
    db: &DatabaseConnection,
    steps: Option<u32>,
) -> Result<Vec<EnumExtension>, DbErr> {
    Migrator::down(db, steps).await?;

    let pending: Vec<String> = Migrator::get_pending_migrations(db)
        .await?
        .iter()
        .map(|m| m.name().to_string())
        .collect();

    let reverted: Vec<EnumExtension> = ENUM_EXTENSIONS
        .iter()
        .filter(|extension| pending.iter().any(|name| name == extension.after))
        .copied()
        .collect();
    for extension in &reverted {
        extension.revert();
    }
    Ok(reverted)
}
