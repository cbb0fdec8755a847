use sea_orm_migration::prelude::*;

use crate::guard::{create_index_if_missing, drop_index_if_exists};

#[derive(DeriveMigrationName)]
pub struct Migration;

const TENANT_INDEX: &str = "idx_notification_configs_tenant";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(NotificationConfigs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(NotificationConfigs::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::TenantId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::WhatsappEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::WhatsappSender)
                            .string()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::EnrollmentTemplate)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::AssessmentTemplate)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::GradeTemplate)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::PasswordResetTemplate)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(NotificationConfigs::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(NotificationConfigs::Table, NotificationConfigs::TenantId)
                            .to(Tenants::Table, Tenants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        create_index_if_missing(
            manager,
            "notification_configs",
            TENANT_INDEX,
            &["tenant_id"],
            true,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        drop_index_if_exists(manager, "notification_configs", TENANT_INDEX).await?;
        manager
            .drop_table(
                Table::drop()
                    .table(NotificationConfigs::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
enum NotificationConfigs {
    #[sea_orm(iden = "notification_configs")]
    Table,
    Id,
    TenantId,
    WhatsappEnabled,
    WhatsappSender,
    EnrollmentTemplate,
    AssessmentTemplate,
    GradeTemplate,
    PasswordResetTemplate,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tenants {
    #[sea_orm(iden = "tenants")]
    Table,
    Id,
}
