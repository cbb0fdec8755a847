use sea_orm_migration::prelude::*;

use crate::guard::{AdditiveColumn, add_column_if_missing, drop_column_if_exists};

#[derive(DeriveMigrationName)]
pub struct Migration;

const TABLE: &str = "users";

fn columns() -> [AdditiveColumn; 3] {
    [
        // 旧账号同样需要首次登录改密
        AdditiveColumn::flag("is_first_login", true),
        AdditiveColumn::nullable_timestamp("password_expiry_date"),
        AdditiveColumn::nullable_text("address"),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in columns() {
            add_column_if_missing(manager, TABLE, &column).await?;
        }
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in columns().iter().rev() {
            drop_column_if_exists(manager, TABLE, column.name()).await?;
        }
        Ok(())
    }
}
