use sea_orm_migration::prelude::*;

use crate::guard::{
    AdditiveColumn, add_column_if_missing, create_index_if_missing, drop_column_if_exists,
    drop_index_if_exists,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

const TABLE: &str = "tenants";
const SUBDOMAIN_INDEX: &str = "idx_tenants_subdomain";

fn columns() -> [AdditiveColumn; 5] {
    [
        AdditiveColumn::nullable_string("subdomain"),
        AdditiveColumn::nullable_string("domain"),
        AdditiveColumn::nullable_string("logo"),
        AdditiveColumn::nullable_string("primary_color"),
        AdditiveColumn::nullable_string("secondary_color"),
    ]
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for column in columns() {
            add_column_if_missing(manager, TABLE, &column).await?;
        }
        create_index_if_missing(manager, TABLE, SUBDOMAIN_INDEX, &["subdomain"], true).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 先删索引，SQLite 不允许删除带索引的列
        drop_index_if_exists(manager, TABLE, SUBDOMAIN_INDEX).await?;
        for column in columns().iter().rev() {
            drop_column_if_exists(manager, TABLE, column.name()).await?;
        }
        Ok(())
    }
}
