//! 同一学生在同一学年 + 班级下最多一条有效注册，由数据库唯一索引保证
//!
//! PostgreSQL / SQLite 使用部分唯一索引；未分班（class_id 为空）的注册另建一条索引。
//! MySQL 不支持部分索引，改用存储生成列：无效注册的生成值为 NULL，不参与唯一约束。

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};
use tracing::{debug, info};

use crate::guard::{drop_column_if_exists, drop_index_if_exists};

#[derive(DeriveMigrationName)]
pub struct Migration;

const TABLE: &str = "enrollments";
const CLASS_INDEX: &str = "uq_enrollments_active_class";
const UNASSIGNED_INDEX: &str = "uq_enrollments_active_unassigned";
const MYSQL_KEY_COLUMN: &str = "active_slot";
const MYSQL_INDEX: &str = "uq_enrollments_active_slot";

fn partial_unique(name: &str, columns: &[&str], class_assigned: bool) -> IndexCreateStatement {
    let class_filter = if class_assigned {
        Expr::col(Alias::new("class_id")).is_not_null()
    } else {
        Expr::col(Alias::new("class_id")).is_null()
    };

    let mut index = Index::create();
    index.name(name).table(Alias::new(TABLE)).unique();
    for column in columns {
        index.col(Alias::new(*column));
    }
    index
        .and_where(Expr::col(Alias::new("is_active")).eq(true))
        .and_where(class_filter);
    index.to_owned()
}

async fn create_if_missing(
    manager: &SchemaManager<'_>,
    name: &str,
    index: IndexCreateStatement,
) -> Result<(), DbErr> {
    if manager.has_index(TABLE, name).await? {
        debug!("Index {} on {} already exists, skipping", name, TABLE);
        return Ok(());
    }
    manager.create_index(index).await?;
    info!("Created index {} on {}", name, TABLE);
    Ok(())
}

async fn up_mysql(manager: &SchemaManager<'_>) -> Result<(), DbErr> {
    if !manager.has_column(TABLE, MYSQL_KEY_COLUMN).await? {
        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE `enrollments` ADD COLUMN `active_slot` VARCHAR(128) \
                 GENERATED ALWAYS AS (IF(`is_active`, CONCAT_WS(':', HEX(`tenant_id`), \
                 `student_id`, `academic_year_id`, COALESCE(`class_id`, 0)), NULL)) STORED",
            )
            .await?;
        info!("Added generated column {}.{}", TABLE, MYSQL_KEY_COLUMN);
    }

    let mut index = Index::create();
    index
        .name(MYSQL_INDEX)
        .table(Alias::new(TABLE))
        .col(Alias::new(MYSQL_KEY_COLUMN))
        .unique();
    create_if_missing(manager, MYSQL_INDEX, index.to_owned()).await
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DbBackend::MySql {
            return up_mysql(manager).await;
        }

        create_if_missing(
            manager,
            CLASS_INDEX,
            partial_unique(
                CLASS_INDEX,
                &["tenant_id", "student_id", "academic_year_id", "class_id"],
                true,
            ),
        )
        .await?;
        create_if_missing(
            manager,
            UNASSIGNED_INDEX,
            partial_unique(
                UNASSIGNED_INDEX,
                &["tenant_id", "student_id", "academic_year_id"],
                false,
            ),
        )
        .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() == DbBackend::MySql {
            drop_index_if_exists(manager, TABLE, MYSQL_INDEX).await?;
            drop_column_if_exists(manager, TABLE, MYSQL_KEY_COLUMN).await?;
            return Ok(());
        }

        drop_index_if_exists(manager, TABLE, UNASSIGNED_INDEX).await?;
        drop_index_if_exists(manager, TABLE, CLASS_INDEX).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_index_sql() {
        let sql = partial_unique(
            CLASS_INDEX,
            &["tenant_id", "student_id", "academic_year_id", "class_id"],
            true,
        )
        .to_string(PostgresQueryBuilder);
        assert!(sql.starts_with(r#"CREATE UNIQUE INDEX "uq_enrollments_active_class""#), "{sql}");
        assert!(sql.contains(r#""is_active" = TRUE"#), "{sql}");
        assert!(sql.contains(r#""class_id" IS NOT NULL"#), "{sql}");

        let sql = partial_unique(
            UNASSIGNED_INDEX,
            &["tenant_id", "student_id", "academic_year_id"],
            false,
        )
        .to_string(SqliteQueryBuilder);
        assert!(sql.contains(r#""class_id" IS NULL"#), "{sql}");
    }
}
