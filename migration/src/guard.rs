//! 幂等的结构变更辅助函数
//!
//! 部署流水线可能重试迁移，因此每个新增/删除操作都先探测当前结构，
//! 已经处于目标状态时直接跳过，重复执行不会报 "duplicate column" 之类的错误。
//!
//! 新增列只能通过 [`AdditiveColumn`] 构造：要么可空，要么带数据库层默认值，
//! 旧数据由数据库默认值填充，不做应用层回填。

use sea_orm_migration::prelude::*;
use tracing::{debug, info};

/// 可安全追加到已有表上的列定义
#[derive(Debug, Clone)]
pub struct AdditiveColumn {
    name: &'static str,
    def: ColumnDef,
}

impl AdditiveColumn {
    /// 可空字符串列
    pub fn nullable_string(name: &'static str) -> Self {
        Self {
            name,
            def: ColumnDef::new(Alias::new(name)).string().null().to_owned(),
        }
    }

    /// 可空长文本列
    pub fn nullable_text(name: &'static str) -> Self {
        Self {
            name,
            def: ColumnDef::new(Alias::new(name)).text().null().to_owned(),
        }
    }

    /// 可空时间戳列（Unix 秒）
    pub fn nullable_timestamp(name: &'static str) -> Self {
        Self {
            name,
            def: ColumnDef::new(Alias::new(name))
                .big_integer()
                .null()
                .to_owned(),
        }
    }

    /// 布尔标记列，旧行取数据库默认值
    pub fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            def: ColumnDef::new(Alias::new(name))
                .boolean()
                .not_null()
                .default(default)
                .to_owned(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// 列不存在时才新增，返回是否实际执行
pub async fn add_column_if_missing(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &AdditiveColumn,
) -> Result<bool, DbErr> {
    if manager.has_column(table, column.name).await? {
        debug!("Column {}.{} already exists, skipping", table, column.name);
        return Ok(false);
    }

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .add_column(column.def.clone())
                .to_owned(),
        )
        .await?;

    info!("Added column {}.{}", table, column.name);
    Ok(true)
}

/// 列存在时才删除，返回是否实际执行
pub async fn drop_column_if_exists(
    manager: &SchemaManager<'_>,
    table: &str,
    column: &str,
) -> Result<bool, DbErr> {
    if !manager.has_column(table, column).await? {
        debug!("Column {}.{} does not exist, skipping drop", table, column);
        return Ok(false);
    }

    manager
        .alter_table(
            Table::alter()
                .table(Alias::new(table))
                .drop_column(Alias::new(column))
                .to_owned(),
        )
        .await?;

    info!("Dropped column {}.{}", table, column);
    Ok(true)
}

/// 索引不存在时才创建
pub async fn create_index_if_missing(
    manager: &SchemaManager<'_>,
    table: &str,
    name: &str,
    columns: &[&str],
    unique: bool,
) -> Result<bool, DbErr> {
    if manager.has_index(table, name).await? {
        debug!("Index {} on {} already exists, skipping", name, table);
        return Ok(false);
    }

    let mut index = Index::create();
    index.name(name).table(Alias::new(table));
    for column in columns {
        index.col(Alias::new(*column));
    }
    if unique {
        index.unique();
    }

    manager.create_index(index.to_owned()).await?;

    info!("Created index {} on {}", name, table);
    Ok(true)
}

/// 索引存在时才删除
pub async fn drop_index_if_exists(
    manager: &SchemaManager<'_>,
    table: &str,
    name: &str,
) -> Result<bool, DbErr> {
    if !manager.has_index(table, name).await? {
        debug!("Index {} on {} does not exist, skipping drop", name, table);
        return Ok(false);
    }

    manager
        .drop_index(
            Index::drop()
                .name(name)
                .table(Alias::new(table))
                .to_owned(),
        )
        .await?;

    info!("Dropped index {} on {}", name, table);
    Ok(true)
}
