//! 枚举类型扩值
//!
//! PostgreSQL 不允许在多语句事务中使用新加入的枚举值，而迁移链在 PostgreSQL 上
//! 是按事务执行的，所以扩值不作为 `MigrationTrait` 步骤，而是在迁移链完成后
//! 用普通连接（自动提交）逐条执行。
//!
//! 扩值只能前进：删除枚举值需要重建类型，属于破坏性迁移，
//! 因此回滚操作是有意为之的空操作。

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend};
use tracing::{debug, info, warn};

/// 一次枚举扩值声明
#[derive(Debug, Clone, Copy)]
pub struct EnumExtension {
    /// 数据库中的枚举类型名
    pub type_name: &'static str,
    /// 创建该类型的迁移（前驱步骤）
    pub after: &'static str,
    /// 追加的枚举值，只追加不删除
    pub values: &'static [&'static str],
}

pub const ENUM_EXTENSIONS: &[EnumExtension] = &[EnumExtension {
    type_name: "gradetype",
    after: "m20250123_000001_create_tables",
    values: &["ATTENDANCE", "PARTICIPATION", "OTHER"],
}];

fn is_safe_label(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

fn is_safe_type_name(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

impl EnumExtension {
    /// 生成扩值语句；值已存在时数据库直接跳过
    pub fn statements(&self) -> Result<Vec<String>, DbErr> {
        if !is_safe_type_name(self.type_name) {
            return Err(DbErr::Migration(format!(
                "Invalid enum type name: {}",
                self.type_name
            )));
        }

        self.values
            .iter()
            .map(|value| {
                if is_safe_label(value) {
                    Ok(format!(
                        "ALTER TYPE {} ADD VALUE IF NOT EXISTS '{}'",
                        self.type_name, value
                    ))
                } else {
                    Err(DbErr::Migration(format!(
                        "Invalid enum label for {}: {}",
                        self.type_name, value
                    )))
                }
            })
            .collect()
    }

    /// 回滚：枚举值无法在不重建类型的情况下删除，这里不做任何事
    pub fn revert(&self) {
        warn!(
            "Enum values {:?} of type {} are not removed on rollback; dropping them requires rebuilding the type",
            self.values, self.type_name
        );
    }
}

/// 执行所有扩值声明，返回执行的语句数
///
/// 只接受 `DatabaseConnection`，事务句柄无法传入。
/// 非 PostgreSQL 后端以字符串存储枚举，无需扩值。
pub async fn apply_enum_extensions(db: &DatabaseConnection) -> Result<usize, DbErr> {
    if db.get_database_backend() != DbBackend::Postgres {
        debug!("Enum columns are stored as text on this backend, skipping enum extensions");
        return Ok(0);
    }

    let mut executed = 0;
    for extension in ENUM_EXTENSIONS {
        for sql in extension.statements()? {
            db.execute_unprepared(&sql).await?;
            executed += 1;
        }
        info!(
            "Enum type {} extended with {:?}",
            extension.type_name, extension.values
        );
    }

    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statements_use_if_not_exists() {
        let statements = ENUM_EXTENSIONS[0].statements().unwrap();
        assert_eq!(statements.len(), 3);
        assert_eq!(
            statements[0],
            "ALTER TYPE gradetype ADD VALUE IF NOT EXISTS 'ATTENDANCE'"
        );
        assert!(statements.iter().all(|s| s.contains("IF NOT EXISTS")));
    }

    #[test]
    fn test_rejects_unsafe_labels() {
        let bad = EnumExtension {
            type_name: "gradetype",
            after: "m20250123_000001_create_tables",
            values: &["OK", "x'); DROP TABLE users; --"],
        };
        assert!(bad.statements().is_err());

        let bad_type = EnumExtension {
            type_name: "GradeType;",
            after: "m20250123_000001_create_tables",
            values: &["OK"],
        };
        assert!(bad_type.statements().is_err());
    }
}
