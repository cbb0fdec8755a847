//! 数据库枚举类型

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 测评类别
///
/// PostgreSQL 上对应 `gradetype` 枚举类型，只能追加取值。
/// ATTENDANCE / PARTICIPATION / OTHER 由迁移之后的枚举扩值加入。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "gradetype")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GradeType {
    #[sea_orm(string_value = "EXAM")]
    Exam,
    #[sea_orm(string_value = "QUIZ")]
    Quiz,
    #[sea_orm(string_value = "HOMEWORK")]
    Homework,
    #[sea_orm(string_value = "PROJECT")]
    Project,
    #[sea_orm(string_value = "ATTENDANCE")]
    Attendance,
    #[sea_orm(string_value = "PARTICIPATION")]
    Participation,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_wire_names_match_database_labels() {
        for grade_type in GradeType::iter() {
            let json = serde_json::to_string(&grade_type).unwrap();
            assert_eq!(json.trim_matches('"'), grade_type.to_value());
        }
    }

    #[test]
    fn test_extension_values_are_declared() {
        let labels: Vec<String> = GradeType::iter().map(|g| g.to_value()).collect();
        for extension in migration::ENUM_EXTENSIONS {
            for value in extension.values {
                assert!(labels.iter().any(|l| l == value), "missing {value}");
            }
        }
    }
}
