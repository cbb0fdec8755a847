//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。
//! 每个带 `tenant_id` 的实体都实现 [`crate::tenancy::TenantScoped`]。

pub mod prelude;
pub mod sea_orm_active_enums;

pub mod academic_years;
pub mod admins;
pub mod assessments;
pub mod classes;
pub mod enrollments;
pub mod grades;
pub mod notification_configs;
pub mod parent_students;
pub mod parents;
pub mod sections;
pub mod students;
pub mod subjects;
pub mod submissions;
pub mod teachers;
pub mod tenants;
pub mod users;

use chrono::{DateTime, Utc};

/// Unix 秒转换为 UTC 时间
pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
