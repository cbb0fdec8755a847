//! 业务数据模型
//!
//! 每个资源按 `entities`（业务实体）/ `requests`（请求体与查询参数）/
//! `responses`（响应体）划分。

pub mod academics;
pub mod assessments;
pub mod auth;
pub mod common;
pub mod enrollments;
pub mod tenants;
pub mod users;

pub use common::{ApiResponse, Page, PaginationQuery};

use serde::Serialize;

/// 业务错误码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    // 通用
    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    ValidationFailed = 1022,
    InternalServerError = 1500,

    // 认证
    AuthFailed = 2001,
    PasswordTooWeak = 2002,
    TenantMismatch = 2003,
}

/// 程序启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
