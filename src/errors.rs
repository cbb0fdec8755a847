//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。
//! 错误同时实现 `ResponseError`，服务层可以直接用 `?` 向上传播。

use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sea_orm::{DbErr, SqlErr};
use tracing::error;

use crate::models::{ApiResponse, ErrorCode};

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_eduhub_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum EduHubError {
            $($variant(String),)*
        }

        impl EduHubError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(EduHubError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(EduHubError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(EduHubError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl EduHubError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        EduHubError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_eduhub_errors! {
    DatabaseConfig("E001", "Database Configuration Error"),
    DatabaseConnection("E002", "Database Connection Error"),
    DatabaseOperation("E003", "Database Operation Error"),
    Migration("E004", "Migration Error"),
    Validation("E005", "Validation Error"),
    NotFound("E006", "Resource Not Found"),
    PermissionDenied("E007", "Permission Denied"),
    Conflict("E008", "Conflict"),
    Authentication("E009", "Authentication Error"),
    Serialization("E010", "Serialization Error"),
    DateParse("E011", "Date Parse Error"),
    PasswordHash("E012", "Password Hash Error"),
    Internal("E013", "Internal Error"),
}

impl EduHubError {
    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }

    /// 对应的 API 业务码
    pub fn api_code(&self) -> ErrorCode {
        match self {
            EduHubError::Validation(_) => ErrorCode::ValidationFailed,
            EduHubError::NotFound(_) => ErrorCode::NotFound,
            EduHubError::PermissionDenied(_) => ErrorCode::Forbidden,
            EduHubError::Conflict(_) => ErrorCode::Conflict,
            EduHubError::Authentication(_) => ErrorCode::Unauthorized,
            _ => ErrorCode::InternalServerError,
        }
    }

    /// 带上下文转换数据库错误，约束冲突仍归为 Conflict / Validation
    pub fn from_db(context: &str, err: DbErr) -> Self {
        match EduHubError::from(err) {
            EduHubError::DatabaseOperation(msg) => {
                EduHubError::DatabaseOperation(format!("{context}: {msg}"))
            }
            other => other,
        }
    }

    /// 是否为服务端内部错误（细节不返回给客户端）
    pub fn is_internal(&self) -> bool {
        self.api_code() == ErrorCode::InternalServerError
    }
}

impl fmt::Display for EduHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for EduHubError {}

impl ResponseError for EduHubError {
    fn status_code(&self) -> StatusCode {
        match self {
            EduHubError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            EduHubError::NotFound(_) => StatusCode::NOT_FOUND,
            EduHubError::PermissionDenied(_) => StatusCode::FORBIDDEN,
            EduHubError::Conflict(_) => StatusCode::CONFLICT,
            EduHubError::Authentication(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = if self.is_internal() {
            error!("{}", self.format_simple());
            "Internal server error".to_string()
        } else {
            self.message().to_string()
        };

        HttpResponse::build(self.status_code())
            .json(ApiResponse::error_empty(self.api_code(), message))
    }
}

// 为常见的错误类型实现 From trait
impl From<DbErr> for EduHubError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                EduHubError::Conflict(format!("Resource already exists: {detail}"))
            }
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                EduHubError::Validation(format!("Referenced resource is invalid: {detail}"))
            }
            _ => EduHubError::DatabaseOperation(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for EduHubError {
    fn from(err: serde_json::Error) -> Self {
        EduHubError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for EduHubError {
    fn from(err: chrono::ParseError) -> Self {
        EduHubError::DateParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EduHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(EduHubError::database_config("test").code(), "E001");
        assert_eq!(EduHubError::validation("test").code(), "E005");
        assert_eq!(EduHubError::conflict("test").code(), "E008");
        assert_eq!(EduHubError::password_hash("test").code(), "E012");
    }

    #[test]
    fn test_error_types() {
        assert_eq!(
            EduHubError::permission_denied("test").error_type(),
            "Permission Denied"
        );
        assert_eq!(
            EduHubError::validation("test").error_type(),
            "Validation Error"
        );
    }

    #[test]
    fn test_error_message() {
        let err = EduHubError::validation("Invalid input");
        assert_eq!(err.message(), "Invalid input");
    }

    #[test]
    fn test_format_simple() {
        let err = EduHubError::not_found("Subject not found");
        let formatted = err.format_simple();
        assert!(formatted.contains("Resource Not Found"));
        assert!(formatted.contains("Subject not found"));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            EduHubError::not_found("x").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            EduHubError::permission_denied("x").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            EduHubError::validation("x").status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(EduHubError::conflict("x").status_code(), StatusCode::CONFLICT);
        assert_eq!(
            EduHubError::migration("x").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_generic_db_error_is_operation_error() {
        let err: EduHubError = DbErr::Custom("boom".to_string()).into();
        assert!(matches!(err, EduHubError::DatabaseOperation(_)));
        assert!(err.is_internal());

        let err = EduHubError::from_db("查询科目失败", DbErr::Custom("boom".to_string()));
        assert!(err.message().starts_with("查询科目失败"));
    }
}
