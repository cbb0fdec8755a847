use serde::Serialize;

use super::entities::{StudentProfile, User, UserDetail};

// 创建用户响应，生成的默认密码只返回这一次
#[derive(Debug, Serialize)]
pub struct CreateUserResponse {
    #[serde(flatten)]
    pub detail: UserDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_password: Option<String>,
}

// 家长名下的学生
#[derive(Debug, Serialize)]
pub struct ChildResponse {
    pub user: User,
    pub student: StudentProfile,
}
