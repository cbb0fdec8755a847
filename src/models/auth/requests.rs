use serde::Deserialize;

// 登录请求（来自HTTP请求）
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// 租户 ID，接受带连字符、无连字符、花括号与 URN 形式
    pub tenant_id: String,
    pub email: String,
    pub password: String,
}

// 修改密码请求
#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}
