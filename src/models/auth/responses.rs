use serde::Serialize;

use crate::models::users::entities::{User, UserDetail};

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub user: User,
    pub password_change_required: bool,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    #[serde(flatten)]
    pub detail: UserDetail,
    pub password_change_required: bool,
}
