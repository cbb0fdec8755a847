use serde::Deserialize;

use super::entities::{Profile, ProfilePatch, UserType};
use crate::errors::{EduHubError, Result};
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_opt_bool;
use crate::utils::validate::{validate_email, validate_name};

const NAME_MAX: usize = 100;

// 用户查询参数（来自HTTP请求）
#[derive(Debug, Clone, Deserialize)]
pub struct UserListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub user_type: Option<UserType>,
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub is_active: Option<bool>,
}

// 用户创建请求，鉴别字段来自 profile 的标签
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// 为空时生成默认密码并在响应中返回一次
    pub password: Option<String>,
    pub address: Option<String>,
    pub profile: Profile,
}

impl CreateUserRequest {
    pub fn validate(&self) -> Result<()> {
        validate_email(&self.email).map_err(EduHubError::validation)?;
        validate_name("first_name", &self.first_name, NAME_MAX).map_err(EduHubError::validation)?;
        validate_name("last_name", &self.last_name, NAME_MAX).map_err(EduHubError::validation)?;
        Ok(())
    }

    pub fn user_type(&self) -> UserType {
        self.profile.user_type()
    }
}

// 用户更新请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub is_active: Option<bool>,
    pub profile: Option<ProfilePatch>,
}

impl UpdateUserRequest {
    /// `user_type` 为被修改身份当前的鉴别字段
    pub fn validate(&self, user_type: &UserType) -> Result<()> {
        if let Some(email) = &self.email {
            validate_email(email).map_err(EduHubError::validation)?;
        }
        if let Some(first_name) = &self.first_name {
            validate_name("first_name", first_name, NAME_MAX).map_err(EduHubError::validation)?;
        }
        if let Some(last_name) = &self.last_name {
            validate_name("last_name", last_name, NAME_MAX).map_err(EduHubError::validation)?;
        }
        if let Some(patch) = &self.profile
            && patch.user_type() != *user_type
        {
            return Err(EduHubError::validation(format!(
                "Cannot apply a {} profile to a {} user",
                patch.user_type(),
                user_type
            )));
        }
        Ok(())
    }
}

// 关联子女请求
#[derive(Debug, Clone, Deserialize)]
pub struct LinkChildRequest {
    pub student_id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::TeacherProfilePatch;

    #[test]
    fn test_create_request_validation() {
        let req: CreateUserRequest = serde_json::from_str(
            r#"{"email": "t@school.test", "first_name": "Tom", "last_name": "Lee",
                "profile": {"user_type": "teacher", "department": "Science"}}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert_eq!(req.user_type(), UserType::Teacher);

        let bad = CreateUserRequest {
            email: "not-an-email".to_string(),
            ..req
        };
        assert!(matches!(bad.validate(), Err(EduHubError::Validation(_))));
    }

    #[test]
    fn test_profile_patch_kind_must_match() {
        let req = UpdateUserRequest {
            profile: Some(ProfilePatch::Teacher(TeacherProfilePatch::default())),
            ..Default::default()
        };
        assert!(req.validate(&UserType::Teacher).is_ok());
        assert!(matches!(
            req.validate(&UserType::Student),
            Err(EduHubError::Validation(_))
        ));
    }
}
