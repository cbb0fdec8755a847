use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// 身份鉴别字段
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Admin,   // 管理员
    Teacher, // 教师
    Student, // 学生
    Parent,  // 家长
}

impl UserType {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => Self::ADMIN,
            UserType::Teacher => Self::TEACHER,
            UserType::Student => Self::STUDENT,
            UserType::Parent => Self::PARENT,
        }
    }

    pub fn admin_roles() -> &'static [&'static UserType] {
        &[&Self::Admin]
    }
    pub fn staff_roles() -> &'static [&'static UserType] {
        &[&Self::Admin, &Self::Teacher]
    }
    pub fn all_roles() -> &'static [&'static UserType] {
        &[&Self::Admin, &Self::Teacher, &Self::Student, &Self::Parent]
    }
}

impl<'de> Deserialize<'de> for UserType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户类型: '{s}'. 支持的类型: admin, teacher, student, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::ADMIN => Ok(UserType::Admin),
            Self::TEACHER => Ok(UserType::Teacher),
            Self::STUDENT => Ok(UserType::Student),
            Self::PARENT => Ok(UserType::Parent),
            _ => Err(format!("Invalid user type: {s}")),
        }
    }
}

// 基础身份
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub tenant_id: Uuid,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub user_type: UserType,
    pub is_active: bool,
    pub is_first_login: bool,
    pub password_expiry_date: Option<DateTime<Utc>>,
    pub address: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// 首次登录或密码过期时需要修改密码
    pub fn password_change_required(&self, now: DateTime<Utc>) -> bool {
        self.is_first_login
            || self
                .password_expiry_date
                .is_some_and(|expiry| expiry <= now)
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdminProfile {
    pub job_title: Option<String>,
    #[serde(default)]
    pub is_super_admin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentProfile {
    pub admission_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParentProfile {
    pub phone: Option<String>,
    pub occupation: Option<String>,
}

/// 角色扩展，标签即鉴别字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum Profile {
    Admin(AdminProfile),
    Teacher(TeacherProfile),
    Student(StudentProfile),
    Parent(ParentProfile),
}

impl Profile {
    pub fn user_type(&self) -> UserType {
        match self {
            Profile::Admin(_) => UserType::Admin,
            Profile::Teacher(_) => UserType::Teacher,
            Profile::Student(_) => UserType::Student,
            Profile::Parent(_) => UserType::Parent,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminProfilePatch {
    pub job_title: Option<String>,
    pub is_super_admin: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeacherProfilePatch {
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub hire_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentProfilePatch {
    pub admission_number: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ParentProfilePatch {
    pub phone: Option<String>,
    pub occupation: Option<String>,
}

/// 角色扩展的部分更新，种类必须与身份的鉴别字段一致
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "user_type", rename_all = "snake_case")]
pub enum ProfilePatch {
    Admin(AdminProfilePatch),
    Teacher(TeacherProfilePatch),
    Student(StudentProfilePatch),
    Parent(ParentProfilePatch),
}

impl ProfilePatch {
    pub fn user_type(&self) -> UserType {
        match self {
            ProfilePatch::Admin(_) => UserType::Admin,
            ProfilePatch::Teacher(_) => UserType::Teacher,
            ProfilePatch::Student(_) => UserType::Student,
            ProfilePatch::Parent(_) => UserType::Parent,
        }
    }
}

// 身份 + 角色扩展
#[derive(Debug, Clone, Serialize)]
pub struct UserDetail {
    pub user: User,
    pub profile: Profile,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        let now = Utc::now();
        User {
            id: 1,
            tenant_id: Uuid::new_v4(),
            email: "a@school.test".to_string(),
            password_hash: "hash".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            user_type: UserType::Teacher,
            is_active: true,
            is_first_login: false,
            password_expiry_date: None,
            address: None,
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_user_type_round_trip() {
        for role in UserType::all_roles() {
            assert_eq!(role.as_str().parse::<UserType>().unwrap(), **role);
        }
        assert!("janitor".parse::<UserType>().is_err());
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["user_type"], "teacher");
    }

    #[test]
    fn test_password_change_required() {
        let now = Utc::now();
        let mut user = sample_user();
        assert!(!user.password_change_required(now));

        user.password_expiry_date = Some(now - chrono::Duration::days(1));
        assert!(user.password_change_required(now));

        user.password_expiry_date = Some(now + chrono::Duration::days(1));
        assert!(!user.password_change_required(now));

        user.is_first_login = true;
        assert!(user.password_change_required(now));
    }

    #[test]
    fn test_profile_is_tagged_by_user_type() {
        let profile: Profile = serde_json::from_str(
            r#"{"user_type": "student", "admission_number": "S-001"}"#,
        )
        .unwrap();
        assert_eq!(profile.user_type(), UserType::Student);
        assert_eq!(
            profile,
            Profile::Student(StudentProfile {
                admission_number: Some("S-001".to_string()),
                date_of_birth: None,
            })
        );

        let patch: ProfilePatch =
            serde_json::from_str(r#"{"user_type": "parent", "phone": "123"}"#).unwrap();
        assert_eq!(patch.user_type(), UserType::Parent);
    }
}
