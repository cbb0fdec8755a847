//! 用户存储操作
//!
//! 基础身份与角色扩展分表存储，`users.user_type` 决定读取哪张扩展表。

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::{SeaOrmStorage, fetch_page, now_ts};
use crate::entity::{admins, parent_students, parents, students, teachers, users};
use crate::errors::{EduHubError, Result};
use crate::models::{
    Page,
    users::{
        entities::{Profile, ProfilePatch, User, UserDetail, UserType},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::ChildResponse,
    },
};
use crate::tenancy::{
    scoped_delete, scoped_find, scoped_lookup, scoped_mutate, scoped_reference, scoped_select,
};
use crate::utils::contains_pattern;

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// 插入基础身份与唯一的角色扩展行，调用方负责事务
pub(super) async fn insert_user_with_profile<C>(
    db: &C,
    tenant_id: Uuid,
    req: CreateUserRequest,
    password_hash: String,
) -> Result<UserDetail>
where
    C: ConnectionTrait,
{
    let now = now_ts();
    let user_type = req.user_type();

    let user = users::ActiveModel {
        tenant_id: Set(tenant_id),
        email: Set(normalize_email(&req.email)),
        password_hash: Set(password_hash),
        first_name: Set(req.first_name.trim().to_string()),
        last_name: Set(req.last_name.trim().to_string()),
        user_type: Set(user_type.to_string()),
        is_active: Set(true),
        is_first_login: Set(true),
        password_expiry_date: Set(None),
        address: Set(req.address),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(|e| EduHubError::from_db("创建用户失败", e))?;

    insert_profile(db, tenant_id, &user, &req.profile).await?;

    info!("用户已创建: {} ({}) 租户 {}", user.id, user_type, tenant_id);
    Ok(UserDetail {
        user: user.into_user(),
        profile: req.profile,
    })
}

async fn insert_profile<C>(
    db: &C,
    tenant_id: Uuid,
    user: &users::Model,
    profile: &Profile,
) -> Result<()>
where
    C: ConnectionTrait,
{
    let result = match profile {
        Profile::Admin(p) => {
            admins::Entity::insert(admins::ActiveModel {
                user_id: Set(user.id),
                tenant_id: Set(tenant_id),
                job_title: Set(p.job_title.clone()),
                is_super_admin: Set(p.is_super_admin),
            })
            .exec_without_returning(db)
            .await
        }
        Profile::Teacher(p) => {
            teachers::Entity::insert(teachers::ActiveModel {
                user_id: Set(user.id),
                tenant_id: Set(tenant_id),
                email: Set(user.email.clone()),
                department: Set(p.department.clone()),
                qualification: Set(p.qualification.clone()),
                hire_date: Set(p.hire_date),
            })
            .exec_without_returning(db)
            .await
        }
        Profile::Student(p) => {
            students::Entity::insert(students::ActiveModel {
                user_id: Set(user.id),
                tenant_id: Set(tenant_id),
                admission_number: Set(p.admission_number.clone()),
                date_of_birth: Set(p.date_of_birth),
            })
            .exec_without_returning(db)
            .await
        }
        Profile::Parent(p) => {
            parents::Entity::insert(parents::ActiveModel {
                user_id: Set(user.id),
                tenant_id: Set(tenant_id),
                phone: Set(p.phone.clone()),
                occupation: Set(p.occupation.clone()),
            })
            .exec_without_returning(db)
            .await
        }
    };

    result.map_err(|e| EduHubError::from_db("创建角色扩展失败", e))?;
    Ok(())
}

/// 按鉴别字段读取对应的扩展行，缺失属于数据完整性错误
async fn load_profile<C>(db: &C, tenant_id: Uuid, user: &users::Model) -> Result<Profile>
where
    C: ConnectionTrait,
{
    let user_type = user.user_type.parse::<UserType>().map_err(|e| {
        EduHubError::database_operation(format!("用户 {} 鉴别字段无效: {e}", user.id))
    })?;

    let profile = match user_type {
        UserType::Admin => scoped_find::<admins::Entity, C>(db, tenant_id, user.id)
            .await?
            .map(|m| Profile::Admin(m.into_profile())),
        UserType::Teacher => scoped_find::<teachers::Entity, C>(db, tenant_id, user.id)
            .await?
            .map(|m| Profile::Teacher(m.into_profile())),
        UserType::Student => scoped_find::<students::Entity, C>(db, tenant_id, user.id)
            .await?
            .map(|m| Profile::Student(m.into_profile())),
        UserType::Parent => scoped_find::<parents::Entity, C>(db, tenant_id, user.id)
            .await?
            .map(|m| Profile::Parent(m.into_profile())),
    };

    profile.ok_or_else(|| {
        EduHubError::database_operation(format!(
            "用户 {} 缺少 {} 扩展记录",
            user.id, user.user_type
        ))
    })
}

/// 在同种扩展行上应用部分更新
async fn apply_profile_patch<C>(
    db: &C,
    tenant_id: Uuid,
    user_id: i64,
    patch: ProfilePatch,
) -> Result<()>
where
    C: ConnectionTrait,
{
    match patch {
        ProfilePatch::Admin(p) => {
            scoped_mutate::<admins::Entity, C, _>(db, tenant_id, user_id, |_, active| {
                if let Some(job_title) = p.job_title {
                    active.job_title = Set(Some(job_title));
                }
                if let Some(is_super_admin) = p.is_super_admin {
                    active.is_super_admin = Set(is_super_admin);
                }
                Ok(())
            })
            .await?;
        }
        ProfilePatch::Teacher(p) => {
            scoped_mutate::<teachers::Entity, C, _>(db, tenant_id, user_id, |_, active| {
                if let Some(department) = p.department {
                    active.department = Set(Some(department));
                }
                if let Some(qualification) = p.qualification {
                    active.qualification = Set(Some(qualification));
                }
                if let Some(hire_date) = p.hire_date {
                    active.hire_date = Set(Some(hire_date));
                }
                Ok(())
            })
            .await?;
        }
        ProfilePatch::Student(p) => {
            scoped_mutate::<students::Entity, C, _>(db, tenant_id, user_id, |_, active| {
                if let Some(admission_number) = p.admission_number {
                    active.admission_number = Set(Some(admission_number));
                }
                if let Some(date_of_birth) = p.date_of_birth {
                    active.date_of_birth = Set(Some(date_of_birth));
                }
                Ok(())
            })
            .await?;
        }
        ProfilePatch::Parent(p) => {
            scoped_mutate::<parents::Entity, C, _>(db, tenant_id, user_id, |_, active| {
                if let Some(phone) = p.phone {
                    active.phone = Set(Some(phone));
                }
                if let Some(occupation) = p.occupation {
                    active.occupation = Set(Some(occupation));
                }
                Ok(())
            })
            .await?;
        }
    }
    Ok(())
}

impl SeaOrmStorage {
    /// 创建身份与角色扩展
    pub async fn create_user_impl(
        &self,
        tenant_id: Uuid,
        req: CreateUserRequest,
        password_hash: String,
    ) -> Result<UserDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        let detail = insert_user_with_profile(&txn, tenant_id, req, password_hash).await?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        Ok(detail)
    }

    pub async fn get_user_impl(&self, tenant_id: Uuid, id: i64) -> Result<User> {
        Ok(scoped_lookup::<users::Entity, _>(&self.db, tenant_id, id)
            .await?
            .into_user())
    }

    pub async fn get_user_detail_impl(&self, tenant_id: Uuid, id: i64) -> Result<UserDetail> {
        let user = scoped_lookup::<users::Entity, _>(&self.db, tenant_id, id).await?;
        let profile = load_profile(&self.db, tenant_id, &user).await?;
        Ok(UserDetail {
            user: user.into_user(),
            profile,
        })
    }

    pub async fn get_user_by_email_impl(
        &self,
        tenant_id: Uuid,
        email: &str,
    ) -> Result<Option<User>> {
        let result = scoped_select::<users::Entity>(tenant_id)
            .filter(users::Column::Email.eq(normalize_email(email)))
            .one(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询用户失败", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_impl(
        &self,
        tenant_id: Uuid,
        params: UserListParams,
    ) -> Result<Page<User>> {
        let mut select = scoped_select::<users::Entity>(tenant_id);

        if let Some(user_type) = &params.user_type {
            select = select.filter(users::Column::UserType.eq(user_type.as_str()));
        }

        if let Some(is_active) = params.is_active {
            select = select.filter(users::Column::IsActive.eq(is_active));
        }

        // 搜索条件
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            let pattern = contains_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(users::Column::Email.like(pattern.clone()))
                    .add(users::Column::FirstName.like(pattern.clone()))
                    .add(users::Column::LastName.like(pattern)),
            );
        }

        select = select.order_by_asc(users::Column::Id);

        fetch_page(&self.db, select, &params.pagination, "用户", |m| {
            m.into_user()
        })
        .await
    }

    /// 部分更新身份与同种扩展，鉴别字段不可变
    pub async fn update_user_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<UserDetail> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        let patch_type = update.profile.as_ref().map(|p| p.user_type());
        let new_email = update.email.as_deref().map(normalize_email);
        let email_for_user = new_email.clone();

        let user = scoped_mutate::<users::Entity, _, _>(&txn, tenant_id, id, |current, active| {
            if let Some(patch_type) = &patch_type
                && patch_type.as_str() != current.user_type
            {
                return Err(EduHubError::validation(format!(
                    "Cannot apply a {} profile to a {} user",
                    patch_type, current.user_type
                )));
            }
            if let Some(email) = email_for_user {
                active.email = Set(email);
            }
            if let Some(first_name) = update.first_name {
                active.first_name = Set(first_name.trim().to_string());
            }
            if let Some(last_name) = update.last_name {
                active.last_name = Set(last_name.trim().to_string());
            }
            if let Some(address) = update.address {
                active.address = Set(Some(address));
            }
            if let Some(is_active) = update.is_active {
                active.is_active = Set(is_active);
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        // 教师邮箱冗余存储在扩展表上
        if let Some(email) = new_email
            && user.user_type == UserType::TEACHER
        {
            scoped_mutate::<teachers::Entity, _, _>(&txn, tenant_id, id, |_, active| {
                active.email = Set(email);
                Ok(())
            })
            .await?;
        }

        if let Some(patch) = update.profile {
            apply_profile_patch(&txn, tenant_id, id, patch).await?;
        }

        let profile = load_profile(&txn, tenant_id, &user).await?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        Ok(UserDetail {
            user: user.into_user(),
            profile,
        })
    }

    /// 硬删除，扩展行与家长关联随外键级联删除
    pub async fn delete_user_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<users::Entity, _>(&self.db, tenant_id, id).await?;
        info!("用户已删除: {} 租户 {}", id, tenant_id);
        Ok(())
    }

    pub async fn update_password_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        password_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<User> {
        let user = scoped_mutate::<users::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            active.password_hash = Set(password_hash);
            active.is_first_login = Set(false);
            active.password_expiry_date = Set(Some(expires_at.timestamp()));
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(user.into_user())
    }

    pub async fn update_last_login_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_mutate::<users::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            active.last_login = Set(Some(now_ts()));
            Ok(())
        })
        .await?;
        Ok(())
    }

    /// 关联家长与学生，两者必须属于同一租户
    pub async fn link_child_impl(
        &self,
        tenant_id: Uuid,
        parent_id: i64,
        student_id: i64,
    ) -> Result<()> {
        scoped_lookup::<parents::Entity, _>(&self.db, tenant_id, parent_id).await?;
        scoped_reference::<students::Entity, _>(&self.db, tenant_id, student_id).await?;

        if self
            .is_parent_of_impl(tenant_id, parent_id, student_id)
            .await?
        {
            return Err(EduHubError::conflict(
                "Student is already linked to this parent",
            ));
        }

        parent_students::Entity::insert(parent_students::ActiveModel {
            parent_id: Set(parent_id),
            student_id: Set(student_id),
            tenant_id: Set(tenant_id),
            created_at: Set(now_ts()),
        })
        .exec_without_returning(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("关联学生失败", e))?;

        Ok(())
    }

    pub async fn unlink_child_impl(
        &self,
        tenant_id: Uuid,
        parent_id: i64,
        student_id: i64,
    ) -> Result<()> {
        scoped_lookup::<parents::Entity, _>(&self.db, tenant_id, parent_id).await?;

        let result = parent_students::Entity::delete_many()
            .filter(parent_students::Column::TenantId.eq(tenant_id))
            .filter(parent_students::Column::ParentId.eq(parent_id))
            .filter(parent_students::Column::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("解除关联失败", e))?;

        if result.rows_affected == 0 {
            return Err(EduHubError::not_found("Link not found"));
        }
        Ok(())
    }

    pub async fn list_children_impl(
        &self,
        tenant_id: Uuid,
        parent_id: i64,
    ) -> Result<Vec<ChildResponse>> {
        scoped_lookup::<parents::Entity, _>(&self.db, tenant_id, parent_id).await?;

        let student_ids: Vec<i64> = parent_students::Entity::find()
            .filter(parent_students::Column::TenantId.eq(tenant_id))
            .filter(parent_students::Column::ParentId.eq(parent_id))
            .all(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询关联学生失败", e))?
            .into_iter()
            .map(|link| link.student_id)
            .collect();

        if student_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut profiles: HashMap<i64, students::Model> =
            scoped_select::<students::Entity>(tenant_id)
                .filter(students::Column::UserId.is_in(student_ids.clone()))
                .all(&self.db)
                .await
                .map_err(|e| EduHubError::from_db("查询学生失败", e))?
                .into_iter()
                .map(|s| (s.user_id, s))
                .collect();

        let users = scoped_select::<users::Entity>(tenant_id)
            .filter(users::Column::Id.is_in(student_ids))
            .order_by_asc(users::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询学生失败", e))?;

        Ok(users
            .into_iter()
            .filter_map(|user| {
                profiles.remove(&user.id).map(|student| ChildResponse {
                    user: user.into_user(),
                    student: student.into_profile(),
                })
            })
            .collect())
    }

    pub async fn is_parent_of_impl(
        &self,
        tenant_id: Uuid,
        parent_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        let count = parent_students::Entity::find()
            .filter(parent_students::Column::TenantId.eq(tenant_id))
            .filter(parent_students::Column::ParentId.eq(parent_id))
            .filter(parent_students::Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询家长关联失败", e))?;

        Ok(count > 0)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::tenants::requests::ProvisionTenantRequest;
    use crate::models::users::entities::{
        ParentProfile, StudentProfile, StudentProfilePatch, TeacherProfile,
    };

    /// 开通一个测试租户，返回 (租户 ID, 管理员 ID)
    pub(crate) async fn provision(storage: &SeaOrmStorage, subdomain: &str) -> (Uuid, i64) {
        let (tenant, admin) = storage
            .provision_tenant_impl(
                ProvisionTenantRequest {
                    name: format!("School {subdomain}"),
                    subdomain: Some(subdomain.to_string()),
                    admin_email: format!("admin@{subdomain}.test"),
                    admin_first_name: "Ada".to_string(),
                    admin_last_name: "Admin".to_string(),
                },
                "hash".to_string(),
            )
            .await
            .unwrap();
        (tenant.id, admin.id)
    }

    pub(crate) fn user_request(email: &str, profile: Profile) -> CreateUserRequest {
        CreateUserRequest {
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            password: None,
            address: None,
            profile,
        }
    }

    pub(crate) async fn create_student(storage: &SeaOrmStorage, tenant_id: Uuid, email: &str) -> i64 {
        storage
            .create_user_impl(
                tenant_id,
                user_request(email, Profile::Student(StudentProfile::default())),
                "hash".to_string(),
            )
            .await
            .unwrap()
            .user
            .id
    }

    pub(crate) async fn create_teacher(storage: &SeaOrmStorage, tenant_id: Uuid, email: &str) -> i64 {
        storage
            .create_user_impl(
                tenant_id,
                user_request(email, Profile::Teacher(TeacherProfile::default())),
                "hash".to_string(),
            )
            .await
            .unwrap()
            .user
            .id
    }

    async fn create_parent(storage: &SeaOrmStorage, tenant_id: Uuid, email: &str) -> i64 {
        storage
            .create_user_impl(
                tenant_id,
                user_request(email, Profile::Parent(ParentProfile::default())),
                "hash".to_string(),
            )
            .await
            .unwrap()
            .user
            .id
    }

    #[tokio::test]
    async fn test_create_and_load_specialization() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;

        let created = storage
            .create_user_impl(
                tenant,
                user_request(
                    " Teacher@North.Test ",
                    Profile::Teacher(TeacherProfile {
                        department: Some("Science".to_string()),
                        ..Default::default()
                    }),
                ),
                "hash".to_string(),
            )
            .await
            .unwrap();
        assert_eq!(created.user.email, "teacher@north.test");
        assert_eq!(created.user.user_type, UserType::Teacher);

        let loaded = storage
            .get_user_detail_impl(tenant, created.user.id)
            .await
            .unwrap();
        assert_eq!(
            loaded.profile,
            Profile::Teacher(TeacherProfile {
                department: Some("Science".to_string()),
                ..Default::default()
            })
        );

        let by_email = storage
            .get_user_by_email_impl(tenant, "TEACHER@north.test")
            .await
            .unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(created.user.id));
    }

    #[tokio::test]
    async fn test_email_unique_per_tenant_only() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;

        create_teacher(&storage, tenant_a, "t@shared.test").await;
        create_teacher(&storage, tenant_b, "t@shared.test").await;

        let err = storage
            .create_user_impl(
                tenant_a,
                user_request("t@shared.test", Profile::Student(StudentProfile::default())),
                "hash".to_string(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        // 失败的创建不会留下基础身份
        let page = storage
            .list_users_impl(
                tenant_a,
                UserListParams {
                    pagination: PaginationQuery::default(),
                    user_type: Some(UserType::Student),
                    search: None,
                    is_active: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }

    #[tokio::test]
    async fn test_users_are_invisible_across_tenants() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;
        let student = create_student(&storage, tenant_a, "s@alpha.test").await;

        let err = storage.get_user_impl(tenant_b, student).await.unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));

        let err = storage
            .update_user_impl(
                tenant_b,
                student,
                UpdateUserRequest {
                    first_name: Some("Hacked".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));

        let err = storage.delete_user_impl(tenant_b, student).await.unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));

        assert_eq!(
            storage.get_user_impl(tenant_a, student).await.unwrap().first_name,
            "Test"
        );
    }

    #[tokio::test]
    async fn test_update_patches_profile_of_same_kind() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let student = create_student(&storage, tenant, "s@north.test").await;

        let updated = storage
            .update_user_impl(
                tenant,
                student,
                UpdateUserRequest {
                    last_name: Some("Updated".to_string()),
                    profile: Some(ProfilePatch::Student(StudentProfilePatch {
                        admission_number: Some("A-7".to_string()),
                        date_of_birth: None,
                    })),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.user.last_name, "Updated");
        assert_eq!(
            updated.profile,
            Profile::Student(StudentProfile {
                admission_number: Some("A-7".to_string()),
                date_of_birth: None,
            })
        );

        let err = storage
            .update_user_impl(
                tenant,
                student,
                UpdateUserRequest {
                    last_name: Some("Nope".to_string()),
                    profile: Some(ProfilePatch::Parent(Default::default())),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
        assert_eq!(
            storage.get_user_impl(tenant, student).await.unwrap().last_name,
            "Updated"
        );
    }

    #[tokio::test]
    async fn test_teacher_email_follows_identity() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let teacher = create_teacher(&storage, tenant, "old@north.test").await;

        storage
            .update_user_impl(
                tenant,
                teacher,
                UpdateUserRequest {
                    email: Some("new@north.test".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let row = scoped_lookup::<teachers::Entity, _>(&storage.db, tenant, teacher)
            .await
            .unwrap();
        assert_eq!(row.email, "new@north.test");
    }

    #[tokio::test]
    async fn test_password_update_clears_first_login() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, admin) = provision(&storage, "north").await;
        let expires = Utc::now() + chrono::Duration::days(90);

        let user = storage
            .update_password_impl(tenant, admin, "new-hash".to_string(), expires)
            .await
            .unwrap();
        assert!(!user.is_first_login);
        assert_eq!(
            user.password_expiry_date.map(|d| d.timestamp()),
            Some(expires.timestamp())
        );
        assert!(!user.password_change_required(Utc::now()));
    }

    #[tokio::test]
    async fn test_parent_links_are_tenant_checked() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;
        let parent = create_parent(&storage, tenant_a, "p@alpha.test").await;
        let own_child = create_student(&storage, tenant_a, "c@alpha.test").await;
        let foreign_child = create_student(&storage, tenant_b, "c@beta.test").await;

        storage
            .link_child_impl(tenant_a, parent, own_child)
            .await
            .unwrap();

        let err = storage
            .link_child_impl(tenant_a, parent, own_child)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        let err = storage
            .link_child_impl(tenant_a, parent, foreign_child)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let children = storage.list_children_impl(tenant_a, parent).await.unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].user.id, own_child);

        storage
            .unlink_child_impl(tenant_a, parent, own_child)
            .await
            .unwrap();
        assert!(
            !storage
                .is_parent_of_impl(tenant_a, parent, own_child)
                .await
                .unwrap()
        );
        let err = storage
            .unlink_child_impl(tenant_a, parent, own_child)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_list_users_filters_and_search() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        create_student(&storage, tenant, "first@north.test").await;
        create_student(&storage, tenant, "second@north.test").await;
        create_teacher(&storage, tenant, "teacher_x@north.test").await;

        let params = |user_type: Option<UserType>, search: Option<&str>| UserListParams {
            pagination: PaginationQuery { skip: 0, limit: 1 },
            user_type,
            search: search.map(str::to_string),
            is_active: Some(true),
        };

        let students = storage
            .list_users_impl(tenant, params(Some(UserType::Student), None))
            .await
            .unwrap();
        assert_eq!(students.total, 2);
        assert_eq!(students.items.len(), 1);
        assert!(students.has_next);
        assert!(!students.has_prev);

        // 下划线按字面匹配
        let found = storage
            .list_users_impl(tenant, params(None, Some("teacher_")))
            .await
            .unwrap();
        assert_eq!(found.total, 1);
    }
}
