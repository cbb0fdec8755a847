//! 存储层抽象
//!
//! 除租户开通外，所有方法的第一个参数都是调用方所属租户，实现必须据此限定读写范围。

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::Result;
use crate::models::{
    Page,
    academics::{
        entities::{AcademicYear, Class, Grade, Section, Subject},
        requests::{
            AcademicListParams, AcademicYearListParams, ClassListParams, CreateAcademicYearRequest,
            CreateClassRequest, CreateGradeRequest, CreateSectionRequest, CreateSubjectRequest,
            SectionListParams, UpdateAcademicYearRequest, UpdateClassRequest, UpdateGradeRequest,
            UpdateSectionRequest, UpdateSubjectRequest,
        },
    },
    assessments::{
        entities::{Assessment, Submission},
        requests::{
            AssessmentListParams, CreateAssessmentRequest, SubmissionListParams,
            UpdateAssessmentRequest,
        },
    },
    enrollments::{
        entities::Enrollment,
        requests::{CreateEnrollmentRequest, EnrollmentListParams},
    },
    tenants::{
        entities::{NotificationConfig, Tenant},
        requests::{
            ProvisionTenantRequest, UpdateBrandingRequest, UpdateNotificationConfigRequest,
        },
    },
    users::{
        entities::{User, UserDetail},
        requests::{CreateUserRequest, UpdateUserRequest, UserListParams},
        responses::ChildResponse,
    },
};

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 租户管理方法
    // 开通租户并创建首个管理员
    async fn provision_tenant(
        &self,
        req: ProvisionTenantRequest,
        admin_password_hash: String,
    ) -> Result<(Tenant, User)>;
    // 获取租户
    async fn get_tenant(&self, tenant_id: Uuid) -> Result<Tenant>;
    // 租户总数
    async fn count_tenants(&self) -> Result<u64>;
    // 更新品牌信息
    async fn update_branding(&self, tenant_id: Uuid, update: UpdateBrandingRequest)
    -> Result<Tenant>;
    // 获取通知配置（不存在时按默认值创建）
    async fn get_notification_config(&self, tenant_id: Uuid) -> Result<NotificationConfig>;
    // 更新通知配置
    async fn update_notification_config(
        &self,
        tenant_id: Uuid,
        update: UpdateNotificationConfigRequest,
    ) -> Result<NotificationConfig>;

    /// 用户管理方法
    // 创建身份与角色扩展
    async fn create_user(
        &self,
        tenant_id: Uuid,
        req: CreateUserRequest,
        password_hash: String,
    ) -> Result<UserDetail>;
    // 获取基础身份
    async fn get_user(&self, tenant_id: Uuid, id: i64) -> Result<User>;
    // 获取身份与角色扩展
    async fn get_user_detail(&self, tenant_id: Uuid, id: i64) -> Result<UserDetail>;
    // 通过邮箱获取身份
    async fn get_user_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users(&self, tenant_id: Uuid, params: UserListParams) -> Result<Page<User>>;
    // 更新用户
    async fn update_user(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<UserDetail>;
    // 删除用户
    async fn delete_user(&self, tenant_id: Uuid, id: i64) -> Result<()>;
    // 更新密码，同时清除首次登录标记
    async fn update_password(
        &self,
        tenant_id: Uuid,
        id: i64,
        password_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<User>;
    // 更新最后登录时间
    async fn update_last_login(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 家长-学生关联
    async fn link_child(&self, tenant_id: Uuid, parent_id: i64, student_id: i64) -> Result<()>;
    async fn unlink_child(&self, tenant_id: Uuid, parent_id: i64, student_id: i64) -> Result<()>;
    async fn list_children(&self, tenant_id: Uuid, parent_id: i64) -> Result<Vec<ChildResponse>>;
    async fn is_parent_of(&self, tenant_id: Uuid, parent_id: i64, student_id: i64)
    -> Result<bool>;

    /// 学年
    async fn create_academic_year(
        &self,
        tenant_id: Uuid,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear>;
    async fn get_academic_year(&self, tenant_id: Uuid, id: i64) -> Result<AcademicYear>;
    async fn list_academic_years(
        &self,
        tenant_id: Uuid,
        params: AcademicYearListParams,
    ) -> Result<Page<AcademicYear>>;
    async fn update_academic_year(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<AcademicYear>;
    async fn delete_academic_year(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 年级
    async fn create_grade(&self, tenant_id: Uuid, req: CreateGradeRequest) -> Result<Grade>;
    async fn get_grade(&self, tenant_id: Uuid, id: i64) -> Result<Grade>;
    async fn list_grades(&self, tenant_id: Uuid, params: AcademicListParams)
    -> Result<Page<Grade>>;
    async fn update_grade(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Grade>;
    async fn delete_grade(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 分组
    async fn create_section(&self, tenant_id: Uuid, req: CreateSectionRequest) -> Result<Section>;
    async fn get_section(&self, tenant_id: Uuid, id: i64) -> Result<Section>;
    async fn list_sections(
        &self,
        tenant_id: Uuid,
        params: SectionListParams,
    ) -> Result<Page<Section>>;
    async fn update_section(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Section>;
    async fn delete_section(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 科目
    async fn create_subject(&self, tenant_id: Uuid, req: CreateSubjectRequest) -> Result<Subject>;
    async fn get_subject(&self, tenant_id: Uuid, id: i64) -> Result<Subject>;
    async fn list_subjects(
        &self,
        tenant_id: Uuid,
        params: AcademicListParams,
    ) -> Result<Page<Subject>>;
    async fn update_subject(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Subject>;
    async fn delete_subject(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 班级
    async fn create_class(&self, tenant_id: Uuid, req: CreateClassRequest) -> Result<Class>;
    async fn get_class(&self, tenant_id: Uuid, id: i64) -> Result<Class>;
    async fn list_classes(&self, tenant_id: Uuid, params: ClassListParams) -> Result<Page<Class>>;
    async fn update_class(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Class>;
    async fn delete_class(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 注册
    async fn create_enrollment(
        &self,
        tenant_id: Uuid,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment>;
    async fn get_enrollment(&self, tenant_id: Uuid, id: i64) -> Result<Enrollment>;
    async fn list_enrollments(
        &self,
        tenant_id: Uuid,
        params: EnrollmentListParams,
    ) -> Result<Page<Enrollment>>;
    async fn drop_enrollment(&self, tenant_id: Uuid, id: i64, date: NaiveDate)
    -> Result<Enrollment>;
    async fn complete_enrollment(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
    ) -> Result<Enrollment>;

    /// 测评
    async fn create_assessment(
        &self,
        tenant_id: Uuid,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment>;
    async fn get_assessment(&self, tenant_id: Uuid, id: i64) -> Result<Assessment>;
    async fn list_assessments(
        &self,
        tenant_id: Uuid,
        params: AssessmentListParams,
    ) -> Result<Page<Assessment>>;
    async fn update_assessment(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Assessment>;
    async fn delete_assessment(&self, tenant_id: Uuid, id: i64) -> Result<()>;

    /// 提交
    async fn create_submission(
        &self,
        tenant_id: Uuid,
        assessment_id: i64,
        student_id: i64,
        content: Option<String>,
    ) -> Result<Submission>;
    async fn get_submission(&self, tenant_id: Uuid, id: i64) -> Result<Submission>;
    async fn list_submissions(
        &self,
        tenant_id: Uuid,
        params: SubmissionListParams,
    ) -> Result<Page<Submission>>;
    async fn update_submission_content(
        &self,
        tenant_id: Uuid,
        id: i64,
        content: String,
    ) -> Result<Submission>;
    async fn submit_submission(&self, tenant_id: Uuid, id: i64) -> Result<Submission>;
    async fn grade_submission(
        &self,
        tenant_id: Uuid,
        id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission>;
    async fn return_submission(
        &self,
        tenant_id: Uuid,
        id: i64,
        feedback: Option<String>,
    ) -> Result<Submission>;
}

pub async fn create_storage(config: &DatabaseConfig) -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::connect(config).await?;
    Ok(Arc::new(storage))
}
