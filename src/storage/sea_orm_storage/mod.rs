//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 连接建立后先跑迁移链，再在普通连接上执行枚举扩值。

mod academics;
mod assessments;
mod enrollments;
mod submissions;
mod tenants;
mod users;

use std::time::Duration;

use chrono::{DateTime, NaiveDate, Utc};
use migration::{Migrator, MigratorTrait, apply_enum_extensions};
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, PaginatorTrait,
    QuerySelect, Select,
};
use tracing::info;
use uuid::Uuid;

use crate::config::DatabaseConfig;
use crate::errors::{EduHubError, Result};
use crate::models::{Page, PaginationQuery};

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 连接数据库并完成迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        let storage = Self::prepare(db).await?;
        info!("SeaORM 存储初始化完成，数据库: {}", Self::redact_url(&db_url));
        Ok(storage)
    }

    /// 迁移链 + 枚举扩值
    async fn prepare(db: DatabaseConnection) -> Result<Self> {
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduHubError::migration(format!("数据库迁移失败: {e}")))?;

        let applied = apply_enum_extensions(&db)
            .await
            .map_err(|e| EduHubError::migration(format!("枚举扩值失败: {e}")))?;
        if applied > 0 {
            info!("已执行 {} 条枚举扩值语句", applied);
        }

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduHubError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| EduHubError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| EduHubError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduHubError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 日志中隐藏连接串里的密码
    fn redact_url(url: &str) -> String {
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***@{}", &url[..scheme_end], &url[at + 1..])
            }
            _ => url.to_string(),
        }
    }

    /// 测试用内存库，单连接保证所有查询落在同一个库上
    #[cfg(test)]
    pub(crate) async fn in_memory() -> Result<Self> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opt)
            .await
            .map_err(|e| EduHubError::database_connection(e.to_string()))?;
        Self::prepare(db).await
    }
}

/// 当前 Unix 秒
pub(crate) fn now_ts() -> i64 {
    Utc::now().timestamp()
}

/// 计数 + 偏移分页
pub(crate) async fn fetch_page<E, C, T>(
    db: &C,
    select: Select<E>,
    query: &PaginationQuery,
    resource: &str,
    convert: impl FnMut(E::Model) -> T,
) -> Result<Page<T>>
where
    E: EntityTrait,
    E::Model: Sync,
    C: ConnectionTrait,
{
    let total = select
        .clone()
        .count(db)
        .await
        .map_err(|e| EduHubError::from_db(&format!("查询{resource}总数失败"), e))?;

    let models = select
        .offset(query.effective_skip())
        .limit(query.effective_limit())
        .all(db)
        .await
        .map_err(|e| EduHubError::from_db(&format!("查询{resource}列表失败"), e))?;

    Ok(Page::new(
        models.into_iter().map(convert).collect(),
        total,
        query,
    ))
}

// Storage trait 实现
use crate::models::{
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 租户模块
    async fn provision_tenant(
        &self,
        req: ProvisionTenantRequest,
        admin_password_hash: String,
    ) -> Result<(Tenant, User)> {
        self.provision_tenant_impl(req, admin_password_hash).await
    }

    async fn get_tenant(&self, tenant_id: Uuid) -> Result<Tenant> {
        self.get_tenant_impl(tenant_id).await
    }

    async fn count_tenants(&self) -> Result<u64> {
        self.count_tenants_impl().await
    }

    async fn update_branding(
        &self,
        tenant_id: Uuid,
        update: UpdateBrandingRequest,
    ) -> Result<Tenant> {
        self.update_branding_impl(tenant_id, update).await
    }

    async fn get_notification_config(&self, tenant_id: Uuid) -> Result<NotificationConfig> {
        self.get_notification_config_impl(tenant_id).await
    }

    async fn update_notification_config(
        &self,
        tenant_id: Uuid,
        update: UpdateNotificationConfigRequest,
    ) -> Result<NotificationConfig> {
        self.update_notification_config_impl(tenant_id, update)
            .await
    }

    // 用户模块
    async fn create_user(
        &self,
        tenant_id: Uuid,
        req: CreateUserRequest,
        password_hash: String,
    ) -> Result<UserDetail> {
        self.create_user_impl(tenant_id, req, password_hash).await
    }

    async fn get_user(&self, tenant_id: Uuid, id: i64) -> Result<User> {
        self.get_user_impl(tenant_id, id).await
    }

    async fn get_user_detail(&self, tenant_id: Uuid, id: i64) -> Result<UserDetail> {
        self.get_user_detail_impl(tenant_id, id).await
    }

    async fn get_user_by_email(&self, tenant_id: Uuid, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(tenant_id, email).await
    }

    async fn list_users(&self, tenant_id: Uuid, params: UserListParams) -> Result<Page<User>> {
        self.list_users_impl(tenant_id, params).await
    }

    async fn update_user(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<UserDetail> {
        self.update_user_impl(tenant_id, id, update).await
    }

    async fn delete_user(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_user_impl(tenant_id, id).await
    }

    async fn update_password(
        &self,
        tenant_id: Uuid,
        id: i64,
        password_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<User> {
        self.update_password_impl(tenant_id, id, password_hash, expires_at)
            .await
    }

    async fn update_last_login(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.update_last_login_impl(tenant_id, id).await
    }

    async fn link_child(&self, tenant_id: Uuid, parent_id: i64, student_id: i64) -> Result<()> {
        self.link_child_impl(tenant_id, parent_id, student_id).await
    }

    async fn unlink_child(&self, tenant_id: Uuid, parent_id: i64, student_id: i64) -> Result<()> {
        self.unlink_child_impl(tenant_id, parent_id, student_id)
            .await
    }

    async fn list_children(&self, tenant_id: Uuid, parent_id: i64) -> Result<Vec<ChildResponse>> {
        self.list_children_impl(tenant_id, parent_id).await
    }

    async fn is_parent_of(
        &self,
        tenant_id: Uuid,
        parent_id: i64,
        student_id: i64,
    ) -> Result<bool> {
        self.is_parent_of_impl(tenant_id, parent_id, student_id)
            .await
    }

    // 学年模块
    async fn create_academic_year(
        &self,
        tenant_id: Uuid,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        self.create_academic_year_impl(tenant_id, req).await
    }

    async fn get_academic_year(&self, tenant_id: Uuid, id: i64) -> Result<AcademicYear> {
        self.get_academic_year_impl(tenant_id, id).await
    }

    async fn list_academic_years(
        &self,
        tenant_id: Uuid,
        params: AcademicYearListParams,
    ) -> Result<Page<AcademicYear>> {
        self.list_academic_years_impl(tenant_id, params).await
    }

    async fn update_academic_year(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        self.update_academic_year_impl(tenant_id, id, update).await
    }

    async fn delete_academic_year(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_academic_year_impl(tenant_id, id).await
    }

    // 年级模块
    async fn create_grade(&self, tenant_id: Uuid, req: CreateGradeRequest) -> Result<Grade> {
        self.create_grade_impl(tenant_id, req).await
    }

    async fn get_grade(&self, tenant_id: Uuid, id: i64) -> Result<Grade> {
        self.get_grade_impl(tenant_id, id).await
    }

    async fn list_grades(
        &self,
        tenant_id: Uuid,
        params: AcademicListParams,
    ) -> Result<Page<Grade>> {
        self.list_grades_impl(tenant_id, params).await
    }

    async fn update_grade(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Grade> {
        self.update_grade_impl(tenant_id, id, update).await
    }

    async fn delete_grade(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_grade_impl(tenant_id, id).await
    }

    // 分组模块
    async fn create_section(&self, tenant_id: Uuid, req: CreateSectionRequest) -> Result<Section> {
        self.create_section_impl(tenant_id, req).await
    }

    async fn get_section(&self, tenant_id: Uuid, id: i64) -> Result<Section> {
        self.get_section_impl(tenant_id, id).await
    }

    async fn list_sections(
        &self,
        tenant_id: Uuid,
        params: SectionListParams,
    ) -> Result<Page<Section>> {
        self.list_sections_impl(tenant_id, params).await
    }

    async fn update_section(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Section> {
        self.update_section_impl(tenant_id, id, update).await
    }

    async fn delete_section(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_section_impl(tenant_id, id).await
    }

    // 科目模块
    async fn create_subject(&self, tenant_id: Uuid, req: CreateSubjectRequest) -> Result<Subject> {
        self.create_subject_impl(tenant_id, req).await
    }

    async fn get_subject(&self, tenant_id: Uuid, id: i64) -> Result<Subject> {
        self.get_subject_impl(tenant_id, id).await
    }

    async fn list_subjects(
        &self,
        tenant_id: Uuid,
        params: AcademicListParams,
    ) -> Result<Page<Subject>> {
        self.list_subjects_impl(tenant_id, params).await
    }

    async fn update_subject(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Subject> {
        self.update_subject_impl(tenant_id, id, update).await
    }

    async fn delete_subject(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_subject_impl(tenant_id, id).await
    }

    // 班级模块
    async fn create_class(&self, tenant_id: Uuid, req: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(tenant_id, req).await
    }

    async fn get_class(&self, tenant_id: Uuid, id: i64) -> Result<Class> {
        self.get_class_impl(tenant_id, id).await
    }

    async fn list_classes(&self, tenant_id: Uuid, params: ClassListParams) -> Result<Page<Class>> {
        self.list_classes_impl(tenant_id, params).await
    }

    async fn update_class(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Class> {
        self.update_class_impl(tenant_id, id, update).await
    }

    async fn delete_class(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_class_impl(tenant_id, id).await
    }

    // 注册模块
    async fn create_enrollment(
        &self,
        tenant_id: Uuid,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        self.create_enrollment_impl(tenant_id, req).await
    }

    async fn get_enrollment(&self, tenant_id: Uuid, id: i64) -> Result<Enrollment> {
        self.get_enrollment_impl(tenant_id, id).await
    }

    async fn list_enrollments(
        &self,
        tenant_id: Uuid,
        params: EnrollmentListParams,
    ) -> Result<Page<Enrollment>> {
        self.list_enrollments_impl(tenant_id, params).await
    }

    async fn drop_enrollment(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
    ) -> Result<Enrollment> {
        self.drop_enrollment_impl(tenant_id, id, date).await
    }

    async fn complete_enrollment(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
    ) -> Result<Enrollment> {
        self.complete_enrollment_impl(tenant_id, id, date).await
    }

    // 测评模块
    async fn create_assessment(
        &self,
        tenant_id: Uuid,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        self.create_assessment_impl(tenant_id, req).await
    }

    async fn get_assessment(&self, tenant_id: Uuid, id: i64) -> Result<Assessment> {
        self.get_assessment_impl(tenant_id, id).await
    }

    async fn list_assessments(
        &self,
        tenant_id: Uuid,
        params: AssessmentListParams,
    ) -> Result<Page<Assessment>> {
        self.list_assessments_impl(tenant_id, params).await
    }

    async fn update_assessment(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Assessment> {
        self.update_assessment_impl(tenant_id, id, update).await
    }

    async fn delete_assessment(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        self.delete_assessment_impl(tenant_id, id).await
    }

    // 提交模块
    async fn create_submission(
        &self,
        tenant_id: Uuid,
        assessment_id: i64,
        student_id: i64,
        content: Option<String>,
    ) -> Result<Submission> {
        self.create_submission_impl(tenant_id, assessment_id, student_id, content)
            .await
    }

    async fn get_submission(&self, tenant_id: Uuid, id: i64) -> Result<Submission> {
        self.get_submission_impl(tenant_id, id).await
    }

    async fn list_submissions(
        &self,
        tenant_id: Uuid,
        params: SubmissionListParams,
    ) -> Result<Page<Submission>> {
        self.list_submissions_impl(tenant_id, params).await
    }

    async fn update_submission_content(
        &self,
        tenant_id: Uuid,
        id: i64,
        content: String,
    ) -> Result<Submission> {
        self.update_submission_content_impl(tenant_id, id, content)
            .await
    }

    async fn submit_submission(&self, tenant_id: Uuid, id: i64) -> Result<Submission> {
        self.submit_submission_impl(tenant_id, id).await
    }

    async fn grade_submission(
        &self,
        tenant_id: Uuid,
        id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        self.grade_submission_impl(tenant_id, id, grader_id, score, feedback)
            .await
    }

    async fn return_submission(
        &self,
        tenant_id: Uuid,
        id: i64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        self.return_submission_impl(tenant_id, id, feedback).await
    }
}
