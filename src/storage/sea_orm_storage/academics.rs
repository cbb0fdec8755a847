//! 学年、年级、分组、科目、班级存储操作

use chrono::NaiveDate;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use super::{SeaOrmStorage, fetch_page, now_ts};
use crate::entity::{academic_years, classes, grades, sections, subjects, teachers};
use crate::errors::{EduHubError, Result};
use crate::models::{
    Page,
    academics::{
        entities::{AcademicYear, Class, Grade, Section, Subject},
        requests::{
            AcademicListParams, AcademicYearListParams, ClassListParams,
            CreateAcademicYearRequest, CreateClassRequest, CreateGradeRequest,
            CreateSectionRequest, CreateSubjectRequest, SectionListParams,
            UpdateAcademicYearRequest, UpdateClassRequest, UpdateGradeRequest,
            UpdateSectionRequest, UpdateSubjectRequest, check_date_range,
        },
    },
};
use crate::tenancy::{
    scoped_delete, scoped_lookup, scoped_mutate, scoped_reference, scoped_reference_opt,
    scoped_select,
};
use crate::utils::contains_pattern;

/// 清除租户内其他学年的当前标记
async fn clear_current_year<C>(db: &C, tenant_id: Uuid, keep: Option<i64>) -> Result<()>
where
    C: ConnectionTrait,
{
    let mut update = academic_years::Entity::update_many()
        .col_expr(academic_years::Column::IsCurrent, Expr::value(false))
        .filter(academic_years::Column::TenantId.eq(tenant_id))
        .filter(academic_years::Column::IsCurrent.eq(true));

    if let Some(keep) = keep {
        update = update.filter(academic_years::Column::Id.ne(keep));
    }

    update
        .exec(db)
        .await
        .map_err(|e| EduHubError::from_db("清除当前学年失败", e))?;
    Ok(())
}

/// 分组必须属于班级所在的年级
async fn check_section_in_grade<C>(
    db: &C,
    tenant_id: Uuid,
    section_id: Option<i64>,
    grade_id: i64,
) -> Result<()>
where
    C: ConnectionTrait,
{
    if let Some(section) =
        scoped_reference_opt::<sections::Entity, C>(db, tenant_id, section_id).await?
        && section.grade_id != grade_id
    {
        return Err(EduHubError::validation(format!(
            "Section {} does not belong to grade {}",
            section.id, grade_id
        )));
    }
    Ok(())
}

impl SeaOrmStorage {
    // ==================== 学年 ====================

    pub async fn create_academic_year_impl(
        &self,
        tenant_id: Uuid,
        req: CreateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        check_date_range(req.start_date, req.end_date)?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        if req.is_current {
            clear_current_year(&txn, tenant_id, None).await?;
        }

        let now = now_ts();
        let model = academic_years::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(req.name.trim().to_string()),
            start_date: Set(req.start_date),
            end_date: Set(req.end_date),
            is_current: Set(req.is_current),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EduHubError::from_db("创建学年失败", e))?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        Ok(model.into_academic_year())
    }

    pub async fn get_academic_year_impl(&self, tenant_id: Uuid, id: i64) -> Result<AcademicYear> {
        Ok(
            scoped_lookup::<academic_years::Entity, _>(&self.db, tenant_id, id)
                .await?
                .into_academic_year(),
        )
    }

    pub async fn list_academic_years_impl(
        &self,
        tenant_id: Uuid,
        params: AcademicYearListParams,
    ) -> Result<Page<AcademicYear>> {
        let mut select = scoped_select::<academic_years::Entity>(tenant_id);
        if let Some(is_current) = params.is_current {
            select = select.filter(academic_years::Column::IsCurrent.eq(is_current));
        }
        select = select.order_by_desc(academic_years::Column::StartDate);

        fetch_page(&self.db, select, &params.pagination, "学年", |m| {
            m.into_academic_year()
        })
        .await
    }

    /// 设为当前学年时，同一事务内清除其他学年的标记
    pub async fn update_academic_year_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAcademicYearRequest,
    ) -> Result<AcademicYear> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        if update.is_current == Some(true) {
            scoped_lookup::<academic_years::Entity, _>(&txn, tenant_id, id).await?;
            clear_current_year(&txn, tenant_id, Some(id)).await?;
        }

        let model = scoped_mutate::<academic_years::Entity, _, _>(
            &txn,
            tenant_id,
            id,
            |current, active| {
                let start: NaiveDate = update.start_date.unwrap_or(current.start_date);
                let end: NaiveDate = update.end_date.unwrap_or(current.end_date);
                check_date_range(start, end)?;

                if let Some(name) = update.name {
                    active.name = Set(name.trim().to_string());
                }
                active.start_date = Set(start);
                active.end_date = Set(end);
                if let Some(is_current) = update.is_current {
                    active.is_current = Set(is_current);
                }
                active.updated_at = Set(now_ts());
                Ok(())
            },
        )
        .await?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        Ok(model.into_academic_year())
    }

    pub async fn delete_academic_year_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<academic_years::Entity, _>(&self.db, tenant_id, id).await
    }

    // ==================== 年级 ====================

    pub async fn create_grade_impl(&self, tenant_id: Uuid, req: CreateGradeRequest) -> Result<Grade> {
        let now = now_ts();
        let model = grades::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(req.name.trim().to_string()),
            level: Set(req.level),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建年级失败", e))?;

        Ok(model.into_grade())
    }

    pub async fn get_grade_impl(&self, tenant_id: Uuid, id: i64) -> Result<Grade> {
        Ok(scoped_lookup::<grades::Entity, _>(&self.db, tenant_id, id)
            .await?
            .into_grade())
    }

    pub async fn list_grades_impl(
        &self,
        tenant_id: Uuid,
        params: AcademicListParams,
    ) -> Result<Page<Grade>> {
        let mut select = scoped_select::<grades::Entity>(tenant_id);
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            select = select.filter(grades::Column::Name.like(contains_pattern(search.trim())));
        }
        select = select
            .order_by_asc(grades::Column::Level)
            .order_by_asc(grades::Column::Id);

        fetch_page(&self.db, select, &params.pagination, "年级", |m| {
            m.into_grade()
        })
        .await
    }

    pub async fn update_grade_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateGradeRequest,
    ) -> Result<Grade> {
        let model = scoped_mutate::<grades::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            if let Some(name) = update.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(level) = update.level {
                active.level = Set(level);
            }
            if let Some(description) = update.description {
                active.description = Set(Some(description));
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_grade())
    }

    pub async fn delete_grade_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<grades::Entity, _>(&self.db, tenant_id, id).await
    }

    // ==================== 分组 ====================

    pub async fn create_section_impl(
        &self,
        tenant_id: Uuid,
        req: CreateSectionRequest,
    ) -> Result<Section> {
        scoped_reference::<grades::Entity, _>(&self.db, tenant_id, req.grade_id).await?;

        let now = now_ts();
        let model = sections::ActiveModel {
            tenant_id: Set(tenant_id),
            grade_id: Set(req.grade_id),
            name: Set(req.name.trim().to_string()),
            capacity: Set(req.capacity),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建分组失败", e))?;

        Ok(model.into_section())
    }

    pub async fn get_section_impl(&self, tenant_id: Uuid, id: i64) -> Result<Section> {
        Ok(scoped_lookup::<sections::Entity, _>(&self.db, tenant_id, id)
            .await?
            .into_section())
    }

    pub async fn list_sections_impl(
        &self,
        tenant_id: Uuid,
        params: SectionListParams,
    ) -> Result<Page<Section>> {
        let mut select = scoped_select::<sections::Entity>(tenant_id);
        if let Some(grade_id) = params.grade_id {
            select = select.filter(sections::Column::GradeId.eq(grade_id));
        }
        select = select.order_by_asc(sections::Column::Id);

        fetch_page(&self.db, select, &params.pagination, "分组", |m| {
            m.into_section()
        })
        .await
    }

    pub async fn update_section_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSectionRequest,
    ) -> Result<Section> {
        let model = scoped_mutate::<sections::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            if let Some(name) = update.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(capacity) = update.capacity {
                active.capacity = Set(Some(capacity));
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_section())
    }

    pub async fn delete_section_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<sections::Entity, _>(&self.db, tenant_id, id).await
    }

    // ==================== 科目 ====================

    pub async fn create_subject_impl(
        &self,
        tenant_id: Uuid,
        req: CreateSubjectRequest,
    ) -> Result<Subject> {
        let now = now_ts();
        let model = subjects::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(req.name.trim().to_string()),
            code: Set(req.code.map(|c| c.trim().to_uppercase())),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建科目失败", e))?;

        Ok(model.into_subject())
    }

    pub async fn get_subject_impl(&self, tenant_id: Uuid, id: i64) -> Result<Subject> {
        Ok(scoped_lookup::<subjects::Entity, _>(&self.db, tenant_id, id)
            .await?
            .into_subject())
    }

    pub async fn list_subjects_impl(
        &self,
        tenant_id: Uuid,
        params: AcademicListParams,
    ) -> Result<Page<Subject>> {
        let mut select = scoped_select::<subjects::Entity>(tenant_id);
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            select = select.filter(subjects::Column::Name.like(contains_pattern(search.trim())));
        }
        select = select.order_by_asc(subjects::Column::Name);

        fetch_page(&self.db, select, &params.pagination, "科目", |m| {
            m.into_subject()
        })
        .await
    }

    pub async fn update_subject_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateSubjectRequest,
    ) -> Result<Subject> {
        let model = scoped_mutate::<subjects::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            if let Some(name) = update.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(code) = update.code {
                active.code = Set(Some(code.trim().to_uppercase()));
            }
            if let Some(description) = update.description {
                active.description = Set(Some(description));
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_subject())
    }

    pub async fn delete_subject_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<subjects::Entity, _>(&self.db, tenant_id, id).await
    }

    // ==================== 班级 ====================

    /// 所有引用都必须属于同一租户，分组必须属于所选年级
    pub async fn create_class_impl(&self, tenant_id: Uuid, req: CreateClassRequest) -> Result<Class> {
        scoped_reference::<academic_years::Entity, _>(&self.db, tenant_id, req.academic_year_id)
            .await?;
        scoped_reference::<grades::Entity, _>(&self.db, tenant_id, req.grade_id).await?;
        check_section_in_grade(&self.db, tenant_id, req.section_id, req.grade_id).await?;
        scoped_reference_opt::<subjects::Entity, _>(&self.db, tenant_id, req.subject_id).await?;
        scoped_reference_opt::<teachers::Entity, _>(&self.db, tenant_id, req.teacher_id).await?;

        let now = now_ts();
        let model = classes::ActiveModel {
            tenant_id: Set(tenant_id),
            name: Set(req.name.trim().to_string()),
            academic_year_id: Set(req.academic_year_id),
            grade_id: Set(req.grade_id),
            section_id: Set(req.section_id),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建班级失败", e))?;

        Ok(model.into_class())
    }

    pub async fn get_class_impl(&self, tenant_id: Uuid, id: i64) -> Result<Class> {
        Ok(scoped_lookup::<classes::Entity, _>(&self.db, tenant_id, id)
            .await?
            .into_class())
    }

    pub async fn list_classes_impl(
        &self,
        tenant_id: Uuid,
        params: ClassListParams,
    ) -> Result<Page<Class>> {
        let mut select = scoped_select::<classes::Entity>(tenant_id);

        if let Some(year) = params.academic_year_id {
            select = select.filter(classes::Column::AcademicYearId.eq(year));
        }
        if let Some(grade) = params.grade_id {
            select = select.filter(classes::Column::GradeId.eq(grade));
        }
        if let Some(teacher) = params.teacher_id {
            select = select.filter(classes::Column::TeacherId.eq(teacher));
        }
        if let Some(ref search) = params.search
            && !search.trim().is_empty()
        {
            select = select.filter(classes::Column::Name.like(contains_pattern(search.trim())));
        }
        select = select.order_by_asc(classes::Column::Id);

        fetch_page(&self.db, select, &params.pagination, "班级", |m| {
            m.into_class()
        })
        .await
    }

    pub async fn update_class_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateClassRequest,
    ) -> Result<Class> {
        let current = scoped_lookup::<classes::Entity, _>(&self.db, tenant_id, id).await?;
        check_section_in_grade(&self.db, tenant_id, update.section_id, current.grade_id).await?;
        scoped_reference_opt::<subjects::Entity, _>(&self.db, tenant_id, update.subject_id)
            .await?;
        scoped_reference_opt::<teachers::Entity, _>(&self.db, tenant_id, update.teacher_id)
            .await?;

        let model = scoped_mutate::<classes::Entity, _, _>(&self.db, tenant_id, id, |_, active| {
            if let Some(name) = update.name {
                active.name = Set(name.trim().to_string());
            }
            if let Some(section_id) = update.section_id {
                active.section_id = Set(Some(section_id));
            }
            if let Some(subject_id) = update.subject_id {
                active.subject_id = Set(Some(subject_id));
            }
            if let Some(teacher_id) = update.teacher_id {
                active.teacher_id = Set(Some(teacher_id));
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_class())
    }

    pub async fn delete_class_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<classes::Entity, _>(&self.db, tenant_id, id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::users::tests::{create_teacher, provision};

    pub(crate) fn year_request(name: &str, is_current: bool) -> CreateAcademicYearRequest {
        CreateAcademicYearRequest {
            name: name.to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 15).unwrap(),
            is_current,
        }
    }

    pub(crate) fn subject_request(name: &str) -> CreateSubjectRequest {
        CreateSubjectRequest {
            name: name.to_string(),
            code: None,
            description: None,
        }
    }

    pub(crate) fn grade_request(name: &str, level: i32) -> CreateGradeRequest {
        CreateGradeRequest {
            name: name.to_string(),
            level,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_subject_name_unique_per_tenant() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;

        let math_a = storage
            .create_subject_impl(tenant_a, subject_request("Math"))
            .await
            .unwrap();
        storage
            .create_subject_impl(tenant_b, subject_request("Math"))
            .await
            .unwrap();

        let err = storage
            .create_subject_impl(tenant_a, subject_request("Math"))
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        // 其他租户的行与不存在的行不可区分
        let err = scoped_lookup::<subjects::Entity, _>(&storage.db, tenant_b, math_a.id)
            .await
            .unwrap_err();
        assert_eq!(err, EduHubError::not_found("Subject not found"));
        let err = scoped_lookup::<subjects::Entity, _>(&storage.db, tenant_b, 999_999)
            .await
            .unwrap_err();
        assert_eq!(err, EduHubError::not_found("Subject not found"));
    }

    #[tokio::test]
    async fn test_only_one_current_year() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;

        let first = storage
            .create_academic_year_impl(tenant, year_request("2024/2025", true))
            .await
            .unwrap();
        let second = storage
            .create_academic_year_impl(tenant, year_request("2025/2026", true))
            .await
            .unwrap();

        assert!(!storage.get_academic_year_impl(tenant, first.id).await.unwrap().is_current);
        assert!(second.is_current);

        storage
            .update_academic_year_impl(
                tenant,
                first.id,
                UpdateAcademicYearRequest {
                    is_current: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let current = storage
            .list_academic_years_impl(
                tenant,
                AcademicYearListParams {
                    pagination: PaginationQuery::default(),
                    is_current: Some(true),
                },
            )
            .await
            .unwrap();
        assert_eq!(current.total, 1);
        assert_eq!(current.items[0].id, first.id);
    }

    #[tokio::test]
    async fn test_year_update_rejects_inverted_dates() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let year = storage
            .create_academic_year_impl(tenant, year_request("2025/2026", false))
            .await
            .unwrap();

        let err = storage
            .update_academic_year_impl(
                tenant,
                year.id,
                UpdateAcademicYearRequest {
                    end_date: NaiveDate::from_ymd_opt(2025, 1, 1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
    }

    #[tokio::test]
    async fn test_class_references_are_verified() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;

        let year = storage
            .create_academic_year_impl(tenant_a, year_request("2025/2026", true))
            .await
            .unwrap();
        let grade_1 = storage
            .create_grade_impl(tenant_a, grade_request("Grade 1", 1))
            .await
            .unwrap();
        let grade_2 = storage
            .create_grade_impl(tenant_a, grade_request("Grade 2", 2))
            .await
            .unwrap();
        let section = storage
            .create_section_impl(
                tenant_a,
                CreateSectionRequest {
                    grade_id: grade_2.id,
                    name: "A".to_string(),
                    capacity: Some(30),
                },
            )
            .await
            .unwrap();
        let foreign_teacher = create_teacher(&storage, tenant_b, "t@beta.test").await;
        let own_teacher = create_teacher(&storage, tenant_a, "t@alpha.test").await;

        let base = CreateClassRequest {
            name: "1A".to_string(),
            academic_year_id: year.id,
            grade_id: grade_1.id,
            section_id: None,
            subject_id: None,
            teacher_id: Some(own_teacher),
        };

        // 分组不属于该年级
        let err = storage
            .create_class_impl(
                tenant_a,
                CreateClassRequest {
                    section_id: Some(section.id),
                    ..base.clone()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        // 教师属于其他租户
        let err = storage
            .create_class_impl(
                tenant_a,
                CreateClassRequest {
                    teacher_id: Some(foreign_teacher),
                    ..base.clone()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let class = storage.create_class_impl(tenant_a, base).await.unwrap();
        assert_eq!(class.teacher_id, Some(own_teacher));

        // 其他租户看不到该班级
        let err = storage.get_class_impl(tenant_b, class.id).await.unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sections_unique_within_grade() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let grade_1 = storage
            .create_grade_impl(tenant, grade_request("Grade 1", 1))
            .await
            .unwrap();
        let grade_2 = storage
            .create_grade_impl(tenant, grade_request("Grade 2", 2))
            .await
            .unwrap();

        let section = |grade_id| CreateSectionRequest {
            grade_id,
            name: "A".to_string(),
            capacity: None,
        };

        storage.create_section_impl(tenant, section(grade_1.id)).await.unwrap();
        storage.create_section_impl(tenant, section(grade_2.id)).await.unwrap();
        let err = storage
            .create_section_impl(tenant, section(grade_1.id))
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        let page = storage
            .list_sections_impl(
                tenant,
                SectionListParams {
                    pagination: PaginationQuery::default(),
                    grade_id: Some(grade_1.id),
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
    }
}
