//! 注册存储操作

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::info;
use uuid::Uuid;

use super::{SeaOrmStorage, fetch_page, now_ts};
use crate::entity::enrollments::{ActiveModel, Column, Entity as Enrollments};
use crate::entity::{academic_years, classes, grades, sections, students};
use crate::errors::{EduHubError, Result};
use crate::models::{
    Page,
    enrollments::{
        entities::Enrollment,
        requests::{CreateEnrollmentRequest, EnrollmentListParams},
    },
};
use crate::tenancy::{
    scoped_lookup, scoped_mutate, scoped_reference, scoped_reference_opt, scoped_select,
};

/// 结束注册的方式
#[derive(Debug, Clone, Copy)]
enum CloseKind {
    Drop,
    Complete,
}

impl SeaOrmStorage {
    /// 注册学生
    ///
    /// 同一学生在同一学年 + 班级下最多一条有效注册；未指定班级的注册单独算一组。
    pub async fn create_enrollment_impl(
        &self,
        tenant_id: Uuid,
        req: CreateEnrollmentRequest,
    ) -> Result<Enrollment> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| EduHubError::from_db("开启事务失败", e))?;

        scoped_reference::<students::Entity, _>(&txn, tenant_id, req.student_id).await?;
        let year =
            scoped_reference::<academic_years::Entity, _>(&txn, tenant_id, req.academic_year_id)
                .await?;
        scoped_reference::<grades::Entity, _>(&txn, tenant_id, req.grade_id).await?;

        if let Some(section) =
            scoped_reference_opt::<sections::Entity, _>(&txn, tenant_id, req.section_id).await?
            && section.grade_id != req.grade_id
        {
            return Err(EduHubError::validation(format!(
                "Section {} does not belong to grade {}",
                section.id, req.grade_id
            )));
        }

        if let Some(class) =
            scoped_reference_opt::<classes::Entity, _>(&txn, tenant_id, req.class_id).await?
        {
            if class.academic_year_id != year.id {
                return Err(EduHubError::validation(format!(
                    "Class {} is not part of academic year {}",
                    class.id, year.id
                )));
            }
            if class.grade_id != req.grade_id {
                return Err(EduHubError::validation(format!(
                    "Class {} does not belong to grade {}",
                    class.id, req.grade_id
                )));
            }
            if let Some(class_section) = class.section_id
                && req.section_id != Some(class_section)
            {
                return Err(EduHubError::validation(format!(
                    "Class {} belongs to section {}",
                    class.id, class_section
                )));
            }
        }

        let mut active_query = scoped_select::<Enrollments>(tenant_id)
            .filter(Column::StudentId.eq(req.student_id))
            .filter(Column::AcademicYearId.eq(req.academic_year_id))
            .filter(Column::IsActive.eq(true));
        active_query = match req.class_id {
            Some(class_id) => active_query.filter(Column::ClassId.eq(class_id)),
            None => active_query.filter(Column::ClassId.is_null()),
        };

        let existing = active_query
            .count(&txn)
            .await
            .map_err(|e| EduHubError::from_db("查询有效注册失败", e))?;
        if existing > 0 {
            return Err(EduHubError::conflict(
                "Student already has an active enrollment for this academic year and class",
            ));
        }

        let now = now_ts();
        let model = ActiveModel {
            tenant_id: Set(tenant_id),
            student_id: Set(req.student_id),
            academic_year_id: Set(req.academic_year_id),
            grade_id: Set(req.grade_id),
            section_id: Set(req.section_id),
            class_id: Set(req.class_id),
            enrollment_date: Set(req
                .enrollment_date
                .unwrap_or_else(|| Utc::now().date_naive())),
            is_active: Set(true),
            drop_date: Set(None),
            completion_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| EduHubError::from_db("创建注册失败", e))?;

        txn.commit()
            .await
            .map_err(|e| EduHubError::from_db("提交事务失败", e))?;

        info!(
            "学生 {} 已注册学年 {} (租户 {})",
            model.student_id, model.academic_year_id, tenant_id
        );
        Ok(model.into_enrollment())
    }

    pub async fn get_enrollment_impl(&self, tenant_id: Uuid, id: i64) -> Result<Enrollment> {
        Ok(scoped_lookup::<Enrollments, _>(&self.db, tenant_id, id)
            .await?
            .into_enrollment())
    }

    pub async fn list_enrollments_impl(
        &self,
        tenant_id: Uuid,
        params: EnrollmentListParams,
    ) -> Result<Page<Enrollment>> {
        let mut select = scoped_select::<Enrollments>(tenant_id);

        if let Some(student_id) = params.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(class_id) = params.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(year_id) = params.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(year_id));
        }
        if let Some(is_active) = params.is_active {
            select = select.filter(Column::IsActive.eq(is_active));
        }
        select = select.order_by_asc(Column::Id);

        fetch_page(&self.db, select, &params.pagination, "注册", |m| {
            m.into_enrollment()
        })
        .await
    }

    pub async fn drop_enrollment_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
    ) -> Result<Enrollment> {
        self.close_enrollment(tenant_id, id, date, CloseKind::Drop)
            .await
    }

    pub async fn complete_enrollment_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
    ) -> Result<Enrollment> {
        self.close_enrollment(tenant_id, id, date, CloseKind::Complete)
            .await
    }

    /// 只有有效注册可以结束，日期不得早于注册日期
    async fn close_enrollment(
        &self,
        tenant_id: Uuid,
        id: i64,
        date: NaiveDate,
        kind: CloseKind,
    ) -> Result<Enrollment> {
        let model = scoped_mutate::<Enrollments, _, _>(&self.db, tenant_id, id, |current, active| {
            if !current.is_active {
                return Err(EduHubError::validation("Enrollment is not active"));
            }
            if date < current.enrollment_date {
                return Err(EduHubError::validation(
                    "Date must not be earlier than the enrollment date",
                ));
            }

            active.is_active = Set(false);
            match kind {
                CloseKind::Drop => active.drop_date = Set(Some(date)),
                CloseKind::Complete => active.completion_date = Set(Some(date)),
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_enrollment())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::PaginationQuery;
    use crate::models::academics::requests::{CreateClassRequest, CreateSectionRequest};
    use crate::models::enrollments::entities::EnrollmentStatus;
    use crate::storage::sea_orm_storage::academics::tests::{grade_request, year_request};
    use crate::storage::sea_orm_storage::users::tests::{create_student, provision};

    struct Fixture {
        storage: SeaOrmStorage,
        tenant: Uuid,
        student: i64,
        year: i64,
        grade: i64,
        class: i64,
    }

    async fn fixture() -> Fixture {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let student = create_student(&storage, tenant, "s@north.test").await;
        let year = storage
            .create_academic_year_impl(tenant, year_request("2025/2026", true))
            .await
            .unwrap()
            .id;
        let grade = storage
            .create_grade_impl(tenant, grade_request("Grade 1", 1))
            .await
            .unwrap()
            .id;
        let class = storage
            .create_class_impl(
                tenant,
                CreateClassRequest {
                    name: "1A".to_string(),
                    academic_year_id: year,
                    grade_id: grade,
                    section_id: None,
                    subject_id: None,
                    teacher_id: None,
                },
            )
            .await
            .unwrap()
            .id;

        Fixture {
            storage,
            tenant,
            student,
            year,
            grade,
            class,
        }
    }

    fn request(f: &Fixture, class_id: Option<i64>) -> CreateEnrollmentRequest {
        CreateEnrollmentRequest {
            student_id: f.student,
            academic_year_id: f.year,
            grade_id: f.grade,
            section_id: None,
            class_id,
            enrollment_date: NaiveDate::from_ymd_opt(2025, 9, 1),
        }
    }

    #[tokio::test]
    async fn test_one_active_enrollment_per_year_and_class() {
        let f = fixture().await;

        let first = f
            .storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap();
        assert_eq!(first.status, EnrollmentStatus::Active);

        let err = f
            .storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        // 不指定班级的注册单独计算
        f.storage
            .create_enrollment_impl(f.tenant, request(&f, None))
            .await
            .unwrap();
        let err = f
            .storage
            .create_enrollment_impl(f.tenant, request(&f, None))
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));

        // 退学后可以重新注册
        f.storage
            .drop_enrollment_impl(f.tenant, first.id, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap())
            .await
            .unwrap();
        f.storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap();
    }

    // 绕过应用层检查直接写入第二条有效注册，由唯一索引拒绝
    #[tokio::test]
    async fn test_database_rejects_second_active_enrollment() {
        let f = fixture().await;
        f.storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap();

        let now = now_ts();
        let duplicate = |class_id: Option<i64>| ActiveModel {
            tenant_id: Set(f.tenant),
            student_id: Set(f.student),
            academic_year_id: Set(f.year),
            grade_id: Set(f.grade),
            section_id: Set(None),
            class_id: Set(class_id),
            enrollment_date: Set(NaiveDate::from_ymd_opt(2025, 9, 2).unwrap()),
            is_active: Set(true),
            drop_date: Set(None),
            completion_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let err = duplicate(Some(f.class))
            .insert(&f.storage.db)
            .await
            .map_err(|e| EduHubError::from_db("创建注册失败", e))
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)), "{err:?}");

        duplicate(None).insert(&f.storage.db).await.unwrap();
        let err = duplicate(None)
            .insert(&f.storage.db)
            .await
            .map_err(|e| EduHubError::from_db("创建注册失败", e))
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)), "{err:?}");

        // 已结束的注册不占唯一位
        let mut closed = duplicate(Some(f.class));
        closed.is_active = Set(false);
        closed.insert(&f.storage.db).await.unwrap();

        let active = Enrollments::find()
            .filter(Column::TenantId.eq(f.tenant))
            .filter(Column::IsActive.eq(true))
            .count(&f.storage.db)
            .await
            .unwrap();
        assert_eq!(active, 2);
    }

    #[tokio::test]
    async fn test_class_must_match_grade_and_section() {
        let f = fixture().await;
        let other_grade = f
            .storage
            .create_grade_impl(f.tenant, grade_request("Grade 2", 2))
            .await
            .unwrap()
            .id;

        let err = f
            .storage
            .create_enrollment_impl(
                f.tenant,
                CreateEnrollmentRequest {
                    grade_id: other_grade,
                    ..request(&f, Some(f.class))
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)), "{err:?}");

        let section = f
            .storage
            .create_section_impl(
                f.tenant,
                CreateSectionRequest {
                    grade_id: f.grade,
                    name: "A".to_string(),
                    capacity: None,
                },
            )
            .await
            .unwrap()
            .id;
        let sectioned_class = f
            .storage
            .create_class_impl(
                f.tenant,
                CreateClassRequest {
                    name: "1A-sec".to_string(),
                    academic_year_id: f.year,
                    grade_id: f.grade,
                    section_id: Some(section),
                    subject_id: None,
                    teacher_id: None,
                },
            )
            .await
            .unwrap()
            .id;

        let err = f
            .storage
            .create_enrollment_impl(f.tenant, request(&f, Some(sectioned_class)))
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)), "{err:?}");

        f.storage
            .create_enrollment_impl(
                f.tenant,
                CreateEnrollmentRequest {
                    section_id: Some(section),
                    ..request(&f, Some(sectioned_class))
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_with_huge_skip_is_empty() {
        let f = fixture().await;
        f.storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap();

        let page = f
            .storage
            .list_enrollments_impl(
                f.tenant,
                EnrollmentListParams {
                    pagination: PaginationQuery {
                        skip: u64::MAX,
                        limit: 10,
                    },
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next);
    }

    #[tokio::test]
    async fn test_drop_and_complete_only_active() {
        let f = fixture().await;
        let enrollment = f
            .storage
            .create_enrollment_impl(f.tenant, request(&f, Some(f.class)))
            .await
            .unwrap();

        let early = NaiveDate::from_ymd_opt(2025, 8, 1).unwrap();
        let err = f
            .storage
            .complete_enrollment_impl(f.tenant, enrollment.id, early)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let done = f
            .storage
            .complete_enrollment_impl(
                f.tenant,
                enrollment.id,
                NaiveDate::from_ymd_opt(2026, 7, 1).unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(done.status, EnrollmentStatus::Completed);
        assert!(!done.is_active);

        let err = f
            .storage
            .drop_enrollment_impl(
                f.tenant,
                enrollment.id,
                NaiveDate::from_ymd_opt(2026, 7, 2).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
    }

    #[tokio::test]
    async fn test_references_from_other_tenant_rejected() {
        let f = fixture().await;
        let (other, _) = provision(&f.storage, "south").await;
        let outsider = create_student(&f.storage, other, "s@south.test").await;

        let err = f
            .storage
            .create_enrollment_impl(
                f.tenant,
                CreateEnrollmentRequest {
                    student_id: outsider,
                    ..request(&f, None)
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let page = f
            .storage
            .list_enrollments_impl(
                f.tenant,
                EnrollmentListParams {
                    pagination: PaginationQuery::default(),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 0);
    }
}
