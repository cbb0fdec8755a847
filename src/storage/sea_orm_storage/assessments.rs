//! 测评存储操作

use sea_orm::{ActiveModelTrait, ColumnTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{SeaOrmStorage, fetch_page, now_ts};
use crate::entity::assessments::{ActiveModel, Column, Entity as Assessments};
use crate::entity::{academic_years, classes, subjects, teachers};
use crate::errors::{EduHubError, Result};
use crate::models::{
    Page,
    assessments::{
        entities::Assessment,
        requests::{AssessmentListParams, CreateAssessmentRequest, UpdateAssessmentRequest},
    },
};
use crate::tenancy::{
    scoped_delete, scoped_lookup, scoped_mutate, scoped_reference, scoped_reference_opt,
    scoped_select,
};

impl SeaOrmStorage {
    pub async fn create_assessment_impl(
        &self,
        tenant_id: Uuid,
        req: CreateAssessmentRequest,
    ) -> Result<Assessment> {
        scoped_reference::<subjects::Entity, _>(&self.db, tenant_id, req.subject_id).await?;
        scoped_reference::<academic_years::Entity, _>(&self.db, tenant_id, req.academic_year_id)
            .await?;
        scoped_reference_opt::<teachers::Entity, _>(&self.db, tenant_id, req.teacher_id).await?;

        if let Some(class) =
            scoped_reference_opt::<classes::Entity, _>(&self.db, tenant_id, req.class_id).await?
            && class.academic_year_id != req.academic_year_id
        {
            return Err(EduHubError::validation(format!(
                "Class {} is not part of academic year {}",
                class.id, req.academic_year_id
            )));
        }

        let now = now_ts();
        let model = ActiveModel {
            tenant_id: Set(tenant_id),
            title: Set(req.title.trim().to_string()),
            description: Set(req.description),
            subject_id: Set(req.subject_id),
            teacher_id: Set(req.teacher_id),
            academic_year_id: Set(req.academic_year_id),
            class_id: Set(req.class_id),
            grade_type: Set(req.grade_type),
            max_score: Set(req.max_score),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建测评失败", e))?;

        Ok(model.into_assessment())
    }

    pub async fn get_assessment_impl(&self, tenant_id: Uuid, id: i64) -> Result<Assessment> {
        Ok(scoped_lookup::<Assessments, _>(&self.db, tenant_id, id)
            .await?
            .into_assessment())
    }

    pub async fn list_assessments_impl(
        &self,
        tenant_id: Uuid,
        params: AssessmentListParams,
    ) -> Result<Page<Assessment>> {
        let mut select = scoped_select::<Assessments>(tenant_id);

        if let Some(subject_id) = params.subject_id {
            select = select.filter(Column::SubjectId.eq(subject_id));
        }
        if let Some(class_id) = params.class_id {
            select = select.filter(Column::ClassId.eq(class_id));
        }
        if let Some(year_id) = params.academic_year_id {
            select = select.filter(Column::AcademicYearId.eq(year_id));
        }
        if let Some(teacher_id) = params.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id));
        }
        if let Some(grade_type) = params.grade_type {
            select = select.filter(Column::GradeType.eq(grade_type));
        }
        select = select.order_by_desc(Column::CreatedAt).order_by_desc(Column::Id);

        fetch_page(&self.db, select, &params.pagination, "测评", |m| {
            m.into_assessment()
        })
        .await
    }

    pub async fn update_assessment_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        update: UpdateAssessmentRequest,
    ) -> Result<Assessment> {
        let current = scoped_lookup::<Assessments, _>(&self.db, tenant_id, id).await?;

        if let Some(class) =
            scoped_reference_opt::<classes::Entity, _>(&self.db, tenant_id, update.class_id)
                .await?
            && class.academic_year_id != current.academic_year_id
        {
            return Err(EduHubError::validation(format!(
                "Class {} is not part of academic year {}",
                class.id, current.academic_year_id
            )));
        }

        let model = scoped_mutate::<Assessments, _, _>(&self.db, tenant_id, id, |_, active| {
            if let Some(title) = update.title {
                active.title = Set(title.trim().to_string());
            }
            if let Some(description) = update.description {
                active.description = Set(Some(description));
            }
            if let Some(class_id) = update.class_id {
                active.class_id = Set(Some(class_id));
            }
            if let Some(grade_type) = update.grade_type {
                active.grade_type = Set(grade_type);
            }
            if let Some(max_score) = update.max_score {
                active.max_score = Set(max_score);
            }
            if let Some(due_date) = update.due_date {
                active.due_date = Set(Some(due_date.timestamp()));
            }
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_assessment())
    }

    pub async fn delete_assessment_impl(&self, tenant_id: Uuid, id: i64) -> Result<()> {
        scoped_delete::<Assessments, _>(&self.db, tenant_id, id).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::GradeType;
    use crate::models::PaginationQuery;
    use crate::storage::sea_orm_storage::academics::tests::{subject_request, year_request};
    use crate::storage::sea_orm_storage::users::tests::provision;

    /// 创建科目 + 学年 + 测评，返回测评
    pub(crate) async fn create_assessment(
        storage: &SeaOrmStorage,
        tenant: Uuid,
        grade_type: GradeType,
        max_score: f64,
    ) -> Assessment {
        let subject = storage
            .create_subject_impl(tenant, subject_request(&format!("Subject {grade_type:?}")))
            .await
            .unwrap();
        let year = storage
            .create_academic_year_impl(tenant, year_request(&format!("Year {grade_type:?}"), false))
            .await
            .unwrap();

        storage
            .create_assessment_impl(
                tenant,
                CreateAssessmentRequest {
                    title: "Unit test".to_string(),
                    description: None,
                    subject_id: subject.id,
                    teacher_id: None,
                    academic_year_id: year.id,
                    class_id: None,
                    grade_type,
                    max_score,
                    due_date: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_extended_grade_types_round_trip() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;

        let quiz = create_assessment(&storage, tenant, GradeType::Quiz, 10.0).await;
        let attendance = create_assessment(&storage, tenant, GradeType::Attendance, 1.0).await;
        assert_eq!(attendance.grade_type, GradeType::Attendance);

        let page = storage
            .list_assessments_impl(
                tenant,
                AssessmentListParams {
                    pagination: PaginationQuery::default(),
                    grade_type: Some(GradeType::Quiz),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, quiz.id);
    }

    #[tokio::test]
    async fn test_assessments_are_tenant_scoped() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;
        let assessment = create_assessment(&storage, tenant_a, GradeType::Exam, 100.0).await;

        let err = storage
            .update_assessment_impl(
                tenant_b,
                assessment.id,
                UpdateAssessmentRequest {
                    max_score: Some(1.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::NotFound(_)));

        // 使用其他租户的科目创建测评属于输入错误
        let foreign_subject = storage
            .create_subject_impl(tenant_b, subject_request("Art"))
            .await
            .unwrap();
        let err = storage
            .create_assessment_impl(
                tenant_a,
                CreateAssessmentRequest {
                    title: "Bad".to_string(),
                    description: None,
                    subject_id: foreign_subject.id,
                    teacher_id: None,
                    academic_year_id: assessment.academic_year_id,
                    class_id: None,
                    grade_type: GradeType::Other,
                    max_score: 5.0,
                    due_date: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
    }
}
