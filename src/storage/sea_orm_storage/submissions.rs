//! 提交存储操作
//!
//! 状态流转统一经过 [`SubmissionStatus::transition`]，非法流转在写库前被拒绝。

use sea_orm::{ActiveModelTrait, ColumnTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use super::{SeaOrmStorage, fetch_page, now_ts};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions, Model};
use crate::entity::{assessments, students};
use crate::errors::{EduHubError, Result};
use crate::models::{
    Page,
    assessments::{
        entities::{Submission, SubmissionStatus},
        requests::{GradeSubmissionRequest, SubmissionListParams},
    },
};
use crate::tenancy::{scoped_lookup, scoped_mutate, scoped_reference, scoped_select};

fn current_status(model: &Model) -> Result<SubmissionStatus> {
    model.status.parse::<SubmissionStatus>().map_err(|e| {
        EduHubError::database_operation(format!("提交 {} 状态无效: {e}", model.id))
    })
}

impl SeaOrmStorage {
    /// 创建草稿，每个学生对每个测评只有一份提交
    pub async fn create_submission_impl(
        &self,
        tenant_id: Uuid,
        assessment_id: i64,
        student_id: i64,
        content: Option<String>,
    ) -> Result<Submission> {
        scoped_reference::<assessments::Entity, _>(&self.db, tenant_id, assessment_id).await?;
        scoped_reference::<students::Entity, _>(&self.db, tenant_id, student_id).await?;

        let existing = scoped_select::<Submissions>(tenant_id)
            .filter(Column::AssessmentId.eq(assessment_id))
            .filter(Column::StudentId.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| EduHubError::from_db("查询提交失败", e))?;
        if existing > 0 {
            return Err(EduHubError::conflict(
                "Student already has a submission for this assessment",
            ));
        }

        let now = now_ts();
        let model = ActiveModel {
            tenant_id: Set(tenant_id),
            assessment_id: Set(assessment_id),
            student_id: Set(student_id),
            content: Set(content),
            status: Set(SubmissionStatus::Draft.to_string()),
            score: Set(None),
            feedback: Set(None),
            submitted_at: Set(None),
            graded_at: Set(None),
            graded_by: Set(None),
            returned_at: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .map_err(|e| EduHubError::from_db("创建提交失败", e))?;

        Ok(model.into_submission())
    }

    pub async fn get_submission_impl(&self, tenant_id: Uuid, id: i64) -> Result<Submission> {
        Ok(scoped_lookup::<Submissions, _>(&self.db, tenant_id, id)
            .await?
            .into_submission())
    }

    pub async fn list_submissions_impl(
        &self,
        tenant_id: Uuid,
        params: SubmissionListParams,
    ) -> Result<Page<Submission>> {
        let mut select = scoped_select::<Submissions>(tenant_id);

        if let Some(assessment_id) = params.assessment_id {
            select = select.filter(Column::AssessmentId.eq(assessment_id));
        }
        if let Some(student_id) = params.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = params.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        select = select.order_by_asc(Column::Id);

        fetch_page(&self.db, select, &params.pagination, "提交", |m| {
            m.into_submission()
        })
        .await
    }

    /// 只有草稿和被退回的提交可以修改内容
    pub async fn update_submission_content_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        content: String,
    ) -> Result<Submission> {
        let model = scoped_mutate::<Submissions, _, _>(&self.db, tenant_id, id, |current, active| {
            let status = current_status(current)?;
            if !status.is_editable() {
                return Err(EduHubError::validation(format!(
                    "Submission in status {status} can no longer be edited"
                )));
            }
            active.content = Set(Some(content));
            active.updated_at = Set(now_ts());
            Ok(())
        })
        .await?;

        Ok(model.into_submission())
    }

    pub async fn submit_submission_impl(&self, tenant_id: Uuid, id: i64) -> Result<Submission> {
        let model = scoped_mutate::<Submissions, _, _>(&self.db, tenant_id, id, |current, active| {
            let next = current_status(current)?.transition(SubmissionStatus::Submitted)?;
            let now = now_ts();
            active.status = Set(next.to_string());
            active.submitted_at = Set(Some(now));
            active.updated_at = Set(now);
            Ok(())
        })
        .await?;

        Ok(model.into_submission())
    }

    /// 评分，分数必须在 [0, max_score] 内
    pub async fn grade_submission_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        grader_id: i64,
        score: f64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        let submission = scoped_lookup::<Submissions, _>(&self.db, tenant_id, id).await?;
        let assessment =
            scoped_lookup::<assessments::Entity, _>(&self.db, tenant_id, submission.assessment_id)
                .await?;

        GradeSubmissionRequest {
            score,
            feedback: None,
        }
        .validate(assessment.max_score)?;

        let model = scoped_mutate::<Submissions, _, _>(&self.db, tenant_id, id, |current, active| {
            let next = current_status(current)?.transition(SubmissionStatus::Graded)?;
            let now = now_ts();
            active.status = Set(next.to_string());
            active.score = Set(Some(score));
            if let Some(feedback) = feedback {
                active.feedback = Set(Some(feedback));
            }
            active.graded_at = Set(Some(now));
            active.graded_by = Set(Some(grader_id));
            active.updated_at = Set(now);
            Ok(())
        })
        .await?;

        Ok(model.into_submission())
    }

    /// 退回修改
    pub async fn return_submission_impl(
        &self,
        tenant_id: Uuid,
        id: i64,
        feedback: Option<String>,
    ) -> Result<Submission> {
        let model = scoped_mutate::<Submissions, _, _>(&self.db, tenant_id, id, |current, active| {
            let next = current_status(current)?.transition(SubmissionStatus::Returned)?;
            let now = now_ts();
            active.status = Set(next.to_string());
            if let Some(feedback) = feedback {
                active.feedback = Set(Some(feedback));
            }
            active.returned_at = Set(Some(now));
            active.updated_at = Set(now);
            Ok(())
        })
        .await?;

        Ok(model.into_submission())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::GradeType;
    use crate::storage::sea_orm_storage::assessments::tests::create_assessment;
    use crate::storage::sea_orm_storage::users::tests::{create_student, provision};

    #[tokio::test]
    async fn test_full_lifecycle() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, admin) = provision(&storage, "north").await;
        let student = create_student(&storage, tenant, "s@north.test").await;
        let assessment = create_assessment(&storage, tenant, GradeType::Homework, 20.0).await;

        let draft = storage
            .create_submission_impl(tenant, assessment.id, student, None)
            .await
            .unwrap();
        assert_eq!(draft.status, SubmissionStatus::Draft);

        // 草稿不能直接评分
        let err = storage
            .grade_submission_impl(tenant, draft.id, admin, 10.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        storage
            .update_submission_content_impl(tenant, draft.id, "my answer".to_string())
            .await
            .unwrap();
        let submitted = storage.submit_submission_impl(tenant, draft.id).await.unwrap();
        assert_eq!(submitted.status, SubmissionStatus::Submitted);
        assert!(submitted.submitted_at.is_some());

        // 已提交的内容不可修改
        let err = storage
            .update_submission_content_impl(tenant, draft.id, "changed".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        // 超出满分
        let err = storage
            .grade_submission_impl(tenant, draft.id, admin, 25.0, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let graded = storage
            .grade_submission_impl(tenant, draft.id, admin, 18.5, Some("Good".to_string()))
            .await
            .unwrap();
        assert_eq!(graded.status, SubmissionStatus::Graded);
        assert_eq!(graded.score, Some(18.5));
        assert_eq!(graded.graded_by, Some(admin));

        // 评分后只能退回
        let err = storage
            .submit_submission_impl(tenant, draft.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));

        let returned = storage
            .return_submission_impl(tenant, draft.id, Some("Revise section 2".to_string()))
            .await
            .unwrap();
        assert_eq!(returned.status, SubmissionStatus::Returned);
        assert_eq!(returned.feedback.as_deref(), Some("Revise section 2"));

        storage
            .update_submission_content_impl(tenant, draft.id, "revised".to_string())
            .await
            .unwrap();
        let resubmitted = storage.submit_submission_impl(tenant, draft.id).await.unwrap();
        assert_eq!(resubmitted.status, SubmissionStatus::Submitted);
        assert_eq!(resubmitted.content.as_deref(), Some("revised"));
    }

    #[tokio::test]
    async fn test_one_submission_per_student_and_assessment() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant, _) = provision(&storage, "north").await;
        let student = create_student(&storage, tenant, "s@north.test").await;
        let assessment = create_assessment(&storage, tenant, GradeType::Quiz, 10.0).await;

        storage
            .create_submission_impl(tenant, assessment.id, student, None)
            .await
            .unwrap();
        let err = storage
            .create_submission_impl(tenant, assessment.id, student, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_submission_for_foreign_student_rejected() {
        let storage = SeaOrmStorage::in_memory().await.unwrap();
        let (tenant_a, _) = provision(&storage, "alpha").await;
        let (tenant_b, _) = provision(&storage, "beta").await;
        let outsider = create_student(&storage, tenant_b, "s@beta.test").await;
        let assessment = create_assessment(&storage, tenant_a, GradeType::Quiz, 10.0).await;

        let err = storage
            .create_submission_impl(tenant_a, assessment.id, outsider, None)
            .await
            .unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
    }
}
