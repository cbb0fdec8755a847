pub mod create;
pub mod query;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::storage_from;
use crate::errors::{EduHubError, Result};
use crate::models::assessments::{
    entities::Assessment,
    requests::{AssessmentListParams, CreateAssessmentRequest, UpdateAssessmentRequest},
};
use crate::models::users::entities::UserType;
use crate::storage::Storage;
use crate::tenancy::CurrentUser;

/// 管理员可管理全部测评，教师只能管理自己负责的测评
pub(crate) fn ensure_can_manage(current: &CurrentUser, assessment: &Assessment) -> Result<()> {
    match current.user_type {
        UserType::Admin => Ok(()),
        UserType::Teacher if assessment.teacher_id == Some(current.id) => Ok(()),
        _ => Err(EduHubError::permission_denied(
            "Only the responsible teacher or an admin can manage this assessment",
        )),
    }
}

pub struct AssessmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl AssessmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from(request),
        }
    }

    pub async fn create_assessment(
        &self,
        request: &HttpRequest,
        data: CreateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assessment(self, request, data).await
    }

    pub async fn get_assessment(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        query::get_assessment(self, request, id).await
    }

    pub async fn list_assessments(
        &self,
        request: &HttpRequest,
        query: AssessmentListParams,
    ) -> ActixResult<HttpResponse> {
        query::list_assessments(self, request, query).await
    }

    pub async fn update_assessment(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateAssessmentRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assessment(self, request, id, data).await
    }

    pub async fn delete_assessment(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        update::delete_assessment(self, request, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::sea_orm_active_enums::GradeType;
    use chrono::Utc;
    use uuid::Uuid;

    fn caller(id: i64, user_type: UserType) -> CurrentUser {
        CurrentUser {
            id,
            tenant_id: Uuid::new_v4(),
            user_type,
            email: "caller@school.test".to_string(),
        }
    }

    fn assessment(teacher_id: Option<i64>) -> Assessment {
        Assessment {
            id: 1,
            title: "Quiz".to_string(),
            description: None,
            subject_id: 1,
            teacher_id,
            academic_year_id: 1,
            class_id: None,
            grade_type: GradeType::Quiz,
            max_score: 10.0,
            due_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_manage_permissions() {
        assert!(ensure_can_manage(&caller(1, UserType::Admin), &assessment(None)).is_ok());
        assert!(ensure_can_manage(&caller(7, UserType::Teacher), &assessment(Some(7))).is_ok());
        assert!(ensure_can_manage(&caller(7, UserType::Teacher), &assessment(Some(8))).is_err());
        assert!(ensure_can_manage(&caller(7, UserType::Teacher), &assessment(None)).is_err());
        assert!(ensure_can_manage(&caller(7, UserType::Student), &assessment(Some(7))).is_err());
    }
}
