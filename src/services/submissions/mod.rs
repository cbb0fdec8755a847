pub mod create;
pub mod query;
pub mod workflow;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::storage_from;
use crate::errors::{EduHubError, Result};
use crate::models::assessments::{
    entities::Submission,
    requests::{
        CreateSubmissionRequest, GradeSubmissionRequest, ReturnSubmissionRequest,
        SubmissionListParams, UpdateSubmissionContentRequest,
    },
};
use crate::models::users::entities::UserType;
use crate::storage::Storage;
use crate::tenancy::CurrentUser;

/// 学生只能操作自己的提交，教职工可代为操作
pub(crate) fn ensure_can_edit(current: &CurrentUser, submission: &Submission) -> Result<()> {
    match current.user_type {
        UserType::Admin | UserType::Teacher => Ok(()),
        UserType::Student if submission.student_id == current.id => Ok(()),
        _ => Err(EduHubError::permission_denied(
            "Not allowed to modify this submission",
        )),
    }
}

pub struct SubmissionService {
    storage: Option<Arc<dyn Storage>>,
}

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from(request),
        }
    }

    // 创建草稿
    pub async fn create_submission(
        &self,
        request: &HttpRequest,
        data: CreateSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_submission(self, request, data).await
    }

    pub async fn get_submission(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        query::get_submission(self, request, id).await
    }

    pub async fn list_submissions(
        &self,
        request: &HttpRequest,
        query: SubmissionListParams,
    ) -> ActixResult<HttpResponse> {
        query::list_submissions(self, request, query).await
    }

    pub async fn update_content(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateSubmissionContentRequest,
    ) -> ActixResult<HttpResponse> {
        workflow::update_content(self, request, id, data).await
    }

    pub async fn submit(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        workflow::submit(self, request, id).await
    }

    pub async fn grade(
        &self,
        request: &HttpRequest,
        id: i64,
        data: GradeSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        workflow::grade(self, request, id, data).await
    }

    pub async fn return_to_student(
        &self,
        request: &HttpRequest,
        id: i64,
        data: ReturnSubmissionRequest,
    ) -> ActixResult<HttpResponse> {
        workflow::return_to_student(self, request, id, data).await
    }
}
