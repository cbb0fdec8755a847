use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SubmissionService;
use crate::models::{ApiResponse, assessments::requests::SubmissionListParams};
use crate::services::{ensure_student_visible, restrict_student_filter};
use crate::tenancy::CurrentUser;

pub async fn get_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let submission = storage.get_submission(current.tenant_id, id).await?;
    ensure_student_visible(&storage, &current, submission.student_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(submission, "Submission retrieved")))
}

pub async fn list_submissions(
    service: &SubmissionService,
    request: &HttpRequest,
    mut query: SubmissionListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    query.student_id = restrict_student_filter(&storage, &current, query.student_id).await?;

    let page = storage.list_submissions(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Submissions retrieved")))
}
