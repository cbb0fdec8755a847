use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{SubmissionService, ensure_can_edit};
use crate::models::{
    ApiResponse,
    assessments::requests::{
        GradeSubmissionRequest, ReturnSubmissionRequest, UpdateSubmissionContentRequest,
    },
};
use crate::services::assessments::ensure_can_manage;
use crate::tenancy::CurrentUser;

pub async fn update_content(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
    data: UpdateSubmissionContentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage.get_submission(current.tenant_id, id).await?;
    ensure_can_edit(&current, &existing)?;

    let submission = storage
        .update_submission_content(current.tenant_id, id, data.content)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission updated successfully",
    )))
}

pub async fn submit(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage.get_submission(current.tenant_id, id).await?;
    ensure_can_edit(&current, &existing)?;

    let submission = storage.submit_submission(current.tenant_id, id).await?;
    info!(
        "Submission {} submitted for assessment {}",
        submission.id, submission.assessment_id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission submitted successfully",
    )))
}

pub async fn grade(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
    data: GradeSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage.get_submission(current.tenant_id, id).await?;
    let assessment = storage
        .get_assessment(current.tenant_id, existing.assessment_id)
        .await?;
    ensure_can_manage(&current, &assessment)?;

    let submission = storage
        .grade_submission(current.tenant_id, id, current.id, data.score, data.feedback)
        .await?;
    info!(
        "Submission {} graded {} / {} by {}",
        submission.id, data.score, assessment.max_score, current.id
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission graded successfully",
    )))
}

pub async fn return_to_student(
    service: &SubmissionService,
    request: &HttpRequest,
    id: i64,
    data: ReturnSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage.get_submission(current.tenant_id, id).await?;
    let assessment = storage
        .get_assessment(current.tenant_id, existing.assessment_id)
        .await?;
    ensure_can_manage(&current, &assessment)?;

    let submission = storage
        .return_submission(current.tenant_id, id, data.feedback)
        .await?;
    info!("Submission {} returned to student {}", submission.id, submission.student_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        submission,
        "Submission returned successfully",
    )))
}
