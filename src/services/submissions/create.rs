use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SubmissionService;
use crate::errors::EduHubError;
use crate::models::{
    ApiResponse, assessments::requests::CreateSubmissionRequest, users::entities::UserType,
};
use crate::tenancy::CurrentUser;

pub async fn create_submission(
    service: &SubmissionService,
    request: &HttpRequest,
    data: CreateSubmissionRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;

    let student_id = match current.user_type {
        UserType::Student => match data.student_id {
            Some(id) if id != current.id => {
                return Err(EduHubError::permission_denied(
                    "Students can only create their own submissions",
                )
                .into());
            }
            _ => current.id,
        },
        UserType::Admin | UserType::Teacher => data.student_id.ok_or_else(|| {
            EduHubError::validation("student_id is required when submitting for a student")
        })?,
        UserType::Parent => {
            return Err(
                EduHubError::permission_denied("Parents cannot create submissions").into(),
            );
        }
    };

    let storage = service.get_storage(request)?;
    let submission = storage
        .create_submission(current.tenant_id, data.assessment_id, student_id, data.content)
        .await?;

    info!(
        "Submission {} created for assessment {} by student {}",
        submission.id, submission.assessment_id, submission.student_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        submission,
        "Submission created successfully",
    )))
}
