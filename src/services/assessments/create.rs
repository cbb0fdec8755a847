use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AssessmentService;
use crate::errors::EduHubError;
use crate::models::{
    ApiResponse, assessments::requests::CreateAssessmentRequest, users::entities::UserType,
};
use crate::tenancy::CurrentUser;

pub async fn create_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    mut data: CreateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    // 教师只能以自己的名义创建
    if current.user_type == UserType::Teacher {
        match data.teacher_id {
            Some(teacher_id) if teacher_id != current.id => {
                return Err(EduHubError::permission_denied(
                    "Teachers can only create assessments for themselves",
                )
                .into());
            }
            _ => data.teacher_id = Some(current.id),
        }
    }

    let storage = service.get_storage(request)?;
    let assessment = storage.create_assessment(current.tenant_id, data).await?;

    info!(
        "Assessment {} ({:?}) created in tenant {} by {}",
        assessment.id, assessment.grade_type, current.tenant_id, current.id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        assessment,
        "Assessment created successfully",
    )))
}
