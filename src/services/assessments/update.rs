use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{AssessmentService, ensure_can_manage};
use crate::models::{ApiResponse, assessments::requests::UpdateAssessmentRequest};
use crate::tenancy::CurrentUser;

pub async fn update_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    id: i64,
    data: UpdateAssessmentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let existing = storage.get_assessment(current.tenant_id, id).await?;
    ensure_can_manage(&current, &existing)?;

    let assessment = storage
        .update_assessment(current.tenant_id, id, data)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        assessment,
        "Assessment updated successfully",
    )))
}

pub async fn delete_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let existing = storage.get_assessment(current.tenant_id, id).await?;
    ensure_can_manage(&current, &existing)?;

    storage.delete_assessment(current.tenant_id, id).await?;
    info!("Assessment {} deleted by {}", id, current.id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Assessment deleted successfully",
    )))
}
