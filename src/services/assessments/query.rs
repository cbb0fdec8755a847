use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssessmentService;
use crate::models::{ApiResponse, assessments::requests::AssessmentListParams};
use crate::tenancy::CurrentUser;

pub async fn get_assessment(
    service: &AssessmentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let assessment = storage.get_assessment(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(assessment, "Assessment retrieved")))
}

pub async fn list_assessments(
    service: &AssessmentService,
    request: &HttpRequest,
    query: AssessmentListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_assessments(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Assessments retrieved")))
}
