use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{ApiResponse, enrollments::requests::EnrollmentListParams};
use crate::services::{ensure_student_visible, restrict_student_filter};
use crate::tenancy::CurrentUser;

pub async fn get_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let enrollment = storage.get_enrollment(current.tenant_id, id).await?;
    ensure_student_visible(&storage, &current, enrollment.student_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(enrollment, "Enrollment retrieved")))
}

pub async fn list_enrollments(
    service: &EnrollmentService,
    request: &HttpRequest,
    mut query: EnrollmentListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    query.student_id = restrict_student_filter(&storage, &current, query.student_id).await?;

    let page = storage.list_enrollments(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Enrollments retrieved")))
}
