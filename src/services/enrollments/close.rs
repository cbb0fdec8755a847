use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::Utc;
use tracing::info;

use super::EnrollmentService;
use crate::models::{ApiResponse, enrollments::requests::CloseEnrollmentRequest};
use crate::tenancy::CurrentUser;

pub async fn drop_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    id: i64,
    data: CloseEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let date = data.date.unwrap_or_else(|| Utc::now().date_naive());
    let enrollment = storage.drop_enrollment(current.tenant_id, id, date).await?;

    info!(
        "Enrollment {} of student {} dropped on {}",
        enrollment.id, enrollment.student_id, date
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment dropped successfully",
    )))
}

pub async fn complete_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    id: i64,
    data: CloseEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let date = data.date.unwrap_or_else(|| Utc::now().date_naive());
    let enrollment = storage
        .complete_enrollment(current.tenant_id, id, date)
        .await?;

    info!(
        "Enrollment {} of student {} completed on {}",
        enrollment.id, enrollment.student_id, date
    );
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        enrollment,
        "Enrollment completed successfully",
    )))
}
