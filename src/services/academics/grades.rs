use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse,
    academics::requests::{AcademicListParams, CreateGradeRequest, UpdateGradeRequest},
};
use crate::tenancy::CurrentUser;

pub async fn create_grade(
    service: &AcademicService,
    request: &HttpRequest,
    data: CreateGradeRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let grade = storage.create_grade(current.tenant_id, data).await?;

    info!(
        "Grade {} ({}) created in tenant {}",
        grade.id, grade.name, current.tenant_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(grade, "Grade created successfully")))
}

pub async fn get_grade(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let grade = storage.get_grade(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade retrieved")))
}

pub async fn list_grades(
    service: &AcademicService,
    request: &HttpRequest,
    query: AcademicListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_grades(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Grades retrieved")))
}

pub async fn update_grade(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    data: UpdateGradeRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let grade = storage.update_grade(current.tenant_id, id, data).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(grade, "Grade updated successfully")))
}

pub async fn delete_grade(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage.delete_grade(current.tenant_id, id).await?;
    info!("Grade {} deleted from tenant {}", id, current.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Grade deleted successfully")))
}
