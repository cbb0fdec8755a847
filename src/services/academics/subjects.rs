use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse,
    academics::requests::{AcademicListParams, CreateSubjectRequest, UpdateSubjectRequest},
};
use crate::tenancy::CurrentUser;

pub async fn create_subject(
    service: &AcademicService,
    request: &HttpRequest,
    data: CreateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    // 科目名在租户内唯一，重复时返回 409
    let subject = storage.create_subject(current.tenant_id, data).await?;

    info!(
        "Subject {} ({}) created in tenant {}",
        subject.id, subject.name, current.tenant_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        subject,
        "Subject created successfully",
    )))
}

pub async fn get_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let subject = storage.get_subject(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(subject, "Subject retrieved")))
}

pub async fn list_subjects(
    service: &AcademicService,
    request: &HttpRequest,
    query: AcademicListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_subjects(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Subjects retrieved")))
}

pub async fn update_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    data: UpdateSubjectRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let subject = storage.update_subject(current.tenant_id, id, data).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        subject,
        "Subject updated successfully",
    )))
}

pub async fn delete_subject(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage.delete_subject(current.tenant_id, id).await?;
    info!("Subject {} deleted from tenant {}", id, current.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Subject deleted successfully")))
}
