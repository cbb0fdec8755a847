use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AcademicService;
use crate::models::{
    ApiResponse,
    academics::requests::{CreateSectionRequest, SectionListParams, UpdateSectionRequest},
};
use crate::tenancy::CurrentUser;

pub async fn create_section(
    service: &AcademicService,
    request: &HttpRequest,
    data: CreateSectionRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let section = storage.create_section(current.tenant_id, data).await?;
    Ok(HttpResponse::Created().json(ApiResponse::success(
        section,
        "Section created successfully",
    )))
}

pub async fn get_section(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let section = storage.get_section(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(section, "Section retrieved")))
}

pub async fn list_sections(
    service: &AcademicService,
    request: &HttpRequest,
    query: SectionListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_sections(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Sections retrieved")))
}

pub async fn update_section(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    data: UpdateSectionRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let section = storage.update_section(current.tenant_id, id, data).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(
        section,
        "Section updated successfully",
    )))
}

pub async fn delete_section(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage.delete_section(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Section deleted successfully")))
}
