use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse,
    academics::requests::{
        AcademicYearListParams, CreateAcademicYearRequest, UpdateAcademicYearRequest,
    },
};
use crate::tenancy::CurrentUser;

pub async fn create_year(
    service: &AcademicService,
    request: &HttpRequest,
    data: CreateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let year = storage.create_academic_year(current.tenant_id, data).await?;

    info!(
        "Academic year {} ({}) created in tenant {}",
        year.id, year.name, current.tenant_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(
        year,
        "Academic year created successfully",
    )))
}

pub async fn get_year(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let year = storage.get_academic_year(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(year, "Academic year retrieved")))
}

pub async fn list_years(
    service: &AcademicService,
    request: &HttpRequest,
    query: AcademicYearListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_academic_years(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Academic years retrieved")))
}

pub async fn update_year(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    data: UpdateAcademicYearRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let year = storage
        .update_academic_year(current.tenant_id, id, data)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        year,
        "Academic year updated successfully",
    )))
}

pub async fn delete_year(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage.delete_academic_year(current.tenant_id, id).await?;
    info!("Academic year {} deleted from tenant {}", id, current.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
        "Academic year deleted successfully",
    )))
}
