use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::AcademicService;
use crate::models::{
    ApiResponse,
    academics::requests::{ClassListParams, CreateClassRequest, UpdateClassRequest},
};
use crate::tenancy::CurrentUser;

pub async fn create_class(
    service: &AcademicService,
    request: &HttpRequest,
    data: CreateClassRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let class = storage.create_class(current.tenant_id, data).await?;

    info!(
        "Class {} ({}) created in tenant {}",
        class.id, class.name, current.tenant_id
    );
    Ok(HttpResponse::Created().json(ApiResponse::success(class, "Class created successfully")))
}

pub async fn get_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let class = storage.get_class(current.tenant_id, id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class retrieved")))
}

pub async fn list_classes(
    service: &AcademicService,
    request: &HttpRequest,
    query: ClassListParams,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    let page = storage.list_classes(current.tenant_id, query).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(page, "Classes retrieved")))
}

pub async fn update_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
    data: UpdateClassRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    data.validate()?;

    let storage = service.get_storage(request)?;
    let class = storage.update_class(current.tenant_id, id, data).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(class, "Class updated successfully")))
}

pub async fn delete_class(
    service: &AcademicService,
    request: &HttpRequest,
    id: i64,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    storage.delete_class(current.tenant_id, id).await?;
    info!("Class {} deleted from tenant {}", id, current.tenant_id);
    Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Class deleted successfully")))
}
