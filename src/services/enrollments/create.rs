use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::EnrollmentService;
use crate::models::{ApiResponse, enrollments::requests::CreateEnrollmentRequest};
use crate::tenancy::CurrentUser;

pub async fn create_enrollment(
    service: &EnrollmentService,
    request: &HttpRequest,
    data: CreateEnrollmentRequest,
) -> ActixResult<HttpResponse> {
    let current = CurrentUser::from_request(request)?;
    let storage = service.get_storage(request)?;

    // 引用校验与“同一学年 + 班级最多一条有效注册”在存储层的事务内完成
    let enrollment = storage.create_enrollment(current.tenant_id, data).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(
        enrollment,
        "Student enrolled successfully",
    )))
}
