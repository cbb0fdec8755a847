pub mod close;
pub mod create;
pub mod query;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::storage_from;
use crate::errors::Result;
use crate::models::enrollments::requests::{
    CloseEnrollmentRequest, CreateEnrollmentRequest, EnrollmentListParams,
};
use crate::storage::Storage;

pub struct EnrollmentService {
    storage: Option<Arc<dyn Storage>>,
}

impl EnrollmentService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from(request),
        }
    }

    // 注册学生
    pub async fn create_enrollment(
        &self,
        request: &HttpRequest,
        data: CreateEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_enrollment(self, request, data).await
    }

    pub async fn get_enrollment(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        query::get_enrollment(self, request, id).await
    }

    pub async fn list_enrollments(
        &self,
        request: &HttpRequest,
        query: EnrollmentListParams,
    ) -> ActixResult<HttpResponse> {
        query::list_enrollments(self, request, query).await
    }

    // 退学
    pub async fn drop_enrollment(
        &self,
        request: &HttpRequest,
        id: i64,
        data: CloseEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        close::drop_enrollment(self, request, id, data).await
    }

    // 结业
    pub async fn complete_enrollment(
        &self,
        request: &HttpRequest,
        id: i64,
        data: CloseEnrollmentRequest,
    ) -> ActixResult<HttpResponse> {
        close::complete_enrollment(self, request, id, data).await
    }
}
