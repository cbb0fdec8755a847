//! 学年、年级、分组、科目与班级
//!
//! 读取对租户内任意身份开放，写入只允许管理员（由路由上的 RequireRole 保证）。

pub mod classes;
pub mod grades;
pub mod sections;
pub mod subjects;
pub mod years;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::storage_from;
use crate::errors::Result;
use crate::models::academics::requests::{
    AcademicListParams, AcademicYearListParams, ClassListParams, CreateAcademicYearRequest,
    CreateClassRequest, CreateGradeRequest, CreateSectionRequest, CreateSubjectRequest,
    SectionListParams, UpdateAcademicYearRequest, UpdateClassRequest, UpdateGradeRequest,
    UpdateSectionRequest, UpdateSubjectRequest,
};
use crate::storage::Storage;

pub struct AcademicService {
    storage: Option<Arc<dyn Storage>>,
}

impl AcademicService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Result<Arc<dyn Storage>> {
        match &self.storage {
            Some(storage) => Ok(storage.clone()),
            None => storage_from(request),
        }
    }

    // 学年
    pub async fn create_year(
        &self,
        request: &HttpRequest,
        data: CreateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::create_year(self, request, data).await
    }

    pub async fn get_year(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        years::get_year(self, request, id).await
    }

    pub async fn list_years(
        &self,
        request: &HttpRequest,
        query: AcademicYearListParams,
    ) -> ActixResult<HttpResponse> {
        years::list_years(self, request, query).await
    }

    pub async fn update_year(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateAcademicYearRequest,
    ) -> ActixResult<HttpResponse> {
        years::update_year(self, request, id, data).await
    }

    pub async fn delete_year(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        years::delete_year(self, request, id).await
    }

    // 年级
    pub async fn create_grade(
        &self,
        request: &HttpRequest,
        data: CreateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grades::create_grade(self, request, data).await
    }

    pub async fn get_grade(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        grades::get_grade(self, request, id).await
    }

    pub async fn list_grades(
        &self,
        request: &HttpRequest,
        query: AcademicListParams,
    ) -> ActixResult<HttpResponse> {
        grades::list_grades(self, request, query).await
    }

    pub async fn update_grade(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateGradeRequest,
    ) -> ActixResult<HttpResponse> {
        grades::update_grade(self, request, id, data).await
    }

    pub async fn delete_grade(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        grades::delete_grade(self, request, id).await
    }

    // 分组
    pub async fn create_section(
        &self,
        request: &HttpRequest,
        data: CreateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        sections::create_section(self, request, data).await
    }

    pub async fn get_section(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        sections::get_section(self, request, id).await
    }

    pub async fn list_sections(
        &self,
        request: &HttpRequest,
        query: SectionListParams,
    ) -> ActixResult<HttpResponse> {
        sections::list_sections(self, request, query).await
    }

    pub async fn update_section(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateSectionRequest,
    ) -> ActixResult<HttpResponse> {
        sections::update_section(self, request, id, data).await
    }

    pub async fn delete_section(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        sections::delete_section(self, request, id).await
    }

    // 科目
    pub async fn create_subject(
        &self,
        request: &HttpRequest,
        data: CreateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::create_subject(self, request, data).await
    }

    pub async fn get_subject(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        subjects::get_subject(self, request, id).await
    }

    pub async fn list_subjects(
        &self,
        request: &HttpRequest,
        query: AcademicListParams,
    ) -> ActixResult<HttpResponse> {
        subjects::list_subjects(self, request, query).await
    }

    pub async fn update_subject(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateSubjectRequest,
    ) -> ActixResult<HttpResponse> {
        subjects::update_subject(self, request, id, data).await
    }

    pub async fn delete_subject(
        &self,
        request: &HttpRequest,
        id: i64,
    ) -> ActixResult<HttpResponse> {
        subjects::delete_subject(self, request, id).await
    }

    // 班级
    pub async fn create_class(
        &self,
        request: &HttpRequest,
        data: CreateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::create_class(self, request, data).await
    }

    pub async fn get_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        classes::get_class(self, request, id).await
    }

    pub async fn list_classes(
        &self,
        request: &HttpRequest,
        query: ClassListParams,
    ) -> ActixResult<HttpResponse> {
        classes::list_classes(self, request, query).await
    }

    pub async fn update_class(
        &self,
        request: &HttpRequest,
        id: i64,
        data: UpdateClassRequest,
    ) -> ActixResult<HttpResponse> {
        classes::update_class(self, request, id, data).await
    }

    pub async fn delete_class(&self, request: &HttpRequest, id: i64) -> ActixResult<HttpResponse> {
        classes::delete_class(self, request, id).await
    }
}
