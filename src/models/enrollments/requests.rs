use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_opt_bool, deserialize_opt_i64};

// 注册请求
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student_id: i64,
    pub academic_year_id: i64,
    pub grade_id: i64,
    pub section_id: Option<i64>,
    pub class_id: Option<i64>,
    /// 为空时取当天
    pub enrollment_date: Option<NaiveDate>,
}

// 退学 / 结业请求，日期为空时取当天
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CloseEnrollmentRequest {
    pub date: Option<NaiveDate>,
}

// 注册列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub is_active: Option<bool>,
}
