use chrono::NaiveDate;
use serde::Deserialize;

use crate::errors::{EduHubError, Result};
use crate::models::common::PaginationQuery;
use crate::models::common::query::{deserialize_opt_bool, deserialize_opt_i64};
use crate::utils::validate::validate_name;

const NAME_MAX: usize = 100;

fn check_name(field: &str, value: &str) -> Result<()> {
    validate_name(field, value, NAME_MAX).map_err(EduHubError::validation)
}

fn check_opt_name(field: &str, value: Option<&String>) -> Result<()> {
    value.map_or(Ok(()), |v| check_name(field, v))
}

/// 学年起止日期
pub fn check_date_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start >= end {
        return Err(EduHubError::validation(
            "start_date must be earlier than end_date",
        ));
    }
    Ok(())
}

fn check_capacity(capacity: Option<i32>) -> Result<()> {
    match capacity {
        Some(c) if c <= 0 => Err(EduHubError::validation("capacity must be positive")),
        _ => Ok(()),
    }
}

// 通用列表参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcademicListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAcademicYearRequest {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub is_current: bool,
}

impl CreateAcademicYearRequest {
    pub fn validate(&self) -> Result<()> {
        check_name("name", &self.name)?;
        check_date_range(self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAcademicYearRequest {
    pub name: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_current: Option<bool>,
}

impl UpdateAcademicYearRequest {
    pub fn validate(&self) -> Result<()> {
        check_opt_name("name", self.name.as_ref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateGradeRequest {
    pub name: String,
    pub level: i32,
    pub description: Option<String>,
}

impl CreateGradeRequest {
    pub fn validate(&self) -> Result<()> {
        check_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGradeRequest {
    pub name: Option<String>,
    pub level: Option<i32>,
    pub description: Option<String>,
}

impl UpdateGradeRequest {
    pub fn validate(&self) -> Result<()> {
        check_opt_name("name", self.name.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SectionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub grade_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSectionRequest {
    pub grade_id: i64,
    pub name: String,
    pub capacity: Option<i32>,
}

impl CreateSectionRequest {
    pub fn validate(&self) -> Result<()> {
        check_name("name", &self.name)?;
        check_capacity(self.capacity)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSectionRequest {
    pub name: Option<String>,
    pub capacity: Option<i32>,
}

impl UpdateSectionRequest {
    pub fn validate(&self) -> Result<()> {
        check_opt_name("name", self.name.as_ref())?;
        check_capacity(self.capacity)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubjectRequest {
    pub name: String,
    pub code: Option<String>,
    pub description: Option<String>,
}

impl CreateSubjectRequest {
    pub fn validate(&self) -> Result<()> {
        check_name("name", &self.name)?;
        check_opt_name("code", self.code.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubjectRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
}

impl UpdateSubjectRequest {
    pub fn validate(&self) -> Result<()> {
        check_opt_name("name", self.name.as_ref())?;
        check_opt_name("code", self.code.as_ref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub grade_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub teacher_id: Option<i64>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub academic_year_id: i64,
    pub grade_id: i64,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl CreateClassRequest {
    pub fn validate(&self) -> Result<()> {
        check_name("name", &self.name)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClassRequest {
    pub name: Option<String>,
    pub section_id: Option<i64>,
    pub subject_id: Option<i64>,
    pub teacher_id: Option<i64>,
}

impl UpdateClassRequest {
    pub fn validate(&self) -> Result<()> {
        check_opt_name("name", self.name.as_ref())
    }
}

// 学年列表参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AcademicYearListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_bool")]
    pub is_current: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_academic_year_dates() {
        let req: CreateAcademicYearRequest = serde_json::from_str(
            r#"{"name": "2025/2026", "start_date": "2025-09-01", "end_date": "2026-07-15"}"#,
        )
        .unwrap();
        assert!(req.validate().is_ok());
        assert!(!req.is_current);

        let reversed = CreateAcademicYearRequest {
            start_date: req.end_date,
            end_date: req.start_date,
            ..req.clone()
        };
        assert!(matches!(reversed.validate(), Err(EduHubError::Validation(_))));

        let same_day = CreateAcademicYearRequest {
            end_date: req.start_date,
            ..req
        };
        assert!(same_day.validate().is_err());
    }

    #[test]
    fn test_section_capacity_must_be_positive() {
        let req = CreateSectionRequest {
            grade_id: 1,
            name: "A".to_string(),
            capacity: Some(0),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_blank_names_rejected() {
        let req = CreateSubjectRequest {
            name: "   ".to_string(),
            code: None,
            description: None,
        };
        assert!(req.validate().is_err());
    }
}
