use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::entities::SubmissionStatus;
use crate::entity::sea_orm_active_enums::GradeType;
use crate::errors::{EduHubError, Result};
use crate::models::common::PaginationQuery;
use crate::models::common::query::deserialize_opt_i64;
use crate::utils::validate::validate_name;

const TITLE_MAX: usize = 200;

fn check_max_score(max_score: f64) -> Result<()> {
    if !max_score.is_finite() || max_score <= 0.0 {
        return Err(EduHubError::validation("max_score must be greater than 0"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssessmentRequest {
    pub title: String,
    pub description: Option<String>,
    pub subject_id: i64,
    /// 教师创建时为空则取自己
    pub teacher_id: Option<i64>,
    pub academic_year_id: i64,
    pub class_id: Option<i64>,
    pub grade_type: GradeType,
    pub max_score: f64,
    pub due_date: Option<DateTime<Utc>>,
}

impl CreateAssessmentRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("title", &self.title, TITLE_MAX).map_err(EduHubError::validation)?;
        check_max_score(self.max_score)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssessmentRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub class_id: Option<i64>,
    pub grade_type: Option<GradeType>,
    pub max_score: Option<f64>,
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateAssessmentRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            validate_name("title", title, TITLE_MAX).map_err(EduHubError::validation)?;
        }
        if let Some(max_score) = self.max_score {
            check_max_score(max_score)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AssessmentListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub subject_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub class_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub academic_year_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub teacher_id: Option<i64>,
    pub grade_type: Option<GradeType>,
}

// 创建草稿；学生调用时 student_id 取自己
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubmissionRequest {
    pub assessment_id: i64,
    pub student_id: Option<i64>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateSubmissionContentRequest {
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GradeSubmissionRequest {
    pub score: f64,
    pub feedback: Option<String>,
}

impl GradeSubmissionRequest {
    /// 分数必须在 [0, max_score] 内
    pub fn validate(&self, max_score: f64) -> Result<()> {
        if !self.score.is_finite() || self.score < 0.0 || self.score > max_score {
            return Err(EduHubError::validation(format!(
                "score must be between 0 and {max_score}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReturnSubmissionRequest {
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionListParams {
    #[serde(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub assessment_id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_opt_i64")]
    pub student_id: Option<i64>,
    pub status: Option<SubmissionStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        let req = GradeSubmissionRequest {
            score: 10.0,
            feedback: None,
        };
        assert!(req.validate(10.0).is_ok());
        assert!(req.validate(9.5).is_err());

        let negative = GradeSubmissionRequest {
            score: -0.5,
            feedback: None,
        };
        assert!(negative.validate(10.0).is_err());
    }

    #[test]
    fn test_assessment_requires_positive_max_score() {
        let req: CreateAssessmentRequest = serde_json::from_str(
            r#"{"title": "Unit 1", "subject_id": 1, "academic_year_id": 1,
                "grade_type": "PARTICIPATION", "max_score": 0}"#,
        )
        .unwrap();
        assert_eq!(req.grade_type, GradeType::Participation);
        assert!(matches!(req.validate(), Err(EduHubError::Validation(_))));
    }
}
