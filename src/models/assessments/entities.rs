use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::sea_orm_active_enums::GradeType;
use crate::errors::{EduHubError, Result};

// 测评
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub academic_year_id: i64,
    pub class_id: Option<i64>,
    pub grade_type: GradeType,
    pub max_score: f64,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 提交状态
///
/// 允许的流转：
/// - DRAFT → SUBMITTED
/// - SUBMITTED → GRADED / RETURNED
/// - GRADED → RETURNED
/// - RETURNED → SUBMITTED
///
/// 其余（包括 DRAFT → GRADED 以及回到 DRAFT）一律拒绝。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    Draft,
    Submitted,
    Graded,
    Returned,
}

impl SubmissionStatus {
    pub const DRAFT: &'static str = "DRAFT";
    pub const SUBMITTED: &'static str = "SUBMITTED";
    pub const GRADED: &'static str = "GRADED";
    pub const RETURNED: &'static str = "RETURNED";

    pub fn as_str(&self) -> &'static str {
        match self {
            SubmissionStatus::Draft => Self::DRAFT,
            SubmissionStatus::Submitted => Self::SUBMITTED,
            SubmissionStatus::Graded => Self::GRADED,
            SubmissionStatus::Returned => Self::RETURNED,
        }
    }

    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Draft, Submitted)
                | (Submitted, Graded)
                | (Submitted, Returned)
                | (Graded, Returned)
                | (Returned, Submitted)
        )
    }

    /// 校验流转，非法时返回 Validation 错误
    pub fn transition(&self, next: SubmissionStatus) -> Result<SubmissionStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(EduHubError::validation(format!(
                "Submission cannot move from {self} to {next}"
            )))
        }
    }

    /// 只有草稿和被退回的提交可以修改内容
    pub fn is_editable(&self) -> bool {
        matches!(self, SubmissionStatus::Draft | SubmissionStatus::Returned)
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SubmissionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            Self::DRAFT => Ok(SubmissionStatus::Draft),
            Self::SUBMITTED => Ok(SubmissionStatus::Submitted),
            Self::GRADED => Ok(SubmissionStatus::Graded),
            Self::RETURNED => Ok(SubmissionStatus::Returned),
            _ => Err(format!("Invalid submission status: {s}")),
        }
    }
}

// 学生对测评的提交
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assessment_id: i64,
    pub student_id: i64,
    pub content: Option<String>,
    pub status: SubmissionStatus,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub submitted_at: Option<DateTime<Utc>>,
    pub graded_at: Option<DateTime<Utc>>,
    pub graded_by: Option<i64>,
    pub returned_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::SubmissionStatus::*;
    use super::*;

    const ALL: [SubmissionStatus; 4] = [Draft, Submitted, Graded, Returned];

    #[test]
    fn test_allowed_transitions() {
        assert!(Draft.can_transition_to(Submitted));
        assert!(Submitted.can_transition_to(Graded));
        assert!(Submitted.can_transition_to(Returned));
        assert!(Graded.can_transition_to(Returned));
        assert!(Returned.can_transition_to(Submitted));
    }

    #[test]
    fn test_draft_cannot_be_graded_directly() {
        assert!(matches!(
            Draft.transition(Graded),
            Err(EduHubError::Validation(_))
        ));
    }

    #[test]
    fn test_nothing_returns_to_draft() {
        for from in ALL {
            assert!(!from.can_transition_to(Draft), "{from} -> DRAFT");
        }
    }

    #[test]
    fn test_graded_is_not_resubmitted_without_return() {
        assert!(!Graded.can_transition_to(Submitted));
        assert!(!Graded.can_transition_to(Graded));
    }

    #[test]
    fn test_editable_states() {
        let editable: Vec<_> = ALL.into_iter().filter(|s| s.is_editable()).collect();
        assert_eq!(editable, vec![Draft, Returned]);
    }

    #[test]
    fn test_wire_names() {
        for status in ALL {
            assert_eq!(status.as_str().parse::<SubmissionStatus>().unwrap(), status);
            assert_eq!(
                serde_json::to_value(status).unwrap(),
                serde_json::Value::String(status.as_str().to_string())
            );
        }
    }
}
