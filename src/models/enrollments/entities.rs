use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 由 `is_active` 与结业日期推导出的状态，不单独存储
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Active,
    Dropped,
    Completed,
}

impl EnrollmentStatus {
    pub fn derive(is_active: bool, completed: bool) -> Self {
        match (is_active, completed) {
            (true, _) => EnrollmentStatus::Active,
            (false, true) => EnrollmentStatus::Completed,
            (false, false) => EnrollmentStatus::Dropped,
        }
    }
}

// 学生在某学年的注册记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    pub id: i64,
    pub student_id: i64,
    pub academic_year_id: i64,
    pub grade_id: i64,
    pub section_id: Option<i64>,
    pub class_id: Option<i64>,
    pub enrollment_date: NaiveDate,
    pub is_active: bool,
    pub status: EnrollmentStatus,
    pub drop_date: Option<NaiveDate>,
    pub completion_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_derivation() {
        assert_eq!(EnrollmentStatus::derive(true, false), EnrollmentStatus::Active);
        assert_eq!(EnrollmentStatus::derive(false, false), EnrollmentStatus::Dropped);
        assert_eq!(EnrollmentStatus::derive(false, true), EnrollmentStatus::Completed);
    }
}
