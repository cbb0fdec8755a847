//! 预导入模块，方便使用

pub use super::academic_years::Entity as AcademicYears;
pub use super::admins::Entity as Admins;
pub use super::assessments::Entity as Assessments;
pub use super::classes::Entity as Classes;
pub use super::enrollments::Entity as Enrollments;
pub use super::grades::Entity as Grades;
pub use super::notification_configs::Entity as NotificationConfigs;
pub use super::parent_students::Entity as ParentStudents;
pub use super::parents::Entity as Parents;
pub use super::sections::Entity as Sections;
pub use super::students::Entity as Students;
pub use super::subjects::Entity as Subjects;
pub use super::submissions::Entity as Submissions;
pub use super::teachers::Entity as Teachers;
pub use super::tenants::Entity as Tenants;
pub use super::users::Entity as Users;
