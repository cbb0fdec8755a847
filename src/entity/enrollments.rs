//! 注册实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::tenancy::TenantScoped;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: Uuid,
    pub student_id: i64,
    pub academic_year_id: i64,
    pub grade_id: i64,
    pub section_id: Option<i64>,
    pub class_id: Option<i64>,
    pub enrollment_date: Date,
    pub is_active: bool,
    pub drop_date: Option<Date>,
    pub completion_date: Option<Date>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::students::Entity",
        from = "Column::StudentId",
        to = "super::students::Column::UserId"
    )]
    Student,
    #[sea_orm(
        belongs_to = "super::academic_years::Entity",
        from = "Column::AcademicYearId",
        to = "super::academic_years::Column::Id"
    )]
    AcademicYear,
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
}

impl Related<super::students::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TenantScoped for Entity {
    const RESOURCE: &'static str = "Enrollment";

    fn tenant_column() -> Self::Column {
        Column::TenantId
    }

    fn id_column() -> Self::Column {
        Column::Id
    }
}

impl Model {
    pub fn into_enrollment(self) -> crate::models::enrollments::entities::Enrollment {
        use crate::models::enrollments::entities::{Enrollment, EnrollmentStatus};

        let status = EnrollmentStatus::derive(self.is_active, self.completion_date.is_some());

        Enrollment {
            id: self.id,
            student_id: self.student_id,
            academic_year_id: self.academic_year_id,
            grade_id: self.grade_id,
            section_id: self.section_id,
            class_id: self.class_id,
            enrollment_date: self.enrollment_date,
            is_active: self.is_active,
            status,
            drop_date: self.drop_date,
            completion_date: self.completion_date,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
