//! 测评实体

use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::GradeType;
use super::to_datetime;
use crate::tenancy::TenantScoped;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assessments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub subject_id: i64,
    pub teacher_id: Option<i64>,
    pub academic_year_id: i64,
    pub class_id: Option<i64>,
    pub grade_type: GradeType,
    #[sea_orm(column_type = "Double")]
    pub max_score: f64,
    pub due_date: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TenantScoped for Entity {
    const RESOURCE: &'static str = "Assessment";

    fn tenant_column() -> Self::Column {
        Column::TenantId
    }

    fn id_column() -> Self::Column {
        Column::Id
    }
}

impl Model {
    pub fn into_assessment(self) -> crate::models::assessments::entities::Assessment {
        crate::models::assessments::entities::Assessment {
            id: self.id,
            title: self.title,
            description: self.description,
            subject_id: self.subject_id,
            teacher_id: self.teacher_id,
            academic_year_id: self.academic_year_id,
            class_id: self.class_id,
            grade_type: self.grade_type,
            max_score: self.max_score,
            due_date: self.due_date.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
