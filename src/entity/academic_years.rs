//! 学年实体

use sea_orm::entity::prelude::*;

use super::to_datetime;
use crate::tenancy::TenantScoped;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "academic_years")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub tenant_id: Uuid,
    pub name: String,
    pub start_date: Date,
    pub end_date: Date,
    pub is_current: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TenantScoped for Entity {
    const RESOURCE: &'static str = "Academic year";

    fn tenant_column() -> Self::Column {
        Column::TenantId
    }

    fn id_column() -> Self::Column {
        Column::Id
    }
}

impl Model {
    pub fn into_academic_year(self) -> crate::models::academics::entities::AcademicYear {
        crate::models::academics::entities::AcademicYear {
            id: self.id,
            name: self.name,
            start_date: self.start_date,
            end_date: self.end_date,
            is_current: self.is_current,
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
