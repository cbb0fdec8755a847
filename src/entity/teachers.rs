//! 教师扩展（邮箱冗余存储，用于租户内唯一约束）

use sea_orm::entity::prelude::*;

use crate::tenancy::TenantScoped;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub tenant_id: Uuid,
    pub email: String,
    pub department: Option<String>,
    pub qualification: Option<String>,
    pub hire_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TenantScoped for Entity {
    const RESOURCE: &'static str = "Teacher";

    fn tenant_column() -> Self::Column {
        Column::TenantId
    }

    fn id_column() -> Self::Column {
        Column::UserId
    }
}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::TeacherProfile {
        crate::models::users::entities::TeacherProfile {
            department: self.department,
            qualification: self.qualification,
            hire_date: self.hire_date,
        }
    }
}
