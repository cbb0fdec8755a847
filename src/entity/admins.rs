//! 管理员扩展

use sea_orm::entity::prelude::*;

use crate::tenancy::TenantScoped;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: i64,
    pub tenant_id: Uuid,
    pub job_title: Option<String>,
    pub is_super_admin: bool,
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
    const RESOURCE: &'static str = "Admin";

    fn tenant_column() -> Self::Column {
        Column::TenantId
    }

    fn id_column() -> Self::Column {
        Column::UserId
    }
}

impl Model {
    pub fn into_profile(self) -> crate::models::users::entities::AdminProfile {
        crate::models::users::entities::AdminProfile {
            job_title: self.job_title,
            is_super_admin: self.is_super_admin,
        }
    }
}
