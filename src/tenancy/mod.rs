//! 租户隔离
//!
//! 所有租户数据表的读写都必须经过这里的函数，查询条件总是同时包含主键和 `tenant_id`。
//! 其他租户的行与不存在的行对调用方不可区分，统一返回 NotFound。
//!
//! - [`scoped_lookup`]：按 (tenant, id) 读取，不存在即 NotFound
//! - [`scoped_mutate`]：先 `scoped_lookup` 再修改，租户列不可被改写
//! - [`scoped_reference`]：写入时校验引用的实体属于同一租户，否则 Validation
//! - [`scoped_delete`]：先 `scoped_lookup` 再删除

mod context;

pub use context::CurrentUser;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, Select,
};
use tracing::debug;
use uuid::Uuid;

use crate::errors::{EduHubError, Result};

/// 带租户列的实体
pub trait TenantScoped: EntityTrait {
    /// 出现在错误信息中的资源名
    const RESOURCE: &'static str;

    fn tenant_column() -> Self::Column;

    fn id_column() -> Self::Column;
}

/// 限定租户的查询起点
pub fn scoped_select<E: TenantScoped>(tenant_id: Uuid) -> Select<E> {
    E::find().filter(E::tenant_column().eq(tenant_id))
}

/// 按 (tenant, id) 查找，不存在返回 `None`
pub async fn scoped_find<E, C>(db: &C, tenant_id: Uuid, id: i64) -> Result<Option<E::Model>>
where
    E: TenantScoped,
    C: ConnectionTrait,
{
    scoped_select::<E>(tenant_id)
        .filter(E::id_column().eq(id))
        .one(db)
        .await
        .map_err(|e| EduHubError::from_db(&format!("查询{}失败", E::RESOURCE), e))
}

/// 按 (tenant, id) 查找，不存在或属于其他租户时返回 NotFound
pub async fn scoped_lookup<E, C>(db: &C, tenant_id: Uuid, id: i64) -> Result<E::Model>
where
    E: TenantScoped,
    C: ConnectionTrait,
{
    scoped_find::<E, C>(db, tenant_id, id).await?.ok_or_else(|| {
        debug!("{} {} not visible to tenant {}", E::RESOURCE, id, tenant_id);
        EduHubError::not_found(format!("{} not found", E::RESOURCE))
    })
}

/// 校验写入中引用的实体属于同一租户
///
/// 与 [`scoped_lookup`] 的区别只在于错误类型：被引用的实体不可见属于输入错误。
pub async fn scoped_reference<E, C>(db: &C, tenant_id: Uuid, id: i64) -> Result<E::Model>
where
    E: TenantScoped,
    C: ConnectionTrait,
{
    scoped_find::<E, C>(db, tenant_id, id).await?.ok_or_else(|| {
        EduHubError::validation(format!(
            "{} {} does not exist in this tenant",
            E::RESOURCE,
            id
        ))
    })
}

/// 可选引用的校验
pub async fn scoped_reference_opt<E, C>(
    db: &C,
    tenant_id: Uuid,
    id: Option<i64>,
) -> Result<Option<E::Model>>
where
    E: TenantScoped,
    C: ConnectionTrait,
{
    match id {
        Some(id) => scoped_reference::<E, C>(db, tenant_id, id).await.map(Some),
        None => Ok(None),
    }
}

/// 修改租户内的实体
///
/// `changes` 可以返回错误中止修改（此时不写库）。租户列在写入前被重置为调用方租户。
pub async fn scoped_mutate<E, C, F>(
    db: &C,
    tenant_id: Uuid,
    id: i64,
    changes: F,
) -> Result<E::Model>
where
    E: TenantScoped,
    C: ConnectionTrait,
    E::Model: IntoActiveModel<E::ActiveModel>,
    E::ActiveModel: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send,
    F: FnOnce(&E::Model, &mut E::ActiveModel) -> Result<()>,
{
    let current = scoped_lookup::<E, C>(db, tenant_id, id).await?;
    let mut active = current.clone().into_active_model();
    changes(&current, &mut active)?;
    active.set(E::tenant_column(), tenant_id.into());

    active
        .update(db)
        .await
        .map_err(|e| EduHubError::from_db(&format!("更新{}失败", E::RESOURCE), e))
}

/// 删除租户内的实体
pub async fn scoped_delete<E, C>(db: &C, tenant_id: Uuid, id: i64) -> Result<()>
where
    E: TenantScoped,
    C: ConnectionTrait,
{
    scoped_lookup::<E, C>(db, tenant_id, id).await?;

    E::delete_many()
        .filter(E::tenant_column().eq(tenant_id))
        .filter(E::id_column().eq(id))
        .exec(db)
        .await
        .map_err(|e| EduHubError::from_db(&format!("删除{}失败", E::RESOURCE), e))?;

    Ok(())
}
