pub mod academics;
pub mod assessments;
pub mod auth;
pub mod enrollments;
pub mod submissions;
pub mod tenants;
pub mod users;

pub use academics::AcademicService;
pub use assessments::AssessmentService;
pub use auth::AuthService;
pub use enrollments::EnrollmentService;
pub use submissions::SubmissionService;
pub use tenants::TenantService;
pub use users::UserService;

use std::sync::Arc;

use actix_web::{HttpRequest, web};

use crate::errors::{EduHubError, Result};
use crate::models::users::entities::UserType;
use crate::storage::Storage;
use crate::tenancy::CurrentUser;

/// 取出启动时注册到 app_data 的共享组件
pub(crate) fn app_data<T: ?Sized + 'static>(request: &HttpRequest) -> Result<web::Data<T>> {
    request.app_data::<web::Data<T>>().cloned().ok_or_else(|| {
        EduHubError::internal(format!(
            "{} not found in app data",
            std::any::type_name::<T>()
        ))
    })
}

pub(crate) fn storage_from(request: &HttpRequest) -> Result<Arc<dyn Storage>> {
    app_data::<Arc<dyn Storage>>(request).map(|data| data.get_ref().clone())
}

/// 学生只能访问自己的记录，家长只能访问名下学生，教职工不受限
pub(crate) async fn ensure_student_visible(
    storage: &Arc<dyn Storage>,
    user: &CurrentUser,
    student_id: i64,
) -> Result<()> {
    let allowed = match user.user_type {
        UserType::Admin | UserType::Teacher => true,
        UserType::Student => user.id == student_id,
        UserType::Parent => {
            storage
                .is_parent_of(user.tenant_id, user.id, student_id)
                .await?
        }
    };

    if allowed {
        Ok(())
    } else {
        Err(EduHubError::permission_denied(
            "Not allowed to access records of this student",
        ))
    }
}

/// 按调用方身份收窄列表的学生过滤条件
///
/// 学生强制只看自己；家长必须指定名下的某个学生。
pub(crate) async fn restrict_student_filter(
    storage: &Arc<dyn Storage>,
    user: &CurrentUser,
    requested: Option<i64>,
) -> Result<Option<i64>> {
    match user.user_type {
        UserType::Admin | UserType::Teacher => Ok(requested),
        UserType::Student => match requested {
            Some(id) if id != user.id => Err(EduHubError::permission_denied(
                "Students can only view their own records",
            )),
            _ => Ok(Some(user.id)),
        },
        UserType::Parent => {
            let student_id = requested.ok_or_else(|| {
                EduHubError::validation("student_id is required for parent accounts")
            })?;
            ensure_student_visible(storage, user, student_id).await?;
            Ok(Some(student_id))
        }
    }
}
