/*!
 * JWT 认证中间件
 *
 * 验证 `Authorization: Bearer <token>`，并通过租户范围内的查询加载调用方。
 *
 * ## 认证流程
 *
 * 1. 校验签名、有效期与令牌类型
 * 2. 用令牌中的租户和用户 ID 做限定租户的查询，不存在或已停用即 401
 * 3. 若请求带有 `X-Tenant-ID` 且与令牌租户不一致，返回 403
 * 4. 把 [`CurrentUser`] 写入请求扩展，处理函数用 `CurrentUser::from_request` 读取
 *
 * ```rust,ignore
 * web::scope("/api/v1/grades")
 *     .wrap(RequireJWT)
 *     .route("", web::get().to(list_grades))
 * ```
 */

use std::{rc::Rc, sync::Arc};

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error, info};

use super::create_error_response;
use crate::errors::EduHubError;
use crate::models::ErrorCode;
use crate::storage::Storage;
use crate::tenancy::CurrentUser;
use crate::utils::coerce_uuid;
use crate::utils::jwt::JwtUtils;

const BEARER_PREFIX: &str = "Bearer ";
const AUTHORIZATION_HEADER: &str = "Authorization";
pub const TENANT_HEADER: &str = "X-Tenant-ID";

#[derive(Clone)]
pub struct RequireJWT;

/// 认证失败的原因，决定响应状态码
enum Rejection {
    Unauthenticated(String),
    TenantMismatch,
    Internal(String),
}

async fn authenticate(req: &ServiceRequest) -> Result<CurrentUser, Rejection> {
    let token = req
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .ok_or_else(|| {
            Rejection::Unauthenticated("Missing or invalid Authorization header".to_string())
        })?;

    let jwt = req
        .app_data::<web::Data<JwtUtils>>()
        .ok_or_else(|| Rejection::Internal("JwtUtils not found in app data".to_string()))?;
    let storage = req
        .app_data::<web::Data<Arc<dyn Storage>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| Rejection::Internal("Storage not found in app data".to_string()))?;

    let claims = jwt.verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        Rejection::Unauthenticated("Invalid JWT token".to_string())
    })?;

    let (Some(user_id), Some(tenant_id)) = (claims.user_id(), claims.tenant_uuid()) else {
        return Err(Rejection::Unauthenticated(
            "Invalid JWT token claims".to_string(),
        ));
    };

    // 请求头声明的租户必须与令牌一致
    if let Some(header) = req.headers().get(TENANT_HEADER) {
        let declared = header
            .to_str()
            .ok()
            .and_then(|raw| coerce_uuid(raw).ok());
        if declared != Some(tenant_id) {
            info!(
                "Tenant header {:?} does not match token tenant {} for user {}",
                header, tenant_id, user_id
            );
            return Err(Rejection::TenantMismatch);
        }
    }

    // 租户停用后已签发的令牌一并失效
    let tenant = storage.get_tenant(tenant_id).await.map_err(|err| match err {
        EduHubError::NotFound(_) => Rejection::Unauthenticated("Tenant not found".to_string()),
        other => Rejection::Internal(other.to_string()),
    })?;
    if !tenant.is_active {
        info!("Rejecting token for user {} of inactive tenant {}", user_id, tenant_id);
        return Err(Rejection::Unauthenticated("Tenant is not active".to_string()));
    }

    let user = storage
        .get_user(tenant_id, user_id)
        .await
        .map_err(|err| match err {
            EduHubError::NotFound(_) => Rejection::Unauthenticated("User not found".to_string()),
            other => Rejection::Internal(other.to_string()),
        })?;

    if !user.is_active {
        return Err(Rejection::Unauthenticated("User is not active".to_string()));
    }

    Ok(CurrentUser::from_user(&user))
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        Box::pin(async move {
            // 预检请求直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                let res = srv.call(req).await?.map_into_left_body();
                return Ok(res);
            }

            match authenticate(&req).await {
                Ok(user) => {
                    debug!(
                        "JWT authentication successful for user {} in tenant {}",
                        user.id, user.tenant_id
                    );
                    req.extensions_mut().insert(user);
                    let res = srv.call(req).await?.map_into_left_body();
                    Ok(res)
                }
                Err(rejection) => {
                    let response = match rejection {
                        Rejection::Unauthenticated(reason) => {
                            info!(
                                "JWT authentication failed for request to {}: {}",
                                req.path(),
                                reason
                            );
                            create_error_response(
                                StatusCode::UNAUTHORIZED,
                                ErrorCode::Unauthorized,
                                &format!("Unauthorized: {reason}"),
                            )
                        }
                        Rejection::TenantMismatch => create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::TenantMismatch,
                            "Tenant header does not match the authenticated tenant",
                        ),
                        Rejection::Internal(reason) => {
                            error!("JWT authentication error: {}", reason);
                            create_error_response(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                ErrorCode::InternalServerError,
                                "Internal server error",
                            )
                        }
                    };
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}
