use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::errors::{EduHubError, Result};
use crate::models::tenants::requests::ProvisionTenantRequest;
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::{PasswordService, generate_default_password};

/// 启动后注册到 app_data 的共享组件
pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub jwt: JwtUtils,
    pub passwords: PasswordService,
}

/// 空库时创建默认租户与管理员
///
/// 管理员密码优先取 `ADMIN_PASSWORD`，否则生成一次并打印到日志。
pub async fn seed_bootstrap(
    storage: &Arc<dyn Storage>,
    passwords: &PasswordService,
    config: &AppConfig,
) -> Result<()> {
    let count = storage.count_tenants().await?;
    if count > 0 {
        debug!("Database already has {} tenant(s), skipping bootstrap", count);
        return Ok(());
    }
    info!("No tenants found in database, seeding default tenant...");

    let password = match std::env::var("ADMIN_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => {
            let generated = generate_default_password(config.password.default_length);
            warn!("==========================================================");
            warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
            warn!("  Generated admin password: {}", generated);
            warn!("  Please change it after the first login");
            warn!("==========================================================");
            generated
        }
    };
    let password_hash = passwords.hash_password(&password)?;

    let bootstrap = &config.bootstrap;
    let request = ProvisionTenantRequest {
        name: bootstrap.tenant_name.clone(),
        subdomain: Some(bootstrap.tenant_subdomain.clone()).filter(|s| !s.is_empty()),
        admin_email: bootstrap.admin_email.clone(),
        admin_first_name: "System".to_string(),
        admin_last_name: "Administrator".to_string(),
    };
    request.validate()?;

    let (tenant, admin) = storage.provision_tenant(request, password_hash).await?;
    info!(
        "Default tenant {} ({}) created with admin {} (ID: {})",
        tenant.name, tenant.id, admin.email, admin.id
    );
    Ok(())
}

/// 准备服务器启动的上下文
/// 包括存储、迁移、密码与令牌组件以及空库引导
pub async fn prepare_server_startup(config: &AppConfig) -> Result<StartupContext> {
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| EduHubError::internal("Failed to install rustls crypto provider"))?;

    let storage = crate::storage::create_storage(&config.database).await?;
    warn!("Storage backend initialized and migrations completed");

    let passwords = PasswordService::new(&config.argon2)?;
    let jwt = JwtUtils::new(&config.jwt);

    seed_bootstrap(&storage, &passwords, config).await?;

    Ok(StartupContext {
        storage,
        jwt,
        passwords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Argon2Config;
    use crate::storage::sea_orm_storage::SeaOrmStorage;

    fn fast_passwords() -> PasswordService {
        PasswordService::new(&Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_bootstrap_seeds_once() {
        let storage: Arc<dyn Storage> = Arc::new(SeaOrmStorage::in_memory().await.unwrap());
        let passwords = fast_passwords();
        let config = AppConfig::default();

        seed_bootstrap(&storage, &passwords, &config).await.unwrap();
        assert_eq!(storage.count_tenants().await.unwrap(), 1);

        // 已有租户时不再创建
        seed_bootstrap(&storage, &passwords, &config).await.unwrap();
        assert_eq!(storage.count_tenants().await.unwrap(), 1);
    }
}
