use config::{Config, ConfigError, Environment, File};

use super::AppConfig;

impl AppConfig {
    /// 加载配置
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            // 首先加载默认配置文件
            .add_source(File::with_name("config").required(false))
            // 然后根据环境加载特定配置文件
            .add_source(
                File::with_name(&format!(
                    "config.{}",
                    std::env::var("APP_ENV").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // 再加载前缀环境变量，例如 EDUHUB_DATABASE__POOL_SIZE
            .add_source(
                Environment::with_prefix("EDUHUB")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        // 常用环境变量直接覆盖
        builder = builder
            .set_override_option("app.environment", std::env::var("APP_ENV").ok())?
            .set_override_option("app.log_level", std::env::var("RUST_LOG").ok())?
            .set_override_option("server.host", std::env::var("SERVER_HOST").ok())?
            .set_override_option("server.port", std::env::var("SERVER_PORT").ok())?
            .set_override_option("server.unix_socket_path", std::env::var("UNIX_SOCKET").ok())?
            .set_override_option("server.workers", std::env::var("CPU_COUNT").ok())?
            .set_override_option("jwt.secret", std::env::var("JWT_SECRET").ok())?
            .set_override_option("database.url", std::env::var("DATABASE_URL").ok())?
            .set_override_option("platform.api_key", std::env::var("PLATFORM_API_KEY").ok())?;

        let config = builder.build()?;
        let mut app_config: AppConfig = config.try_deserialize()?;
        app_config.normalize()?;

        Ok(app_config)
    }

    /// 补全派生值并检查必填项
    fn normalize(&mut self) -> Result<(), ConfigError> {
        // 处理工作线程数
        if self.server.workers == 0 {
            self.server.workers = num_cpus::get().min(self.server.max_workers.max(1));
        }

        // 固定密钥只在开发环境补全，其余环境必须显式配置
        if self.jwt.secret.is_empty() {
            if !self.is_development() {
                return Err(ConfigError::Message(format!(
                    "jwt.secret must be set in the {} environment",
                    self.app.environment
                )));
            }
            self.jwt.secret = "eduhub-development-secret".to_string();
        }

        if !(0.0..=1.0).contains(&self.password.min_strength) {
            return Err(ConfigError::Message(format!(
                "password.min_strength must be within [0, 1], got {}",
                self.password.min_strength
            )));
        }

        Ok(())
    }

    /// 检查是否为生产环境
    pub fn is_production(&self) -> bool {
        self.app.environment == "production"
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.app.environment == "development"
    }

    /// 获取服务器绑定地址
    pub fn server_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 获取 Unix 套接字路径 (如果配置了)
    #[cfg(unix)]
    pub fn unix_socket_path(&self) -> Option<&str> {
        if self.server.unix_socket_path.is_empty() {
            None
        } else {
            Some(&self.server.unix_socket_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_usable() {
        let mut config = AppConfig::default();
        config.normalize().unwrap();
        assert!(config.server.workers >= 1);
        assert!(!config.jwt.secret.is_empty());
        assert_eq!(config.server_bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_production_requires_secret() {
        let mut config = AppConfig::default();
        config.app.environment = "production".to_string();
        assert!(config.normalize().is_err());
    }

    #[test]
    fn test_only_development_gets_fallback_secret() {
        for environment in ["staging", "test", ""] {
            let mut config = AppConfig::default();
            config.app.environment = environment.to_string();
            config.jwt.secret = String::new();
            assert!(config.normalize().is_err(), "{environment}");
        }

        let mut config = AppConfig::default();
        config.app.environment = "staging".to_string();
        config.jwt.secret = "staging-secret".to_string();
        config.normalize().unwrap();
        assert_eq!(config.jwt.secret, "staging-secret");
    }

    #[test]
    fn test_rejects_out_of_range_strength() {
        let mut config = AppConfig::default();
        config.password.min_strength = 1.5;
        assert!(config.normalize().is_err());
    }
}
