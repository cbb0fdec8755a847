use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

const ACCESS_TOKEN_TYPE: &str = "access";

// JWT Claims 结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // Subject (user ID)
    pub tenant_id: String,  // 所属租户
    pub user_type: String,  // 身份类型
    pub token_type: String, // token类型
    pub exp: usize,         // Expiration time (时间戳)
    pub iat: usize,         // Issued at (签发时间)
}

impl Claims {
    pub fn user_id(&self) -> Option<i64> {
        self.sub.parse().ok()
    }

    pub fn tenant_uuid(&self) -> Option<Uuid> {
        Uuid::parse_str(&self.tenant_id).ok()
    }
}

/// JWT 工具，密钥和有效期来自启动时的配置
#[derive(Clone)]
pub struct JwtUtils {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_token_expiry: chrono::Duration,
}

impl JwtUtils {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_token_expiry: chrono::Duration::minutes(config.access_token_expiry),
        }
    }

    /// 访问令牌有效期（秒）
    pub fn access_token_expiry_secs(&self) -> i64 {
        self.access_token_expiry.num_seconds()
    }

    // 生成 Access Token
    pub fn generate_access_token(
        &self,
        user_id: i64,
        tenant_id: Uuid,
        user_type: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = chrono::Utc::now();
        let expiration = now + self.access_token_expiry;

        let claims = Claims {
            sub: user_id.to_string(),
            tenant_id: tenant_id.to_string(),
            user_type: user_type.to_string(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
            exp: expiration.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    // 验证 JWT token
    pub fn verify_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|token_data| token_data.claims)
    }

    // 验证 Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let claims = self.verify_token(token)?;
        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(jsonwebtoken::errors::Error::from(
                jsonwebtoken::errors::ErrorKind::InvalidToken,
            ));
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utils(secret: &str) -> JwtUtils {
        JwtUtils::new(&JwtConfig {
            secret: secret.to_string(),
            access_token_expiry: 15,
        })
    }

    #[test]
    fn test_round_trip_carries_tenant() {
        let jwt = utils("test-secret");
        let tenant = Uuid::new_v4();
        let token = jwt.generate_access_token(7, tenant, "teacher").unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id(), Some(7));
        assert_eq!(claims.tenant_uuid(), Some(tenant));
        assert_eq!(claims.user_type, "teacher");
    }

    #[test]
    fn test_rejects_foreign_signature() {
        let token = utils("secret-a")
            .generate_access_token(1, Uuid::new_v4(), "admin")
            .unwrap();
        assert!(utils("secret-b").verify_access_token(&token).is_err());
    }

    #[test]
    fn test_expiry_secs() {
        assert_eq!(utils("s").access_token_expiry_secs(), 900);
    }
}
