//! 凭据辅助：哈希、校验、默认密码生成和强度评分

use argon2::password_hash::{SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::config::Argon2Config;
use crate::errors::{EduHubError, Result};

pub const MIN_DEFAULT_LENGTH: usize = 8;
pub const MAX_DEFAULT_LENGTH: usize = 12;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
/// 默认密码和强度评分共用的符号集
pub const SYMBOLS: &[u8] = b"!@#$%^&*()_+-=[]{}|;:,.<>?";

/// 密码服务，参数在启动时由配置构造一次
#[derive(Clone)]
pub struct PasswordService {
    params: Params,
    // 同参数的占位哈希，查无此人时也走一次完整校验
    dummy_hash: String,
}

impl PasswordService {
    pub fn new(config: &Argon2Config) -> Result<Self> {
        let params = Params::new(
            config.memory_cost,
            config.time_cost,
            config.parallelism,
            None,
        )
        .map_err(|e| EduHubError::password_hash(format!("Argon2 参数错误: {e}")))?;

        let mut service = Self {
            params,
            dummy_hash: String::new(),
        };
        service.dummy_hash = service.hash_password(&generate_default_password(MAX_DEFAULT_LENGTH))?;
        Ok(service)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// 哈希密码
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| EduHubError::password_hash(format!("密码哈希失败: {e}")))?;
        Ok(hash.to_string())
    }

    /// 验证密码，任何失败都只返回 false
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed_hash) => self
                .argon2()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok(),
            Err(_) => false,
        }
    }

    /// 对占位哈希做一次校验，耗时与真实校验一致，结果恒为失败
    pub fn verify_against_dummy(&self, password: &str) -> bool {
        let _ = self.verify_password(password, &self.dummy_hash);
        false
    }
}

/// 生成默认密码
///
/// 长度钳制到 [8, 12]，四类字符各至少一个，其余从全集均匀抽取，最后随机打乱。
/// 随机源为线程本地 CSPRNG。
pub fn generate_default_password(length: usize) -> String {
    let length = length.clamp(MIN_DEFAULT_LENGTH, MAX_DEFAULT_LENGTH);
    let mut rng = rand::rng();

    let pick = |set: &[u8], rng: &mut rand::rngs::ThreadRng| set[rng.random_range(0..set.len())];

    let mut chars = vec![
        pick(UPPERCASE, &mut rng),
        pick(LOWERCASE, &mut rng),
        pick(DIGITS, &mut rng),
        pick(SYMBOLS, &mut rng),
    ];

    let all: Vec<u8> = [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS].concat();
    while chars.len() < length {
        chars.push(pick(&all, &mut rng));
    }

    chars.shuffle(&mut rng);
    chars.into_iter().map(char::from).collect()
}

/// 密码强度评分 [0.0, 1.0]
///
/// 长度档位：>=12 得 0.25，>=8 得 0.15，>=6 得 0.05；
/// 大写、小写、数字、符号各 0.25。
pub fn calculate_password_strength(password: &str) -> f64 {
    let length = password.chars().count();
    let mut score = if length >= 12 {
        0.25
    } else if length >= 8 {
        0.15
    } else if length >= 6 {
        0.05
    } else {
        0.0
    };

    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 0.25;
    }
    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 0.25;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 0.25;
    }
    if password
        .chars()
        .any(|c| c.is_ascii() && SYMBOLS.contains(&(c as u8)))
    {
        score += 0.25;
    }

    f64::min(score, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn has_all_classes(password: &str) -> bool {
        let bytes = password.as_bytes();
        bytes.iter().any(|b| UPPERCASE.contains(b))
            && bytes.iter().any(|b| LOWERCASE.contains(b))
            && bytes.iter().any(|b| DIGITS.contains(b))
            && bytes.iter().any(|b| SYMBOLS.contains(b))
    }

    fn fast_service() -> PasswordService {
        PasswordService::new(&Argon2Config {
            memory_cost: 1024,
            time_cost: 1,
            parallelism: 1,
        })
        .unwrap()
    }

    #[test]
    fn test_default_password_length_is_clamped() {
        for (requested, expected) in [(0, 8), (5, 8), (8, 8), (10, 10), (12, 12), (64, 12)] {
            let password = generate_default_password(requested);
            assert_eq!(password.len(), expected, "requested {requested}");
        }
    }

    #[test]
    fn test_default_password_covers_all_classes() {
        for _ in 0..200 {
            let password = generate_default_password(8);
            assert!(has_all_classes(&password), "missing class in {password}");
        }
    }

    #[test]
    fn test_default_passwords_differ() {
        let a = generate_default_password(12);
        let b = generate_default_password(12);
        assert_ne!(a, b);
    }

    #[test]
    fn test_strength_table() {
        assert_eq!(calculate_password_strength(""), 0.0);
        assert_eq!(calculate_password_strength("abcde"), 0.25);
        assert!((calculate_password_strength("abcdef") - 0.30).abs() < 1e-9);
        assert!((calculate_password_strength("abcdefgh") - 0.40).abs() < 1e-9);
        // 超过 1.0 的部分被截断
        assert_eq!(calculate_password_strength("Abcdefgh1!"), 1.0);
        assert_eq!(calculate_password_strength("Abcdefgh12!@xyzw"), 1.0);
    }

    #[test]
    fn test_strength_is_monotonic_in_classes() {
        let steps = ["abcdefgh", "Abcdefgh", "Abcdefg1", "Abcdef1!"];
        let scores: Vec<f64> = steps.iter().map(|p| calculate_password_strength(p)).collect();
        assert!(scores.windows(2).all(|w| w[0] <= w[1]), "{scores:?}");
    }

    #[test]
    fn test_generated_password_is_strong() {
        let password = generate_default_password(12);
        assert_eq!(calculate_password_strength(&password), 1.0);
    }

    #[test]
    fn test_hash_and_verify() {
        let service = fast_service();
        let hash = service.hash_password("S3cure!pass").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(service.verify_password("S3cure!pass", &hash));
        assert!(!service.verify_password("wrong", &hash));
        assert!(!service.verify_password("S3cure!pass", "not-a-hash"));
    }

    #[test]
    fn test_dummy_hash_uses_configured_params() {
        let service = fast_service();
        assert!(service.dummy_hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        let parsed = PasswordHash::new(&service.dummy_hash).unwrap();
        assert_eq!(parsed.algorithm, Algorithm::Argon2id.ident());
        assert!(!service.verify_against_dummy("S3cure!pass"));
        assert!(!service.verify_against_dummy(""));
    }

    #[test]
    fn test_invalid_params_rejected() {
        let result = PasswordService::new(&Argon2Config {
            memory_cost: 1,
            time_cost: 0,
            parallelism: 1,
        });
        assert!(result.is_err());
    }
}
