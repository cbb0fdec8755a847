use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
/// 数据库偏移量上限（SQL 端为有符号 64 位）
pub const MAX_SKIP: u64 = i64::MAX as u64;

// 分页查询参数
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PaginationQuery {
    #[serde(default, deserialize_with = "deserialize_string_to_u64")]
    pub skip: u64,
    #[serde(
        default = "default_limit",
        deserialize_with = "deserialize_string_to_u64"
    )]
    pub limit: u64,
}

impl PaginationQuery {
    /// 钳制后的每页条数
    pub fn effective_limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    /// 钳制后的偏移量
    pub fn effective_skip(&self) -> u64 {
        self.skip.min(MAX_SKIP)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// 列表响应信封
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub skip: u64,
    pub limit: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, query: &PaginationQuery) -> Self {
        let skip = query.effective_skip();
        let has_next = skip.saturating_add(items.len() as u64) < total;
        Self {
            items,
            total,
            skip,
            limit: query.effective_limit(),
            has_next,
            has_prev: skip > 0,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            skip: self.skip,
            limit: self.limit,
            has_next: self.has_next,
            has_prev: self.has_prev,
        }
    }
}

// 自定义反序列化函数，支持字符串到u64的转换
fn deserialize_string_to_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{Error, Unexpected, Visitor};
    use std::fmt;

    struct U64Visitor;

    impl<'de> Visitor<'de> for U64Visitor {
        type Value = u64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a non-negative integer or a string containing one")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            u64::try_from(value)
                .map_err(|_| Error::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: Error,
        {
            if value > MAX_SKIP {
                return Err(Error::invalid_value(Unexpected::Unsigned(value), &self));
            }
            Ok(value)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: Error,
        {
            let parsed: u64 = value
                .trim()
                .parse()
                .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))?;
            self.visit_u64(parsed)
        }
    }

    deserializer.deserialize_any(U64Visitor)
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query: PaginationQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query.skip, 0);
        assert_eq!(query.effective_limit(), 20);
    }

    #[test]
    fn test_accepts_numeric_strings() {
        let query: PaginationQuery =
            serde_json::from_str(r#"{"skip": "40", "limit": "10"}"#).unwrap();
        assert_eq!(query.skip, 40);
        assert_eq!(query.limit, 10);
    }

    #[test]
    fn test_rejects_negative() {
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"skip": -1}"#).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_skip() {
        assert!(
            serde_json::from_str::<PaginationQuery>(r#"{"skip": "9223372036854775808"}"#).is_err()
        );
        assert!(serde_json::from_str::<PaginationQuery>(r#"{"skip": 18446744073709551615}"#).is_err());
        let max: PaginationQuery =
            serde_json::from_str(r#"{"skip": "9223372036854775807"}"#).unwrap();
        assert_eq!(max.skip, MAX_SKIP);
    }

    #[test]
    fn test_skip_is_clamped() {
        let query = PaginationQuery {
            skip: u64::MAX,
            limit: 10,
        };
        assert_eq!(query.effective_skip(), MAX_SKIP);
        let page: Page<i32> = Page::new(vec![], 3, &query);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }

    #[test]
    fn test_limit_is_clamped() {
        let big = PaginationQuery {
            skip: 0,
            limit: 1000,
        };
        assert_eq!(big.effective_limit(), 100);
        let zero = PaginationQuery { skip: 0, limit: 0 };
        assert_eq!(zero.effective_limit(), 1);
    }

    #[test]
    fn test_page_flags() {
        let query = PaginationQuery { skip: 0, limit: 2 };
        let page = Page::new(vec![1, 2], 5, &query);
        assert!(page.has_next);
        assert!(!page.has_prev);

        let query = PaginationQuery { skip: 4, limit: 2 };
        let page = Page::new(vec![5], 5, &query);
        assert!(!page.has_next);
        assert!(page.has_prev);
    }
}
