use uuid::Uuid;

use crate::errors::{EduHubError, Result};

/// 把外部输入转换为租户 UUID
///
/// 接受带连字符、无连字符、花括号以及 `urn:uuid:` 形式，首尾空白会被忽略。
pub fn coerce_uuid(raw: &str) -> Result<Uuid> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EduHubError::validation("Tenant id must not be empty"));
    }

    Uuid::parse_str(trimmed)
        .map_err(|_| EduHubError::validation(format!("Invalid tenant id: {trimmed}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HYPHENATED: &str = "67e55044-10b1-426f-9247-bb680e5fe0c8";

    #[test]
    fn test_accepts_all_textual_forms() {
        let expected = Uuid::parse_str(HYPHENATED).unwrap();
        for input in [
            HYPHENATED,
            "67e5504410b1426f9247bb680e5fe0c8",
            "{67e55044-10b1-426f-9247-bb680e5fe0c8}",
            "urn:uuid:67e55044-10b1-426f-9247-bb680e5fe0c8",
            "  67E55044-10B1-426F-9247-BB680E5FE0C8 \n",
        ] {
            assert_eq!(coerce_uuid(input).unwrap(), expected, "input: {input:?}");
        }
    }

    #[test]
    fn test_rejects_garbage() {
        let err = coerce_uuid("not-a-uuid").unwrap_err();
        assert!(matches!(err, EduHubError::Validation(_)));
        assert!(coerce_uuid("").is_err());
    }
}
