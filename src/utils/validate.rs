use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("Invalid email regex")
});

static HEX_COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("Invalid color regex"));

// DNS 标签：小写字母数字，中间可有连字符
static SUBDOMAIN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("Invalid subdomain regex"));

static DOMAIN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?\.)+[A-Za-z]{2,63}$")
        .expect("Invalid domain regex")
});

static PLACEHOLDER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([A-Za-z_]+)\}").expect("Invalid placeholder regex"));

/// 消息模板最大长度（字符）
pub const TEMPLATE_MAX_LEN: usize = 1000;

/// 消息模板允许使用的占位符
pub const TEMPLATE_PLACEHOLDERS: &[&str] = &[
    "school_name",
    "student_name",
    "parent_name",
    "class_name",
    "assessment_title",
    "due_date",
    "score",
    "max_score",
    "password",
    "login_url",
];

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.len() > 254 || !EMAIL_RE.is_match(email) {
        return Err("Email format is invalid");
    }
    Ok(())
}

/// `#RRGGBB` 格式颜色
pub fn validate_hex_color(color: &str) -> Result<(), &'static str> {
    if !HEX_COLOR_RE.is_match(color) {
        return Err("Color must be a 7-character hex string like #1A2B3C");
    }
    Ok(())
}

pub fn validate_subdomain(subdomain: &str) -> Result<(), &'static str> {
    if !SUBDOMAIN_RE.is_match(subdomain) {
        return Err(
            "Subdomain must be 1-63 lowercase letters, digits or hyphens, not starting or ending with a hyphen",
        );
    }
    Ok(())
}

pub fn validate_domain(domain: &str) -> Result<(), &'static str> {
    if domain.len() > 253 || !DOMAIN_RE.is_match(domain) {
        return Err("Domain must be a valid host name");
    }
    Ok(())
}

/// 必填文本字段：去除首尾空白后非空且不超过 `max` 个字符
pub fn validate_name(field: &str, value: &str, max: usize) -> Result<(), String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(format!("{field} must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(format!("{field} must be at most {max} characters"));
    }
    Ok(())
}

/// 消息模板：长度受限，占位符必须在白名单内
pub fn validate_template(template: &str) -> Result<(), String> {
    if template.chars().count() > TEMPLATE_MAX_LEN {
        return Err(format!(
            "Template must be at most {TEMPLATE_MAX_LEN} characters"
        ));
    }

    for caps in PLACEHOLDER_RE.captures_iter(template) {
        let name = &caps[1];
        if !TEMPLATE_PLACEHOLDERS.contains(&name) {
            return Err(format!("Unknown template placeholder: {{{name}}}"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(validate_email("teacher@school.edu").is_ok());
        assert!(validate_email("no-at-sign.edu").is_err());
        assert!(validate_email("a@b").is_err());
    }

    #[test]
    fn test_hex_color() {
        assert!(validate_hex_color("#1a2B3c").is_ok());
        assert!(validate_hex_color("1a2b3c").is_err());
        assert!(validate_hex_color("#1a2b3").is_err());
        assert!(validate_hex_color("#1a2b3g").is_err());
    }

    #[test]
    fn test_subdomain() {
        assert!(validate_subdomain("greenwood").is_ok());
        assert!(validate_subdomain("green-wood-2").is_ok());
        assert!(validate_subdomain("-green").is_err());
        assert!(validate_subdomain("Green").is_err());
        assert!(validate_subdomain("").is_err());
    }

    #[test]
    fn test_domain() {
        assert!(validate_domain("school.example.com").is_ok());
        assert!(validate_domain("localhost").is_err());
        assert!(validate_domain("bad_domain.com").is_err());
    }

    #[test]
    fn test_name() {
        assert!(validate_name("name", "Math", 10).is_ok());
        assert!(validate_name("name", "   ", 10).is_err());
        assert!(validate_name("name", "Mathematics!", 5).is_err());
    }

    #[test]
    fn test_template_placeholders() {
        assert!(validate_template("Hi {parent_name}, {student_name} scored {score}").is_ok());
        assert!(validate_template("Hi {unknown}").is_err());
        assert!(validate_template(&"x".repeat(TEMPLATE_MAX_LEN + 1)).is_err());
    }
}
