use serde::Deserialize;

use crate::errors::{EduHubError, Result};
use crate::utils::validate::{
    validate_domain, validate_email, validate_hex_color, validate_name, validate_subdomain,
    validate_template,
};

// 开通租户请求（平台调用）
#[derive(Debug, Clone, Deserialize)]
pub struct ProvisionTenantRequest {
    pub name: String,
    pub subdomain: Option<String>,
    pub admin_email: String,
    pub admin_first_name: String,
    pub admin_last_name: String,
}

impl ProvisionTenantRequest {
    pub fn validate(&self) -> Result<()> {
        validate_name("name", &self.name, 200).map_err(EduHubError::validation)?;
        if let Some(subdomain) = &self.subdomain {
            validate_subdomain(subdomain).map_err(EduHubError::validation)?;
        }
        validate_email(&self.admin_email).map_err(EduHubError::validation)?;
        validate_name("admin_first_name", &self.admin_first_name, 100)
            .map_err(EduHubError::validation)?;
        validate_name("admin_last_name", &self.admin_last_name, 100)
            .map_err(EduHubError::validation)?;
        Ok(())
    }
}

// 品牌更新请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBrandingRequest {
    pub name: Option<String>,
    pub subdomain: Option<String>,
    pub domain: Option<String>,
    pub logo: Option<String>,
    pub primary_color: Option<String>,
    pub secondary_color: Option<String>,
}

impl UpdateBrandingRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.name {
            validate_name("name", name, 200).map_err(EduHubError::validation)?;
        }
        if let Some(subdomain) = &self.subdomain {
            validate_subdomain(subdomain).map_err(EduHubError::validation)?;
        }
        if let Some(domain) = &self.domain {
            validate_domain(domain).map_err(EduHubError::validation)?;
        }
        if let Some(logo) = &self.logo
            && logo.len() > 500
        {
            return Err(EduHubError::validation("logo must be at most 500 characters"));
        }
        for color in [&self.primary_color, &self.secondary_color].into_iter().flatten() {
            validate_hex_color(color).map_err(EduHubError::validation)?;
        }
        Ok(())
    }
}

// 通知配置更新请求（部分更新）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationConfigRequest {
    pub whatsapp_enabled: Option<bool>,
    pub whatsapp_sender: Option<String>,
    pub enrollment_template: Option<String>,
    pub assessment_template: Option<String>,
    pub grade_template: Option<String>,
    pub password_reset_template: Option<String>,
}

impl UpdateNotificationConfigRequest {
    pub fn validate(&self) -> Result<()> {
        if let Some(sender) = &self.whatsapp_sender {
            validate_name("whatsapp_sender", sender, 32).map_err(EduHubError::validation)?;
        }
        for template in [
            &self.enrollment_template,
            &self.assessment_template,
            &self.grade_template,
            &self.password_reset_template,
        ]
        .into_iter()
        .flatten()
        {
            validate_template(template).map_err(EduHubError::validation)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_branding_colors_must_be_hex() {
        let ok = UpdateBrandingRequest {
            primary_color: Some("#1A2B3C".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateBrandingRequest {
            secondary_color: Some("blue".to_string()),
            ..Default::default()
        };
        assert!(matches!(bad.validate(), Err(EduHubError::Validation(_))));
    }

    #[test]
    fn test_notification_templates_are_checked() {
        let ok = UpdateNotificationConfigRequest {
            enrollment_template: Some("Welcome {student_name} to {school_name}".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = UpdateNotificationConfigRequest {
            grade_template: Some("Hi {unknown}".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }
}
