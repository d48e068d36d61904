use crate::domain::model::TemplateKind;
use crate::domain::ports::SettingsSource;
use crate::utils::error::{ConsentError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Extension settings of the consent manager.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionSettings {
    /// Base URL of the seed API, e.g. `https://api.example.com/v1/`.
    pub end_point: Option<String>,
    pub revision_version: Option<u32>,
    pub cookie_path: Option<String>,
    /// Days.
    pub cookie_expiration: Option<u32>,
    pub hide_from_bots: bool,
    pub tracking_enabled: bool,
    pub tracking_script: Option<String>,
    pub templates: TemplateSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSettings {
    pub consent_modal: Option<String>,
    pub settings_modal: Option<String>,
    pub settings_modal_category: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl ExtensionSettings {
    /// 從 TOML 檔案載入設定
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConsentError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析設定
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ConsentError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CONSENT_API})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 驗證設定的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(end_point) = non_empty(&self.end_point) {
            validation::validate_url("end_point", end_point)?;
        }

        if let Some(cookie_path) = non_empty(&self.cookie_path) {
            validation::validate_cookie_path("cookie_path", cookie_path)?;
        }

        if self.tracking_enabled && non_empty(&self.tracking_script).is_none() {
            return Err(ConsentError::MissingConfigError {
                field: "tracking_script".to_string(),
            });
        }

        for kind in TemplateKind::ALL {
            if let Some(path) = self.template_path(kind) {
                validation::validate_path(kind.constant_name(), path)?;
            }
        }

        Ok(())
    }
}

impl SettingsSource for ExtensionSettings {
    fn end_point(&self) -> Option<&str> {
        non_empty(&self.end_point)
    }

    // zero means unset
    fn revision_version(&self) -> Option<u32> {
        self.revision_version.filter(|v| *v > 0)
    }

    fn cookie_path(&self) -> Option<&str> {
        non_empty(&self.cookie_path)
    }

    fn cookie_expiration(&self) -> Option<u32> {
        self.cookie_expiration.filter(|v| *v > 0)
    }

    fn hide_from_bots(&self) -> bool {
        self.hide_from_bots
    }

    fn tracking_enabled(&self) -> bool {
        self.tracking_enabled
    }

    fn tracking_script(&self) -> Option<&str> {
        non_empty(&self.tracking_script)
    }

    fn template_path(&self, kind: TemplateKind) -> Option<&str> {
        match kind {
            TemplateKind::ConsentModal => non_empty(&self.templates.consent_modal),
            TemplateKind::SettingsModal => non_empty(&self.templates.settings_modal),
            TemplateKind::SettingsModalCategory => {
                non_empty(&self.templates.settings_modal_category)
            }
        }
    }
}

impl Validate for ExtensionSettings {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_settings() {
        let toml_content = r#"
end_point = "https://api.example.com/v1/"
revision_version = 4
cookie_path = "/shop"
cookie_expiration = 30
hide_from_bots = true
tracking_enabled = true
tracking_script = "js/tracking.js"

[templates]
consent_modal = "templates/consent.html"
"#;

        let settings = ExtensionSettings::from_toml_str(toml_content).unwrap();

        assert_eq!(settings.end_point(), Some("https://api.example.com/v1/"));
        assert_eq!(settings.revision_version(), Some(4));
        assert_eq!(settings.cookie_path(), Some("/shop"));
        assert_eq!(settings.cookie_expiration(), Some(30));
        assert!(settings.hide_from_bots());
        assert_eq!(
            settings.template_path(TemplateKind::ConsentModal),
            Some("templates/consent.html")
        );
        assert_eq!(settings.template_path(TemplateKind::SettingsModal), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_empty_values_count_as_unset() {
        let settings = ExtensionSettings::from_toml_str(
            r#"
revision_version = 0
cookie_path = ""
cookie_expiration = 0
"#,
        )
        .unwrap();

        assert_eq!(settings.revision_version(), None);
        assert_eq!(settings.cookie_path(), None);
        assert_eq!(settings.cookie_expiration(), None);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CONSENT_TEST_END_POINT", "https://seed.example.com/");

        let settings =
            ExtensionSettings::from_toml_str(r#"end_point = "${CONSENT_TEST_END_POINT}""#).unwrap();
        assert_eq!(settings.end_point(), Some("https://seed.example.com/"));

        std::env::remove_var("CONSENT_TEST_END_POINT");
    }

    #[test]
    fn test_config_validation() {
        let settings = ExtensionSettings::from_toml_str(r#"end_point = "invalid-url""#).unwrap();
        assert!(settings.validate().is_err());

        let settings = ExtensionSettings::from_toml_str("tracking_enabled = true").unwrap();
        assert!(matches!(
            settings.validate(),
            Err(ConsentError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_long_cookie_expiration_is_accepted() {
        let settings = ExtensionSettings::from_toml_str("cookie_expiration = 36500").unwrap();
        assert_eq!(settings.cookie_expiration(), Some(36500));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"cookie_expiration = 90\n").unwrap();

        let settings = ExtensionSettings::from_file(temp_file.path()).unwrap();
        assert_eq!(settings.cookie_expiration(), Some(90));
    }
}
