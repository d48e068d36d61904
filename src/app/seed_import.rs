use crate::domain::model::{
    ButtonCopy, ConsentModalCopy, FrontendSetting, LanguageId, ModalLayout, ModalTransition,
    SettingsModalCopy, StorageScope, DEFAULT_LANGUAGE,
};
use crate::domain::ports::{RecordWriter, SettingsSource};
use crate::utils::error::{ConsentError, Result};
use crate::utils::validation::validate_non_empty_string;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

/// One locale of a site: which API language to fetch and where to store it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleDeclaration {
    /// Stored as the frontend identifier, e.g. `de_AT`.
    pub locale: String,
    pub lang_code: String,
    pub root_site: StorageScope,
    pub language_id: LanguageId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteDeclaration {
    #[serde(default)]
    pub locales: Vec<LocaleDeclaration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SiteManifest {
    #[serde(default)]
    pub sites: Vec<SiteDeclaration>,
}

impl SiteManifest {
    /// 從 TOML 檔案載入站台語系宣告
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConsentError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let manifest: Self =
            toml::from_str(content).map_err(|e| ConsentError::ConfigValidationError {
                field: "sites".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        if manifest.sites.is_empty() {
            return Err(ConsentError::ConfigError {
                message: "site manifest declares no sites".to_string(),
            });
        }
        Ok(manifest)
    }
}

fn flexible_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Bool(b)) => b,
        Some(serde_json::Value::Number(n)) => n.as_i64().unwrap_or(0) != 0,
        Some(serde_json::Value::String(s)) => matches!(s.trim(), "1" | "true"),
        _ => false,
    })
}

/// Frontend definition as served by `GET {end_point}/frontends/{lang_code}`.
///
/// Missing and `null` fields both fall back to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FrontendDefinition {
    pub name: Option<String>,
    pub title_consent_modal: Option<String>,
    pub description_consent_modal: Option<String>,
    pub primary_btn_text_consent_modal: Option<String>,
    pub secondary_btn_text_consent_modal: Option<String>,
    pub tertiary_btn_text_consent_modal: Option<String>,
    pub primary_btn_role_consent_modal: Option<String>,
    pub secondary_btn_role_consent_modal: Option<String>,
    pub tertiary_btn_role_consent_modal: Option<String>,
    pub title_settings: Option<String>,
    pub accept_all_btn_settings: Option<String>,
    pub close_btn_settings: Option<String>,
    pub save_btn_settings: Option<String>,
    pub reject_all_btn_settings: Option<String>,
    pub col1_header_settings: Option<String>,
    pub col2_header_settings: Option<String>,
    pub col3_header_settings: Option<String>,
    pub blocks_title: Option<String>,
    pub blocks_description: Option<String>,
    pub custom_button_html: Option<String>,
    #[serde(deserialize_with = "flexible_bool")]
    pub custombutton: bool,
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

fn role(value: Option<String>, default: &str) -> String {
    value.unwrap_or_else(|| default.to_string())
}

impl FrontendDefinition {
    pub fn into_setting(self, locale: &str) -> FrontendSetting {
        FrontendSetting {
            identifier: locale.to_string(),
            name: text(self.name),
            enabled: true,
            consent_modal: ConsentModalCopy {
                title: text(self.title_consent_modal),
                description: text(self.description_consent_modal),
                primary_btn: ButtonCopy::new(
                    text(self.primary_btn_text_consent_modal),
                    role(self.primary_btn_role_consent_modal, "accept_all"),
                ),
                secondary_btn: ButtonCopy::new(
                    text(self.secondary_btn_text_consent_modal),
                    role(self.secondary_btn_role_consent_modal, "accept_necessary"),
                ),
                tertiary_btn: ButtonCopy::new(
                    text(self.tertiary_btn_text_consent_modal),
                    role(self.tertiary_btn_role_consent_modal, "display_none"),
                ),
                layout: ModalLayout::Cloud,
                position: "bottom center".to_string(),
                transition: ModalTransition::Slide,
                ..ConsentModalCopy::default()
            },
            settings_modal: SettingsModalCopy {
                title: text(self.title_settings),
                accept_all_btn: text(self.accept_all_btn_settings),
                close_btn: text(self.close_btn_settings),
                save_btn: text(self.save_btn_settings),
                reject_all_btn: text(self.reject_all_btn_settings),
                col1_header: text(self.col1_header_settings),
                col2_header: text(self.col2_header_settings),
                col3_header: text(self.col3_header_settings),
                blocks_title: text(self.blocks_title),
                blocks_description: text(self.blocks_description),
                custom_button: self.custombutton,
                custom_button_html: text(self.custom_button_html),
                layout: ModalLayout::Box,
                transition: ModalTransition::Slide,
                ..SettingsModalCopy::default()
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub fetched: usize,
    pub inserted: usize,
    pub translated: usize,
    pub skipped: usize,
}

/// Source of frontend definitions, one list per API language code.
#[async_trait]
pub trait SeedSource: Send + Sync {
    async fn fetch_frontends(&self, lang_code: &str) -> Result<Vec<FrontendDefinition>>;
}

/// Reads frontend definitions from `GET {end_point}/frontends/{lang_code}`.
pub struct HttpSeedSource {
    end_point: Option<String>,
    client: Client,
}

impl HttpSeedSource {
    pub fn new(end_point: Option<String>) -> Self {
        Self {
            end_point,
            client: Client::new(),
        }
    }

    pub fn from_settings(settings: &dyn SettingsSource) -> Self {
        Self::new(settings.end_point().map(str::to_string))
    }
}

#[async_trait]
impl SeedSource for HttpSeedSource {
    /// 取得指定語系的前端設定，未設定 end_point 時回傳空陣列
    async fn fetch_frontends(&self, lang_code: &str) -> Result<Vec<FrontendDefinition>> {
        let Some(end_point) = self.end_point.as_deref() else {
            tracing::warn!("No seed end_point configured, nothing to import for {}", lang_code);
            return Ok(Vec::new());
        };

        let url = format!("{}/frontends/{}", end_point.trim_end_matches('/'), lang_code);
        tracing::debug!("Making API request to: {}", url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        tracing::debug!("API response status: {}", response.status());

        Ok(response.json::<Vec<FrontendDefinition>>().await?)
    }
}

/// Imports frontend definitions from a seed source into a record writer.
///
/// Existence checks and inserts are not atomic; two imports for the same
/// scope and language running at once can both insert.
pub struct SeedImporter<'a, W: RecordWriter> {
    writer: &'a mut W,
    source: &'a dyn SeedSource,
}

impl<'a, W: RecordWriter> SeedImporter<'a, W> {
    pub fn new(writer: &'a mut W, source: &'a dyn SeedSource) -> Self {
        Self { writer, source }
    }

    pub async fn run(&mut self, sites: &[SiteDeclaration]) -> Result<ImportReport> {
        let mut report = ImportReport::default();

        for site in sites {
            if site.locales.is_empty() {
                return Err(ConsentError::InvalidSiteConfiguration {
                    message: "site declares no locales".to_string(),
                });
            }

            for locale in &site.locales {
                validate_non_empty_string("lang_code", &locale.lang_code)?;
                let frontends = self.source.fetch_frontends(&locale.lang_code).await?;
                report.fetched += frontends.len();

                for frontend in frontends {
                    self.import_one(locale, frontend.into_setting(&locale.locale), &mut report)?;
                }
            }
        }

        tracing::info!(
            "✅ Seed import finished: {} fetched, {} inserted, {} translated, {} skipped",
            report.fetched,
            report.inserted,
            report.translated,
            report.skipped
        );
        Ok(report)
    }

    fn import_one(
        &mut self,
        locale: &LocaleDeclaration,
        setting: FrontendSetting,
        report: &mut ImportReport,
    ) -> Result<()> {
        let scope = locale.root_site;
        let mut touched = false;

        if !self.writer.has_frontend(scope, DEFAULT_LANGUAGE) {
            self.writer.insert_frontend(scope, setting.clone())?;
            report.inserted += 1;
            touched = true;
        }

        if locale.language_id != DEFAULT_LANGUAGE
            && !self.writer.has_frontend(scope, locale.language_id)
        {
            self.writer
                .insert_frontend_translation(scope, locale.language_id, setting)?;
            report.translated += 1;
            touched = true;
        }

        if !touched {
            tracing::debug!(scope, language = locale.language_id, "frontend already present");
            report.skipped += 1;
        }
        Ok(())
    }
}
