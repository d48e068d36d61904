use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `sys_language_uid` of a record; `0` is the canonical language.
pub type LanguageId = u32;

/// Root page id bounding which records a render can see.
pub type StorageScope = u32;

pub const DEFAULT_LANGUAGE: LanguageId = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalLayout {
    #[default]
    Box,
    Cloud,
    Bar,
}

impl ModalLayout {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalLayout::Box => "box",
            ModalLayout::Cloud => "cloud",
            ModalLayout::Bar => "bar",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModalTransition {
    #[default]
    Slide,
    Zoom,
}

impl ModalTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModalTransition::Slide => "slide",
            ModalTransition::Zoom => "zoom",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonCopy {
    pub text: String,
    pub role: String,
}

impl ButtonCopy {
    pub fn new(text: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            role: role.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsentModalCopy {
    pub title: String,
    pub description: String,
    pub primary_btn: ButtonCopy,
    pub secondary_btn: ButtonCopy,
    pub tertiary_btn: ButtonCopy,
    pub revision_text: String,
    pub impress_text: String,
    pub impress_link: String,
    pub data_policy_text: String,
    pub data_policy_link: String,
    pub layout: ModalLayout,
    /// `bottom|middle|top` + `left|right|center`, e.g. `bottom center`
    pub position: String,
    pub transition: ModalTransition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsModalCopy {
    pub title: String,
    pub accept_all_btn: String,
    pub close_btn: String,
    pub save_btn: String,
    pub reject_all_btn: String,
    pub col1_header: String,
    pub col2_header: String,
    pub col3_header: String,
    pub blocks_title: String,
    pub blocks_description: String,
    pub custom_button: bool,
    pub custom_button_html: String,
    pub layout: ModalLayout,
    /// Only honoured by the `bar` layout (`left` / `right`).
    pub position: String,
    pub transition: ModalTransition,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontendSetting {
    pub identifier: String,
    pub name: String,
    pub enabled: bool,
    pub consent_modal: ConsentModalCopy,
    pub settings_modal: SettingsModalCopy,
}

/// A frontend setting together with the language it was resolved for.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedFrontend {
    pub language: LanguageId,
    pub setting: FrontendSetting,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cookie {
    pub name: String,
    pub is_regex: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalScript {
    pub name: String,
    pub link: String,
    #[serde(rename = "async")]
    pub is_async: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub identifier: String,
    pub value: String,
}

/// Named substitutions scoped to one service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableProvider {
    variables: Vec<Variable>,
}

impl VariableProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, identifier: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(identifier, value);
        self
    }

    /// Later declarations of the same name replace earlier ones.
    pub fn insert(&mut self, identifier: impl Into<String>, value: impl Into<String>) {
        let identifier = identifier.into();
        let value = value.into();
        match self.variables.iter_mut().find(|v| v.identifier == identifier) {
            Some(existing) => existing.value = value,
            None => self.variables.push(Variable { identifier, value }),
        }
    }

    pub fn get(&self, identifier: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|v| v.identifier == identifier)
            .map(|v| v.value.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

/// Embed manager copy and hooks. URL fields may hold a JS function literal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedSettings {
    pub notice: String,
    pub load_btn: String,
    pub load_all_btn: String,
    pub thumbnail_url: String,
    pub embed_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Service {
    pub identifier: String,
    pub name: String,
    pub description: String,
    pub dsgvo_link: String,
    pub cookies: Vec<Cookie>,
    pub external_scripts: Vec<ExternalScript>,
    pub opt_in_code: String,
    pub opt_out_code: String,
    pub embed: EmbedSettings,
    pub variables: VariableProvider,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub identifier: String,
    pub title: String,
    pub description: String,
    pub is_required: bool,
    pub services: Vec<Service>,
}

impl Category {
    /// Categories without services only surface when consent for them is mandatory.
    pub fn is_renderable(&self) -> bool {
        !self.services.is_empty() || self.is_required
    }
}

/// Canonical record plus per-language overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub base: T,
    #[serde(default)]
    pub translations: BTreeMap<LanguageId, T>,
}

impl<T> Localized<T> {
    pub fn new(base: T) -> Self {
        Self {
            base,
            translations: BTreeMap::new(),
        }
    }

    pub fn with_translation(mut self, language: LanguageId, value: T) -> Self {
        self.translations.insert(language, value);
        self
    }

    /// Exact lookup; language 0 is the canonical record.
    pub fn get(&self, language: LanguageId) -> Option<&T> {
        if language == DEFAULT_LANGUAGE {
            Some(&self.base)
        } else {
            self.translations.get(&language)
        }
    }

    /// Lookup falling back to the canonical record.
    pub fn resolve(&self, language: LanguageId) -> &T {
        self.get(language).unwrap_or(&self.base)
    }

    pub fn has_language(&self, language: LanguageId) -> bool {
        self.get(language).is_some()
    }

    /// All languages in ascending order, canonical first.
    pub fn languages(&self) -> impl Iterator<Item = (LanguageId, &T)> {
        std::iter::once((DEFAULT_LANGUAGE, &self.base))
            .chain(self.translations.iter().map(|(language, value)| (*language, value)))
    }
}

/// Optional raw templates the consent library picks up from global constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    ConsentModal,
    SettingsModal,
    SettingsModalCategory,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [
        TemplateKind::ConsentModal,
        TemplateKind::SettingsModal,
        TemplateKind::SettingsModalCategory,
    ];

    pub fn constant_name(&self) -> &'static str {
        match self {
            TemplateKind::ConsentModal => "CF_CONSENTMODAL_TEMPLATE",
            TemplateKind::SettingsModal => "CF_SETTINGSMODAL_TEMPLATE",
            TemplateKind::SettingsModalCategory => "CF_SETTINGSMODAL_CATEGORY_TEMPLATE",
        }
    }
}
