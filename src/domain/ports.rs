use crate::domain::model::{
    Category, FrontendSetting, LanguageId, ResolvedFrontend, StorageScope, TemplateKind,
};
use crate::utils::error::Result;

/// Read access to the localized consent records.
pub trait RecordStore {
    /// Enabled frontend settings translated into exactly `language`.
    fn find_frontend_settings(
        &self,
        language: LanguageId,
        scopes: &[StorageScope],
    ) -> Vec<ResolvedFrontend>;

    /// Every enabled language of every frontend setting in the scopes.
    fn all_frontend_settings(&self, scopes: &[StorageScope]) -> Vec<ResolvedFrontend>;

    /// Categories in the scopes, in the language if given (canonical otherwise).
    fn find_categories(
        &self,
        scopes: &[StorageScope],
        language: Option<LanguageId>,
    ) -> Vec<Category>;

    /// Canonical categories across all scopes.
    fn all_categories(&self) -> Vec<Category>;
}

/// Write access used by the seed importer.
pub trait RecordWriter {
    fn has_frontend(&self, scope: StorageScope, language: LanguageId) -> bool;

    fn insert_frontend(&mut self, scope: StorageScope, setting: FrontendSetting) -> Result<()>;

    fn insert_frontend_translation(
        &mut self,
        scope: StorageScope,
        language: LanguageId,
        setting: FrontendSetting,
    ) -> Result<()>;
}

/// Extension configuration consumed by the compiler.
pub trait SettingsSource {
    fn end_point(&self) -> Option<&str>;
    fn revision_version(&self) -> Option<u32>;
    fn cookie_path(&self) -> Option<&str>;
    fn cookie_expiration(&self) -> Option<u32>;
    fn hide_from_bots(&self) -> bool;
    fn tracking_enabled(&self) -> bool;
    fn tracking_script(&self) -> Option<&str>;
    fn template_path(&self, kind: TemplateKind) -> Option<&str>;
}

pub trait LinkResolver {
    fn resolve_link(&self, label: &str, target: &str, attributes: &[(&str, &str)]) -> String;
}

pub trait RichTextRenderer {
    fn render(&self, raw: &str) -> String;
}

/// Best-effort lookup of template files; `None` when missing or unreadable.
pub trait TemplateSource {
    fn read_template(&self, path: &str) -> Option<String>;
}

/// Source of inline-script element identifiers.
pub trait TokenSource {
    fn token(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptAttributes {
    pub script_type: String,
    pub external: bool,
    pub is_async: bool,
    pub defer: bool,
    /// Identifier of the owning service, rendered as `data-service`.
    pub service: String,
}

impl ScriptAttributes {
    /// Non-executing script the consent library activates later.
    pub fn placeholder(service: impl Into<String>, is_async: bool) -> Self {
        Self {
            script_type: "text/plain".to_string(),
            external: true,
            is_async,
            defer: false,
            service: service.into(),
        }
    }

    pub fn deferred_placeholder(service: impl Into<String>) -> Self {
        Self {
            defer: true,
            ..Self::placeholder(service, false)
        }
    }

    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("type", self.script_type.clone()),
            ("external", u8::from(self.external).to_string()),
            ("async", u8::from(self.is_async).to_string()),
        ];
        if self.defer {
            pairs.push(("defer", "defer".to_string()));
        }
        pairs.push(("data-service", self.service.clone()));
        pairs
    }
}

pub trait AssetSink {
    fn register_external_script(
        &self,
        name: &str,
        url: &str,
        attributes: &ScriptAttributes,
    ) -> Result<()>;

    fn register_inline_script(
        &self,
        id: &str,
        code: &str,
        attributes: &ScriptAttributes,
    ) -> Result<()>;
}
