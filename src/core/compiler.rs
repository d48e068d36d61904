use crate::adapters::markup::{AnchorLinkResolver, MarkdownRenderer};
use crate::adapters::tokens::OsTokenSource;
use crate::core::embed;
use crate::core::language::{to_script_data, LanguageAssembler};
use crate::core::script::{template_literal, ScriptObject, ScriptValue};
use crate::core::service_scripts::{self, RegistrationSummary};
use crate::domain::model::{FrontendSetting, LanguageId, StorageScope, TemplateKind};
use crate::domain::ports::{
    AssetSink, LinkResolver, RecordStore, RichTextRenderer, SettingsSource, TemplateSource,
    TokenSource,
};
use crate::utils::error::{ConsentError, Result};

pub const DEFAULT_REVISION: u32 = 1;
pub const DEFAULT_COOKIE_PATH: &str = "/";
pub const DEFAULT_COOKIE_EXPIRATION: u32 = 365;
const COOKIE_NAME: &str = "cf_cookie";

/// Compiles the consent configuration script for one page render.
pub struct ConfigCompiler<'a> {
    store: &'a dyn RecordStore,
    settings: &'a dyn SettingsSource,
    assets: &'a dyn AssetSink,
    templates: &'a dyn TemplateSource,
    links: &'a dyn LinkResolver,
    rich_text: &'a dyn RichTextRenderer,
    tokens: &'a dyn TokenSource,
}

impl<'a> ConfigCompiler<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        settings: &'a dyn SettingsSource,
        assets: &'a dyn AssetSink,
        templates: &'a dyn TemplateSource,
    ) -> Self {
        Self {
            store,
            settings,
            assets,
            templates,
            links: &AnchorLinkResolver,
            rich_text: &MarkdownRenderer,
            tokens: &OsTokenSource,
        }
    }

    pub fn with_link_resolver(mut self, links: &'a dyn LinkResolver) -> Self {
        self.links = links;
        self
    }

    pub fn with_rich_text(mut self, rich_text: &'a dyn RichTextRenderer) -> Self {
        self.rich_text = rich_text;
        self
    }

    pub fn with_tokens(mut self, tokens: &'a dyn TokenSource) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn language_assembler(&self) -> LanguageAssembler<'a> {
        LanguageAssembler::new(self.store, self.links, self.rich_text)
    }

    /// Base consent options for `language`, `None` when the language has no
    /// frontend setting. Callers must not render a widget without it.
    pub fn build_base_config(
        &self,
        language: LanguageId,
        scopes: &[StorageScope],
    ) -> Option<ScriptObject> {
        let frontend = self
            .store
            .find_frontend_settings(language, scopes)
            .into_iter()
            .next()?;

        Some(
            ScriptObject::new()
                .with("current_lang", language.to_string())
                .with("autoclear_cookies", true)
                .with("cookie_name", COOKIE_NAME)
                .with(
                    "revision",
                    self.settings.revision_version().unwrap_or(DEFAULT_REVISION),
                )
                .with(
                    "cookie_expiration",
                    self.settings
                        .cookie_expiration()
                        .unwrap_or(DEFAULT_COOKIE_EXPIRATION),
                )
                .with(
                    "cookie_path",
                    self.settings.cookie_path().unwrap_or(DEFAULT_COOKIE_PATH),
                )
                .with("hide_from_bots", u32::from(self.settings.hide_from_bots()))
                .with("page_scripts", true)
                .with("force_consent", true)
                .with("gui_options", gui_options(&frontend.setting)),
        )
    }

    /// Embed manager setup for every service in the scopes; empty when unused.
    pub fn build_embed_manager_config(&self, scopes: &[StorageScope]) -> String {
        embed::build_config(&self.store.find_categories(scopes, None))
    }

    pub fn build_opt_in_out_script(&self, scopes: &[StorageScope]) -> String {
        service_scripts::opt_in_out_script(&self.store.find_categories(scopes, None))
    }

    /// Hands external and opt-in scripts of all services to the asset sink.
    pub fn build_external_script_registrations(&self) -> Result<RegistrationSummary> {
        service_scripts::register_service_scripts(
            &self.store.all_categories(),
            self.assets,
            self.tokens,
        )
    }

    fn template_includes(&self) -> String {
        let mut includes = String::new();
        for kind in TemplateKind::ALL {
            let Some(path) = self.settings.template_path(kind) else {
                continue;
            };
            match self.templates.read_template(path) {
                Some(content) => includes.push_str(&format!(
                    "var {} = {};",
                    kind.constant_name(),
                    template_literal(&content)
                )),
                None => tracing::debug!(template = kind.constant_name(), path, "template not found, skipped"),
            }
        }
        includes
    }

    fn tracking_loader(&self) -> Option<String> {
        if !self.settings.tracking_enabled() {
            return None;
        }
        let loader = self
            .settings
            .tracking_script()
            .and_then(|path| self.templates.read_template(path));
        if loader.is_none() {
            tracing::warn!("Tracking is enabled but the tracking script could not be read");
        }
        loader
    }

    /// Full consent script. With `inline` the script waits for the page load event.
    pub fn render(
        &self,
        language: LanguageId,
        inline: bool,
        scopes: &[StorageScope],
    ) -> Result<String> {
        let base_config = self
            .build_base_config(language, scopes)
            .ok_or(ConsentError::MissingLanguageConfiguration { language })?;
        let languages = self.language_assembler().assemble_all(language, scopes)?;

        let registered = self.build_external_script_registrations()?;
        tracing::debug!(?registered, "external scripts handed to asset sink");

        let opt_in_out = self.build_opt_in_out_script(scopes);

        let mut config = String::from("var cc;");
        config.push_str(&self.template_includes());
        config.push_str("var manager;");
        config.push_str(&format!(
            "var cf_cookieconfig = {};",
            ScriptValue::from(base_config).to_literal()
        ));
        config.push_str(&format!(
            "cf_cookieconfig.languages = {};",
            to_script_data(&languages)?
        ));
        config.push_str(&format!(
            "manager = iframemanager();{}",
            self.build_embed_manager_config(scopes)
        ));
        config.push_str(&format!(
            "cf_cookieconfig.onAccept = function(){{{}\n}};",
            opt_in_out
        ));
        if let Some(loader) = self.tracking_loader() {
            config.push_str(&format!(
                "cf_cookieconfig.onFirstAction = function(user_preferences, cookie){{ {} }};",
                loader
            ));
        }
        config.push_str(&format!(
            "cf_cookieconfig.onChange = function(cookie, changed_preferences){{{}\n}};",
            opt_in_out
        ));
        config.push_str("cc = initCookieConsent();");
        config.push_str("cc.run(cf_cookieconfig);");

        tracing::info!(language, ?scopes, bytes = config.len(), "consent configuration rendered");

        if inline {
            return Ok(format!(
                "window.addEventListener('load', function() {{ {} }}, false);",
                config
            ));
        }
        Ok(config)
    }
}

fn gui_options(setting: &FrontendSetting) -> ScriptObject {
    let consent = &setting.consent_modal;
    let settings = &setting.settings_modal;
    ScriptObject::new()
        .with(
            "consent_modal",
            ScriptObject::new()
                .with("layout", consent.layout.as_str())
                .with("position", consent.position.as_str())
                .with("transition", consent.transition.as_str()),
        )
        .with(
            "settings_modal",
            ScriptObject::new()
                .with("layout", settings.layout.as_str())
                .with("position", settings.position.as_str())
                .with("transition", settings.transition.as_str()),
        )
}
