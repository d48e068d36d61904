use crate::core::script::escape_script_data;
use crate::domain::model::{
    ButtonCopy, Category, LanguageId, ResolvedFrontend, Service, StorageScope,
};
use crate::domain::ports::{LinkResolver, RecordStore, RichTextRenderer};
use crate::utils::error::{ConsentError, Result};
use serde::Serialize;
use std::collections::BTreeMap;

const LINK_CLASS: (&str, &str) = ("class", "cc-link");
const PROVIDER_LABEL: &str = "Provider";
const REVISION_TOKEN: &str = "<br><br>{{revision_message}}";

/// Localized trees keyed by language id.
pub type LanguageMap = BTreeMap<LanguageId, LanguageTree>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LanguageTree {
    pub consent_modal: ConsentModalTree,
    pub settings_modal: SettingsModalTree,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsentModalTree {
    pub title: String,
    pub description: String,
    pub primary_btn: ButtonCopy,
    pub secondary_btn: ButtonCopy,
    pub tertiary_btn: ButtonCopy,
    pub revision_message: String,
    pub impress_link: String,
    pub data_policy_link: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettingsModalTree {
    pub title: String,
    pub save_settings_btn: String,
    pub accept_all_btn: String,
    pub reject_all_btn: String,
    pub close_btn_label: String,
    pub cookie_table_headers: Vec<HeaderCell>,
    pub blocks: Vec<Block>,
    pub categories: Vec<CategoryEntry>,
}

/// Serialized as `{"col1": "..."}`. A third column is not rendered yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeaderCell {
    Col1(String),
    Col2(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Block {
    Intro { title: String, description: String },
    Service(ServiceBlock),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Toggle {
    pub value: String,
    pub readonly: bool,
    pub enabled: bool,
}

impl Toggle {
    fn new(value: &str, required: bool) -> Self {
        Self {
            value: value.to_string(),
            readonly: required,
            enabled: required,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CookieRow {
    pub col1: String,
    pub col2: String,
    pub is_regex: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceBlock {
    pub title: String,
    pub description: String,
    pub toggle: Toggle,
    pub cookie_table: Vec<CookieRow>,
    pub category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryEntry {
    pub title: String,
    pub description: String,
    pub toggle: Toggle,
    pub category: String,
}

/// Builds the `languages` section of the consent configuration.
pub struct LanguageAssembler<'a> {
    store: &'a dyn RecordStore,
    links: &'a dyn LinkResolver,
    rich_text: &'a dyn RichTextRenderer,
}

impl<'a> LanguageAssembler<'a> {
    pub fn new(
        store: &'a dyn RecordStore,
        links: &'a dyn LinkResolver,
        rich_text: &'a dyn RichTextRenderer,
    ) -> Self {
        Self {
            store,
            links,
            rich_text,
        }
    }

    /// Tree for a single language.
    pub fn assemble(&self, language: LanguageId, scopes: &[StorageScope]) -> Result<LanguageMap> {
        let frontends = self.store.find_frontend_settings(language, scopes);
        if frontends.is_empty() {
            tracing::error!(language, ?scopes, "no frontend setting for language");
            return Err(ConsentError::MissingLanguageConfiguration { language });
        }
        Ok(self.assemble_frontends(&frontends, scopes))
    }

    /// Trees for every enabled language in the scopes.
    ///
    /// Fails with the requested language when the scopes hold no frontend setting at all.
    pub fn assemble_all(&self, language: LanguageId, scopes: &[StorageScope]) -> Result<LanguageMap> {
        let frontends = self.store.all_frontend_settings(scopes);
        if frontends.is_empty() {
            tracing::error!(?scopes, "no frontend settings in storage scopes");
            return Err(ConsentError::MissingLanguageConfiguration { language });
        }
        Ok(self.assemble_frontends(&frontends, scopes))
    }

    fn assemble_frontends(&self, frontends: &[ResolvedFrontend], scopes: &[StorageScope]) -> LanguageMap {
        let mut languages = LanguageMap::new();
        for frontend in frontends {
            // oldest record wins when several scopes configure the same language
            if languages.contains_key(&frontend.language) {
                continue;
            }
            let categories = self.store.find_categories(scopes, Some(frontend.language));
            tracing::debug!(
                language = frontend.language,
                categories = categories.len(),
                "assembling language tree"
            );
            languages.insert(frontend.language, self.build_tree(frontend, &categories));
        }
        languages
    }

    fn build_tree(&self, frontend: &ResolvedFrontend, categories: &[Category]) -> LanguageTree {
        let consent = &frontend.setting.consent_modal;
        let settings = &frontend.setting.settings_modal;

        let consent_modal = ConsentModalTree {
            title: consent.title.clone(),
            description: format!("{}{}", self.rich_text.render(&consent.description), REVISION_TOKEN),
            primary_btn: consent.primary_btn.clone(),
            secondary_btn: consent.secondary_btn.clone(),
            tertiary_btn: consent.tertiary_btn.clone(),
            revision_message: self.rich_text.render(&consent.revision_text),
            impress_link: self
                .links
                .resolve_link(&consent.impress_text, &consent.impress_link, &[LINK_CLASS]),
            data_policy_link: self.links.resolve_link(
                &consent.data_policy_text,
                &consent.data_policy_link,
                &[LINK_CLASS],
            ),
        };

        let mut settings_modal = SettingsModalTree {
            title: settings.title.clone(),
            save_settings_btn: settings.save_btn.clone(),
            accept_all_btn: settings.accept_all_btn.clone(),
            reject_all_btn: settings.reject_all_btn.clone(),
            close_btn_label: settings.close_btn.clone(),
            cookie_table_headers: vec![
                HeaderCell::Col1(settings.col1_header.clone()),
                HeaderCell::Col2(settings.col2_header.clone()),
            ],
            blocks: vec![Block::Intro {
                title: settings.blocks_title.clone(),
                description: self.rich_text.render(&settings.blocks_description),
            }],
            categories: Vec::new(),
        };

        for category in categories.iter().filter(|c| c.is_renderable()) {
            for service in &category.services {
                settings_modal
                    .blocks
                    .push(Block::Service(self.service_block(category, service)));
            }
            settings_modal.categories.push(CategoryEntry {
                title: category.title.clone(),
                description: category.description.clone(),
                toggle: Toggle::new(&category.identifier, category.is_required),
                category: category.identifier.clone(),
            });
        }

        LanguageTree {
            consent_modal,
            settings_modal,
        }
    }

    fn service_block(&self, category: &Category, service: &Service) -> ServiceBlock {
        let provider_link = self
            .links
            .resolve_link(PROVIDER_LABEL, &service.dsgvo_link, &[]);
        let cookie_table = service
            .cookies
            .iter()
            .map(|cookie| CookieRow {
                col1: cookie.name.clone(),
                col2: provider_link.clone(),
                is_regex: cookie.is_regex,
            })
            .collect();

        ServiceBlock {
            title: service.name.clone(),
            description: service.description.clone(),
            toggle: Toggle::new(&service.identifier, category.is_required),
            cookie_table,
            category: category.identifier.clone(),
        }
    }
}

/// Strict JSON for the `languages` field, safe for an inline script.
pub fn to_script_data(languages: &LanguageMap) -> Result<String> {
    Ok(escape_script_data(&serde_json::to_string(languages)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::markup::{AnchorLinkResolver, MarkdownRenderer};
    use crate::adapters::memory_store::MemoryStore;
    use crate::domain::model::{Cookie, FrontendSetting, Localized};

    fn frontend(title: &str) -> FrontendSetting {
        let mut setting = FrontendSetting {
            identifier: "en".to_string(),
            enabled: true,
            ..FrontendSetting::default()
        };
        setting.consent_modal.title = title.to_string();
        setting.consent_modal.description = "We use *cookies*.".to_string();
        setting.consent_modal.data_policy_text = "Privacy".to_string();
        setting.consent_modal.data_policy_link = "https://example.com/privacy".to_string();
        setting.settings_modal.col1_header = "Name".to_string();
        setting.settings_modal.col2_header = "Provider".to_string();
        setting.settings_modal.col3_header = "Info".to_string();
        setting.settings_modal.blocks_title = "Usage".to_string();
        setting
    }

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.add_frontend(1, Localized::new(frontend("Hello")).with_translation(1, frontend("Hallo")));
        store.add_category(
            1,
            Localized::new(Category {
                identifier: "necessary".to_string(),
                title: "Necessary".to_string(),
                is_required: true,
                ..Category::default()
            }),
        );
        store.add_category(
            1,
            Localized::new(Category {
                identifier: "marketing".to_string(),
                title: "Marketing".to_string(),
                ..Category::default()
            }),
        );
        store.add_category(
            1,
            Localized::new(Category {
                identifier: "analytics".to_string(),
                title: "Analytics".to_string(),
                services: vec![Service {
                    identifier: "matomo".to_string(),
                    name: "Matomo".to_string(),
                    dsgvo_link: "https://matomo.org/privacy".to_string(),
                    cookies: vec![
                        Cookie { name: "_pk_id".to_string(), is_regex: false },
                        Cookie { name: "_pk_ses.*".to_string(), is_regex: true },
                    ],
                    ..Service::default()
                }],
                ..Category::default()
            }),
        );
        store
    }

    #[test]
    fn test_required_empty_category_surfaces_and_optional_one_does_not() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        let languages = assembler.assemble(0, &[1]).unwrap();
        let tree = &languages[&0];
        let ids: Vec<&str> = tree
            .settings_modal
            .categories
            .iter()
            .map(|c| c.category.as_str())
            .collect();
        assert_eq!(ids, vec!["necessary", "analytics"]);
        assert!(tree.settings_modal.categories[0].toggle.readonly);
    }

    #[test]
    fn test_service_block_carries_cookie_table() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        let languages = assembler.assemble(0, &[1]).unwrap();
        let tree = &languages[&0];
        assert_eq!(tree.settings_modal.blocks.len(), 2);
        let Block::Service(block) = &tree.settings_modal.blocks[1] else {
            panic!("expected a service block");
        };
        assert_eq!(block.toggle.value, "matomo");
        assert!(!block.toggle.enabled);
        assert_eq!(block.category, "analytics");
        assert_eq!(block.cookie_table.len(), 2);
        assert!(block.cookie_table[1].is_regex);
        assert_eq!(
            block.cookie_table[0].col2,
            r#"<a href="https://matomo.org/privacy">Provider</a>"#
        );
    }

    #[test]
    fn test_consent_modal_copy_is_rendered() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        let languages = assembler.assemble(1, &[1]).unwrap();
        let tree = &languages[&1];
        assert_eq!(tree.consent_modal.title, "Hallo");
        assert!(tree.consent_modal.description.contains("<em>cookies</em>"));
        assert!(tree.consent_modal.description.ends_with("{{revision_message}}"));
        assert_eq!(
            tree.consent_modal.data_policy_link,
            r#"<a href="https://example.com/privacy" class="cc-link">Privacy</a>"#
        );
    }

    #[test]
    fn test_only_two_header_columns_are_serialized() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        let languages = assembler.assemble(0, &[1]).unwrap();
        let json: serde_json::Value = serde_json::from_str(&to_script_data(&languages).unwrap()).unwrap();
        assert_eq!(
            json["0"]["settings_modal"]["cookie_table_headers"],
            serde_json::json!([{"col1": "Name"}, {"col2": "Provider"}])
        );
        assert_eq!(json["0"]["settings_modal"]["blocks"][0]["title"], "Usage");
    }

    #[test]
    fn test_assemble_all_keys_by_language() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        let languages = assembler.assemble_all(0, &[1]).unwrap();
        assert_eq!(languages.keys().copied().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_missing_language_is_fatal() {
        let store = store();
        let links = AnchorLinkResolver;
        let rich_text = MarkdownRenderer;
        let assembler = LanguageAssembler::new(&store, &links, &rich_text);

        assert!(matches!(
            assembler.assemble(5, &[1]),
            Err(ConsentError::MissingLanguageConfiguration { language: 5 })
        ));
        assert!(matches!(
            assembler.assemble_all(0, &[9]),
            Err(ConsentError::MissingLanguageConfiguration { language: 0 })
        ));
    }
}
