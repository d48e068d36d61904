use crate::domain::model::{
    Category, FrontendSetting, LanguageId, Localized, ResolvedFrontend, StorageScope,
};
use crate::domain::ports::{RecordStore, RecordWriter};
use crate::utils::error::{ConsentError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrontendRecord {
    pub scope: StorageScope,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
    pub setting: Localized<FrontendSetting>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub scope: StorageScope,
    pub category: Localized<Category>,
}

/// Record store kept in memory and persisted as a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    #[serde(default)]
    frontends: Vec<FrontendRecord>,
    #[serde(default)]
    categories: Vec<CategoryRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 檔案載入資料
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ConsentError::IoError)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// 寫回 JSON 檔案，必要時建立上層目錄
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn add_frontend(&mut self, scope: StorageScope, setting: Localized<FrontendSetting>) {
        self.frontends.push(FrontendRecord {
            scope,
            created_at: Utc::now(),
            setting,
        });
    }

    pub fn add_category(&mut self, scope: StorageScope, category: Localized<Category>) {
        self.categories.push(CategoryRecord { scope, category });
    }

    pub fn frontends(&self) -> &[FrontendRecord] {
        &self.frontends
    }

    /// Frontend records of the scopes, oldest first.
    fn frontends_in(&self, scopes: &[StorageScope]) -> Vec<&FrontendRecord> {
        let mut records: Vec<&FrontendRecord> = self
            .frontends
            .iter()
            .filter(|record| scopes.contains(&record.scope))
            .collect();
        records.sort_by_key(|record| record.created_at);
        records
    }
}

impl RecordStore for MemoryStore {
    fn find_frontend_settings(
        &self,
        language: LanguageId,
        scopes: &[StorageScope],
    ) -> Vec<ResolvedFrontend> {
        self.frontends_in(scopes)
            .into_iter()
            .filter_map(|record| record.setting.get(language))
            .filter(|setting| setting.enabled)
            .map(|setting| ResolvedFrontend {
                language,
                setting: setting.clone(),
            })
            .collect()
    }

    fn all_frontend_settings(&self, scopes: &[StorageScope]) -> Vec<ResolvedFrontend> {
        self.frontends_in(scopes)
            .into_iter()
            .flat_map(|record| record.setting.languages())
            .filter(|(_, setting)| setting.enabled)
            .map(|(language, setting)| ResolvedFrontend {
                language,
                setting: setting.clone(),
            })
            .collect()
    }

    fn find_categories(
        &self,
        scopes: &[StorageScope],
        language: Option<LanguageId>,
    ) -> Vec<Category> {
        self.categories
            .iter()
            .filter(|record| scopes.contains(&record.scope))
            .map(|record| match language {
                Some(language) => record.category.resolve(language).clone(),
                None => record.category.base.clone(),
            })
            .collect()
    }

    fn all_categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .map(|record| record.category.base.clone())
            .collect()
    }
}

impl RecordWriter for MemoryStore {
    fn has_frontend(&self, scope: StorageScope, language: LanguageId) -> bool {
        self.frontends
            .iter()
            .any(|record| record.scope == scope && record.setting.has_language(language))
    }

    fn insert_frontend(&mut self, scope: StorageScope, setting: FrontendSetting) -> Result<()> {
        self.add_frontend(scope, Localized::new(setting));
        Ok(())
    }

    fn insert_frontend_translation(
        &mut self,
        scope: StorageScope,
        language: LanguageId,
        setting: FrontendSetting,
    ) -> Result<()> {
        let oldest = self
            .frontends
            .iter_mut()
            .filter(|record| record.scope == scope)
            .min_by_key(|record| record.created_at);

        match oldest {
            Some(record) => {
                record.setting.translations.insert(language, setting);
            }
            None => {
                // the translation doubles as canonical record
                let localized = Localized::new(setting.clone()).with_translation(language, setting);
                self.add_frontend(scope, localized);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setting(identifier: &str, enabled: bool) -> FrontendSetting {
        FrontendSetting {
            identifier: identifier.to_string(),
            enabled,
            ..FrontendSetting::default()
        }
    }

    #[test]
    fn test_frontend_lookup_is_strict_per_language() {
        let mut store = MemoryStore::new();
        store.add_frontend(1, Localized::new(setting("en", true)).with_translation(2, setting("de", true)));

        assert_eq!(store.find_frontend_settings(2, &[1])[0].setting.identifier, "de");
        assert!(store.find_frontend_settings(3, &[1]).is_empty());
        assert!(store.find_frontend_settings(0, &[7]).is_empty());
    }

    #[test]
    fn test_disabled_frontends_are_hidden() {
        let mut store = MemoryStore::new();
        store.add_frontend(1, Localized::new(setting("en", false)).with_translation(1, setting("de", true)));

        assert!(store.find_frontend_settings(0, &[1]).is_empty());
        let all = store.all_frontend_settings(&[1]);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].language, 1);
    }

    #[test]
    fn test_categories_fall_back_to_canonical_language() {
        let mut store = MemoryStore::new();
        let base = Category {
            identifier: "stats".to_string(),
            title: "Statistics".to_string(),
            ..Category::default()
        };
        let german = Category {
            title: "Statistik".to_string(),
            ..base.clone()
        };
        store.add_category(1, Localized::new(base).with_translation(1, german));
        store.add_category(2, Localized::new(Category::default()));

        assert_eq!(store.find_categories(&[1], Some(1))[0].title, "Statistik");
        assert_eq!(store.find_categories(&[1], Some(4))[0].title, "Statistics");
        assert_eq!(store.find_categories(&[1], None).len(), 1);
        assert_eq!(store.all_categories().len(), 2);
    }

    #[test]
    fn test_translation_without_canonical_record_creates_one() {
        let mut store = MemoryStore::new();
        store.insert_frontend_translation(3, 1, setting("de", true)).unwrap();

        assert!(store.has_frontend(3, 0));
        assert!(store.has_frontend(3, 1));
        assert_eq!(store.frontends().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("store.json");

        let mut store = MemoryStore::new();
        store.insert_frontend(1, setting("en", true)).unwrap();
        store.save(&path).unwrap();

        let reloaded = MemoryStore::from_file(&path).unwrap();
        assert_eq!(reloaded, store);
    }
}
