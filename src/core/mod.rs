pub mod compiler;
pub mod embed;
pub mod language;
pub mod script;
pub mod service_scripts;
pub mod substitutor;

pub use crate::domain::model::{Category, FrontendSetting, LanguageId, Service, StorageScope};
pub use crate::domain::ports::{AssetSink, RecordStore, SettingsSource};
pub use crate::utils::error::Result;
