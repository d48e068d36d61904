pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use adapters::{
    assets::AssetCollector, markup::AnchorLinkResolver, markup::MarkdownRenderer,
    memory_store::MemoryStore, templates::LocalTemplates, tokens::OsTokenSource,
    tokens::SeededTokenSource,
};
pub use app::seed_import::{SeedImporter, SiteManifest};
pub use config::ExtensionSettings;
pub use core::{compiler::ConfigCompiler, language::LanguageAssembler};
pub use utils::error::{ConsentError, Result};
