use crate::domain::model::{LanguageId, StorageScope};
use crate::utils::error::{ConsentError, Result};
use crate::utils::validation::{validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "consent-compiler")]
#[command(about = "Compiles the cookie consent configuration script")]
pub struct CliConfig {
    #[arg(long, default_value = "./consent.toml", help = "Extension settings (TOML)")]
    pub settings: String,

    #[arg(long, default_value = "./records.json", help = "Record store (JSON)")]
    pub store: String,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Render the consent script for one language
    Render {
        #[arg(long, default_value_t = 0)]
        language: LanguageId,

        #[arg(long, value_delimiter = ',', default_value = "1")]
        scopes: Vec<StorageScope>,

        #[arg(long, help = "Wrap the script in a load event listener")]
        inline: bool,

        #[arg(long, default_value = ".", help = "Base directory for template files")]
        template_root: String,

        #[arg(long, help = "Write the script to a file instead of stdout")]
        output: Option<String>,

        #[arg(long, help = "Seed for inline script ids (reproducible output)")]
        seed: Option<u64>,

        #[arg(long, help = "Print the registered script tags to stderr")]
        print_assets: bool,
    },
    /// Import frontend definitions from the seed API
    Import {
        #[arg(long, default_value = "./sites.toml", help = "Site locale declarations (TOML)")]
        sites: String,
    },
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("settings", &self.settings)?;
        validate_path("store", &self.store)?;

        match &self.command {
            Command::Render {
                scopes,
                template_root,
                output,
                ..
            } => {
                if scopes.is_empty() {
                    return Err(ConsentError::MissingConfigError {
                        field: "scopes".to_string(),
                    });
                }
                validate_path("template_root", template_root)?;
                if let Some(output) = output {
                    validate_path("output", output)?;
                }
            }
            Command::Import { sites } => validate_path("sites", sites)?,
        }
        Ok(())
    }
}
