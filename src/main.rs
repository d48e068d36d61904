use clap::Parser;
use consent_compiler::app::seed_import::{HttpSeedSource, SeedImporter, SiteManifest};
use consent_compiler::utils::error::{ConsentError, ErrorSeverity};
use consent_compiler::utils::{logger, validation::Validate};
use consent_compiler::{
    AssetCollector, CliConfig, Command, ConfigCompiler, ExtensionSettings, LocalTemplates,
    MemoryStore, SeededTokenSource,
};
use std::path::Path;

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting consent-compiler CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 建議: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(config: &CliConfig) -> Result<(), ConsentError> {
    config.validate()?;
    let settings = load_settings(&config.settings)?;

    match &config.command {
        Command::Render {
            language,
            scopes,
            inline,
            template_root,
            output,
            seed,
            print_assets,
        } => {
            let store = MemoryStore::from_file(&config.store)?;
            let assets = AssetCollector::new();
            let templates = LocalTemplates::new(template_root);
            let seeded = seed.map(SeededTokenSource::new);

            let mut compiler = ConfigCompiler::new(&store, &settings, &assets, &templates);
            if let Some(tokens) = seeded.as_ref() {
                compiler = compiler.with_tokens(tokens);
            }

            let script = compiler.render(*language, *inline, scopes)?;

            match output {
                Some(path) => {
                    std::fs::write(path, &script)?;
                    tracing::info!("📁 Script saved to: {}", path);
                }
                None => println!("{}", script),
            }

            if *print_assets {
                for registered in assets.scripts() {
                    eprintln!("{}", registered.to_tag());
                }
            }
        }
        Command::Import { sites } => {
            let manifest = SiteManifest::from_file(sites)?;
            let mut store = if Path::new(&config.store).exists() {
                MemoryStore::from_file(&config.store)?
            } else {
                MemoryStore::new()
            };

            let source = HttpSeedSource::from_settings(&settings);
            let report = SeedImporter::new(&mut store, &source)
                .run(&manifest.sites)
                .await?;
            store.save(&config.store)?;

            println!(
                "✅ Imported {} frontends ({} new, {} translations, {} skipped)",
                report.fetched, report.inserted, report.translated, report.skipped
            );
        }
    }
    Ok(())
}

fn load_settings(path: &str) -> Result<ExtensionSettings, ConsentError> {
    if !Path::new(path).exists() {
        tracing::warn!("Settings file {} not found, using defaults", path);
        return Ok(ExtensionSettings::default());
    }
    let settings = ExtensionSettings::from_file(path)?;
    settings.validate()?;
    Ok(settings)
}
