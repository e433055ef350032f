// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use transmirror::app_config::{self, Config, TranslationProvider};
use transmirror::Controller;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Gemini,
    Ollama,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Gemini => TranslationProvider::Gemini,
            CliTranslationProvider::Ollama => TranslationProvider::Ollama,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate one page, or every page of the origin directory
    Translate {
        /// Page to translate (defaults to the whole origin directory)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Overwrite existing translations
        #[arg(short, long)]
        force: bool,
    },

    /// Rewrite site links in translated pages to local files
    Localize,

    /// Add the provenance header to translated pages
    Annotate,

    /// Translate, localize and annotate
    Run {
        /// Overwrite existing translations
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completions for transmirror
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// transmirror - Translated mirrors of static HTML sites
#[derive(Parser, Debug)]
#[command(name = "transmirror")]
#[command(version)]
#[command(about = "AI-powered translation of static HTML sites")]
#[command(long_about = "transmirror translates fetched HTML pages with an AI provider, rewrites their links to the local copies and stamps each page with its source.

EXAMPLES:
    transmirror run                          # Full pipeline using conf.json
    transmirror translate -f                 # Retranslate every page
    transmirror translate output/origin/tpus.html
    transmirror -p ollama -m qwen2.5:14b run # Use a local model
    transmirror localize                     # Only rewrite links
    transmirror completions bash > transmirror.bash

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The Gemini API key may also be given through
    the GEMINI_API_KEY environment variable.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json", global = true)]
    config_path: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum, global = true)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long, global = true)]
    model: Option<String>,

    /// Target locale (e.g. 'zh-CN', 'ja')
    #[arg(short, long, global = true)]
    target_language: Option<String>,

    /// Set logging level
    #[arg(short, long, value_enum, global = true)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Tag and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("ERROR", "1;31"),
            Level::Warn => ("WARN ", "1;33"),
            Level::Info => ("INFO ", "1;32"),
            Level::Debug => ("DEBUG", "1;36"),
            Level::Trace => ("TRACE", "1;35"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (tag, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                color, now, tag, record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // The level is lowered or raised once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    if let Commands::Completions { shell } = cli.command {
        let mut cmd = CommandLineOptions::command();
        generate(shell, &mut cmd, "transmirror", &mut std::io::stdout());
        return Ok(());
    }

    if let Some(level) = &cli.log_level {
        let level: app_config::LogLevel = level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let config = load_config(&cli)?;
    if cli.log_level.is_none() {
        log::set_max_level(config.log_level.to_level_filter());
    }

    let controller = Controller::with_config(config);

    match cli.command {
        Commands::Translate { file, force } => {
            let stats = controller.translate(file.as_deref(), force).await?;
            info!(
                "Translated {}, skipped {}, failed {}",
                stats.translated, stats.skipped, stats.failed
            );
        }
        Commands::Localize => {
            let stats = controller.localize()?;
            info!(
                "Converted {} links in {} of {} pages ({} links without a local page)",
                stats.links_converted, stats.files_modified, stats.files_processed, stats.links_skipped
            );
        }
        Commands::Annotate => {
            let stats = controller.annotate()?;
            info!(
                "Annotated {}, skipped {}, failed {}",
                stats.annotated, stats.skipped, stats.failed
            );
        }
        Commands::Run { force } => {
            let stats = controller.run(force).await?;
            info!(
                "Pages translated: {} (skipped {}, failed {}); links converted: {}; pages annotated: {}",
                stats.translation.translated,
                stats.translation.skipped,
                stats.translation.failed,
                stats.localization.links_converted,
                stats.annotation.annotated
            );
        }
        Commands::Completions { .. } => {}
    }

    Ok(())
}

/// Load the config file (creating a default one when missing) and apply CLI overrides
fn load_config(cli: &CommandLineOptions) -> Result<Config> {
    let config_path: &Path = &cli.config_path;

    let mut config = if config_path.exists() {
        Config::from_file(config_path)?
    } else {
        warn!("Config file not found at {:?}, creating default config.", config_path);
        let config = Config::default();
        config
            .save(config_path)
            .with_context(|| format!("Failed to write default config to {:?}", config_path))?;
        config
    };

    if let Some(provider) = &cli.provider {
        config.translation.provider = provider.clone().into();
    }

    if let Some(model) = &cli.model {
        let provider_str = config.translation.provider.to_lowercase_string();
        match config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            Some(provider_config) => provider_config.model = model.clone(),
            None => {
                let mut provider_config =
                    app_config::ProviderConfig::new(config.translation.provider.clone());
                provider_config.model = model.clone();
                config.translation.available_providers.push(provider_config);
            }
        }
    }

    if let Some(target) = &cli.target_language {
        config.target_language = target.clone();
    }

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone().into();
    }

    // Only translation needs a provider key
    if matches!(cli.command, Commands::Translate { .. } | Commands::Run { .. }) {
        config.validate().context("Configuration validation failed")?;
    }

    Ok(config)
}
