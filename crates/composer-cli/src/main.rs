use anyhow::Result;
use clap::{Parser, Subcommand};
use composer_core::config::ComposerConfig;
use composer_infrastructure::{ConfigService, ValidationKind};
use std::path::PathBuf;

mod activity_layer;
mod commands;
mod logging;

#[derive(Parser)]
#[command(name = "composer")]
#[command(about = "Agentic Product Composer - simulated AI-assisted component generator", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/composer/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip every simulated delay
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive REPL
    Repl,
    /// Run the agent pipeline once
    Generate {
        /// Description of the app to build
        prompt: String,
        /// Print messages, specification and files as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a local file
    Validate {
        #[arg(long, short, value_parser = parse_kind)]
        kind: ValidationKind,
        file: PathBuf,
    },
    /// Print the effective configuration
    Config {
        /// Write the configuration to the config file if it does not exist yet
        #[arg(long)]
        init: bool,
    },
}

fn parse_kind(value: &str) -> Result<ValidationKind, String> {
    value.parse().map_err(|_| {
        format!(
            "expected one of: {}",
            <ValidationKind as strum::VariantNames>::VARIANTS.join(", ")
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_service = match &cli.config {
        Some(path) => ConfigService::with_path(path),
        None => ConfigService::new(),
    };
    let loaded = config_service.try_get_config();
    let mut config = loaded.as_ref().cloned().unwrap_or_default();
    if cli.instant {
        config = config.without_delays();
    }

    let activity = logging::init(&config.logging.level);
    if let Err(e) = &loaded {
        tracing::warn!(target: "composer::config", error = %e, "Falling back to default configuration");
    }

    run(cli.command, &config_service, config, activity).await
}

async fn run(
    command: Commands,
    config_service: &ConfigService,
    config: ComposerConfig,
    activity: tokio::sync::mpsc::UnboundedReceiver<activity_layer::ActivityEvent>,
) -> Result<()> {
    match command {
        Commands::Repl => commands::repl::run(config, activity).await?,
        Commands::Generate { prompt, json } => commands::generate::run(&config, &prompt, json).await?,
        Commands::Validate { kind, file } => commands::validate::run(kind, &file)?,
        Commands::Config { init: true } => commands::config::init(config_service)?,
        Commands::Config { init: false } => commands::config::show(config_service, &config)?,
    }

    Ok(())
}
