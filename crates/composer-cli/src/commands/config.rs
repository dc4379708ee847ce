use anyhow::{Context, Result, bail};
use colored::Colorize;
use composer_core::config::ComposerConfig;
use composer_infrastructure::ConfigService;

/// Prints the effective configuration as TOML.
pub fn show(service: &ConfigService, config: &ComposerConfig) -> Result<()> {
    match service.path() {
        Some(path) if path.exists() => {
            println!("{}", format!("# loaded from {}", path.display()).bright_black())
        }
        Some(path) => println!(
            "{}",
            format!("# defaults ({} does not exist)", path.display()).bright_black()
        ),
        None => println!("{}", "# defaults".bright_black()),
    }
    print!(
        "{}",
        toml::to_string_pretty(config).context("Failed to serialize configuration")?
    );
    Ok(())
}

/// Writes the loaded (or default) configuration to the config file.
///
/// Refuses to overwrite an existing file.
pub fn init(service: &ConfigService) -> Result<()> {
    let Some(path) = service.path() else {
        bail!("Could not determine home directory; pass --config <path>");
    };
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let config = service.get_config();
    service
        .save(&config)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{}", format!("Wrote {}", path.display()).bright_green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_init_writes_once() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("composer").join("config.toml");
        let service = ConfigService::with_path(&path);

        init(&service).unwrap();
        let written = ConfigService::with_path(&path).load().unwrap();
        assert_eq!(written, ComposerConfig::default());

        assert!(init(&service).is_err());
    }
}
