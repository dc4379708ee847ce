use super::display::print_message;
use anyhow::{Context, Result};
use composer_application::ComposerUseCase;
use composer_core::config::ComposerConfig;
use serde_json::json;

/// Runs the pipeline once and prints the new messages.
pub async fn run(config: &ComposerConfig, prompt: &str, as_json: bool) -> Result<()> {
    let composer = ComposerUseCase::new(config);
    let messages = composer.submit(prompt).await;

    if as_json {
        let files: Vec<String> = composer
            .tools()
            .filesystem
            .list("", true)
            .await
            .into_result()?
            .into_iter()
            .filter(|entry| entry.size.is_some())
            .map(|entry| entry.path)
            .collect();
        let output = json!({
            "messages": messages,
            "specification": composer.specification().await,
            "files": files,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).context("Failed to serialize output")?
        );
    } else {
        for message in &messages {
            print_message(message);
        }
    }

    if messages.iter().any(|m| m.is_error()) {
        anyhow::bail!("Generation failed");
    }
    Ok(())
}
