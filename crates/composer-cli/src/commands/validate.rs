use super::display::print_report;
use anyhow::{Context, Result};
use composer_infrastructure::{ValidationKind, ValidationTool};
use std::path::Path;

/// Validates a local file and fails when the report has errors.
pub fn run(kind: ValidationKind, file: &Path) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let report = ValidationTool::new().validate(&content, kind).into_result()?;

    print_report(&report);
    if !report.valid {
        anyhow::bail!("{} validation found {} error(s)", kind, report.errors.len());
    }
    Ok(())
}
