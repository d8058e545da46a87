//! Serialization of extracted controllers to YAML or JSON, and loading of a
//! previous run's output as the change baseline.

use crate::change::Baseline;
use crate::model::ControllerRecord;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes controllers to YAML format.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml(controllers: &[ControllerRecord]) -> Result<String> {
    debug!("Serializing {} controllers to YAML", controllers.len());
    serde_yaml::to_string(controllers).context("Failed to serialize API docs to YAML")
}

/// Serializes controllers to JSON format with pretty printing.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_json(controllers: &[ControllerRecord]) -> Result<String> {
    debug!("Serializing {} controllers to JSON", controllers.len());
    serde_json::to_string_pretty(controllers).context("Failed to serialize API docs to JSON")
}

/// Writes string content to a file.
///
/// Creates the file and its parent directories if they don't exist, or overwrites
/// the file if it does.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Loads the output of a previous run.
///
/// Files ending in `.json` are read as JSON, everything else as YAML.
pub fn load_baseline(path: &Path) -> Result<Baseline> {
    debug!("Loading baseline from {}", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read baseline file: {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let controllers: Vec<ControllerRecord> = if is_json {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse baseline JSON: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse baseline YAML: {}", path.display()))?
    };

    debug!("Loaded {} baseline controllers", controllers.len());
    Ok(Baseline::new(controllers))
}
