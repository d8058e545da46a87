//! Extraction settings.

use crate::type_normalizer::DEFAULT_COLLECTIONS;
use anyhow::{Context, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the documentation marker attribute when none is configured
pub const DEFAULT_MARKER: &str = "api_doc";

/// Parameter types injected by web frameworks; they never document as parameters.
const DEFAULT_EXCLUDED_PARAMS: &[&str] = &[
    "HttpRequest",
    "HttpResponse",
    "Request",
    "State",
    "Data",
    "Extension",
    "Extensions",
    "HeaderMap",
    "Session",
    "Payload",
    "ConnectInfo",
    "OriginalUri",
    "TypedHeader",
    "Header",
];

/// Parameter wrappers that document as their first type argument.
const DEFAULT_EXTRACTORS: &[&str] = &["Path", "Query", "Json", "Form"];

/// Settings shared by every controller of a run.
///
/// Values are read-only once extraction starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Document public methods even when neither the method nor its class is marked
    pub auto_generate: bool,
    /// Attribute name of the documentation marker
    pub marker: String,
    /// Outer type names of parameters that are dropped from the docs
    pub excluded_param_types: Vec<String>,
    /// Type names documented as "list of" their first type argument
    pub collection_types: Vec<String>,
    /// Request extractors unwrapped before a parameter type is normalized
    pub extractor_types: Vec<String>,
    /// Directory names skipped while scanning
    pub exclude_dirs: Vec<String>,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            auto_generate: false,
            marker: DEFAULT_MARKER.to_string(),
            excluded_param_types: DEFAULT_EXCLUDED_PARAMS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            collection_types: DEFAULT_COLLECTIONS.iter().map(|s| s.to_string()).collect(),
            extractor_types: DEFAULT_EXTRACTORS.iter().map(|s| s.to_string()).collect(),
            exclude_dirs: vec!["target".to_string()],
        }
    }
}

impl DocsConfig {
    /// Loads a YAML config file; missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: DocsConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Whether a parameter of the given outer type is framework-injected
    pub fn is_excluded_param(&self, type_name: &str) -> bool {
        let simple = type_name.rsplit("::").next().unwrap_or(type_name);
        self.excluded_param_types.iter().any(|t| t == simple)
    }
}
