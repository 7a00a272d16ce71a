//! Input file loading

use anyhow::{Context, Result};
use basketgraph::{AnalysisConfig, CategoryTable, TransactionRecord};
use std::path::Path;

/// Read a JSON array of transaction records
pub fn load_transactions(path: &Path) -> Result<Vec<TransactionRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read transactions from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid transaction JSON in {}", path.display()))
}

/// Read a JSON array of `{product_id, category}` rows
pub fn load_categories(path: &Path) -> Result<CategoryTable> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read categories from {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("invalid category JSON in {}", path.display()))
}

/// Read a YAML config, or JSON when the file ends in `.json`
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config from {}", path.display()))?;

    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let config = match ext {
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("invalid config JSON in {}", path.display()))?,
        _ => serde_yaml::from_str(&content)
            .with_context(|| format!("invalid config YAML in {}", path.display()))?,
    };
    Ok(config)
}
