use std::path::Path;

use serde_json::Value;

use crate::errors::{PlanError, Result};
use crate::model::Plan;

/// Read a plan document from `.json` or `.toml` into a JSON value.
///
/// TOML documents are converted so both formats go through the same JSON
/// Schema validation.
pub fn read_plan_document(path: &Path) -> Result<Value> {
    let contents = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => Ok(serde_json::from_str(&contents)?),
        Some("toml") => Ok(toml::from_str::<Value>(&contents)?),
        _ => Err(PlanError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Read and deserialize a plan without semantic validation.
pub fn load_plan(path: &Path) -> Result<Plan> {
    let document = read_plan_document(path)?;
    Ok(serde_json::from_value(document)?)
}
