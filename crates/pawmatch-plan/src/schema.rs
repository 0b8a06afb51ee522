use schemars::schema::RootSchema;
use schemars::schema_for;
use serde_json::Value;

use crate::errors::Result;
use crate::model::Plan;

/// Emit the JSON Schema for plan documents.
pub fn plan_json_schema() -> RootSchema {
    schema_for!(Plan)
}

/// The plan JSON Schema as a `serde_json::Value`, ready for validation.
pub fn plan_json_schema_value() -> Result<Value> {
    Ok(serde_json::to_value(plan_json_schema())?)
}
