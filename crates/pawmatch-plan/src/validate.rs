use jsonschema::JSONSchema;
use serde_json::Value;

use crate::errors::{PlanError, ValidationIssue, ValidationReport};
use crate::model::{MAX_TABLE_ROWS, PLAN_VERSION, Plan};
use crate::schema::plan_json_schema_value;

/// Validated plan with accumulated warnings.
#[derive(Debug, Clone)]
pub struct ValidatedPlan {
    pub plan: Plan,
    pub warnings: Vec<ValidationIssue>,
}

/// Validate a plan JSON document against the plan JSON Schema.
pub fn validate_plan_json(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidationReport, PlanError> {
    let compiled =
        JSONSchema::compile(plan_schema).map_err(|err| PlanError::Schema(err.to_string()))?;

    let mut report = ValidationReport::default();

    if let Err(errors) = compiled.validate(plan_json) {
        for error in errors {
            let path = normalized_json_pointer(&error.instance_path.to_string());
            report.push(ValidationIssue::error(
                "schema_violation",
                path,
                error.to_string(),
                None,
            ));
        }
    }

    Ok(report)
}

/// Semantic checks the JSON Schema cannot express.
pub fn validate_plan_semantics(plan: &Plan) -> ValidationReport {
    let mut report = ValidationReport::default();

    if plan.plan_version != PLAN_VERSION {
        report.push(ValidationIssue::error(
            "plan_version_unsupported",
            "/plan_version",
            format!(
                "plan_version '{}' is not supported (expected '{PLAN_VERSION}')",
                plan.plan_version
            ),
            Some(format!("set plan_version to \"{PLAN_VERSION}\"")),
        ));
    }

    if plan.num_pets == 0 {
        report.push(ValidationIssue::error(
            "pets_zero",
            "/num_pets",
            "num_pets must be greater than zero",
            Some("set num_pets to a positive integer".to_string()),
        ));
    }

    if plan.num_users == 0 {
        report.push(ValidationIssue::error(
            "users_zero",
            "/num_users",
            "num_users must be greater than zero",
            Some("set num_users to a positive integer".to_string()),
        ));
    }

    if plan.num_pets > MAX_TABLE_ROWS {
        report.push(ValidationIssue::error(
            "pets_too_many",
            "/num_pets",
            format!(
                "num_pets {} exceeds the limit of {MAX_TABLE_ROWS}",
                plan.num_pets
            ),
            None,
        ));
    }

    if plan.num_users > MAX_TABLE_ROWS {
        report.push(ValidationIssue::error(
            "users_too_many",
            "/num_users",
            format!(
                "num_users {} exceeds the limit of {MAX_TABLE_ROWS}",
                plan.num_users
            ),
            None,
        ));
    }

    if !plan.preference_weight.is_finite() || !(0.0..=1.0).contains(&plan.preference_weight) {
        report.push(ValidationIssue::error(
            "preference_weight_out_of_range",
            "/preference_weight",
            format!(
                "preference_weight must be within [0, 1], got {}",
                plan.preference_weight
            ),
            None,
        ));
    }

    if plan.num_adoptions > plan.num_pets {
        report.push(ValidationIssue::warning(
            "adoptions_clamped",
            "/num_adoptions",
            format!(
                "num_adoptions {} exceeds num_pets {}; the target is clamped to {}",
                plan.num_adoptions,
                plan.num_pets,
                plan.effective_adoption_target()
            ),
            Some("each pet can be adopted at most once".to_string()),
        ));
    }

    if plan.max_unproductive_draws() == 0 {
        report.push(ValidationIssue::error(
            "max_unproductive_draws_zero",
            "/options/max_unproductive_draws",
            "max_unproductive_draws must be greater than zero",
            None,
        ));
    }

    report
}

/// Validate the plan end-to-end, returning structured issues on failure.
pub fn validate_plan(
    plan_json: &Value,
    plan_schema: &Value,
) -> Result<ValidatedPlan, ValidationReport> {
    let structural = match validate_plan_json(plan_json, plan_schema) {
        Ok(report) => report,
        Err(err) => return Err(single_error("schema_validation_error", err.to_string())),
    };
    if !structural.is_ok() {
        return Err(structural);
    }

    let plan: Plan = match serde_json::from_value(plan_json.clone()) {
        Ok(plan) => plan,
        Err(err) => return Err(single_error("invalid_plan_json", err.to_string())),
    };

    let semantic = validate_plan_semantics(&plan);
    if !semantic.is_ok() {
        return Err(semantic);
    }

    Ok(ValidatedPlan {
        plan,
        warnings: semantic.warnings,
    })
}

/// Validate a plan assembled in memory (e.g. a file plus CLI overrides).
pub fn validate_resolved_plan(plan: &Plan) -> Result<ValidatedPlan, ValidationReport> {
    let plan_json = serde_json::to_value(plan)
        .map_err(|err| single_error("invalid_plan_json", err.to_string()))?;
    let plan_schema = plan_json_schema_value()
        .map_err(|err| single_error("schema_validation_error", err.to_string()))?;
    validate_plan(&plan_json, &plan_schema)
}

fn single_error(code: &str, message: String) -> ValidationReport {
    let mut report = ValidationReport::default();
    report.push(ValidationIssue::error(code, "/", message, None));
    report
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
