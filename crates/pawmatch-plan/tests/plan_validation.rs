use std::path::Path;

use pawmatch_plan::{
    MAX_TABLE_ROWS, Plan, PlanOptions, load_plan, plan_json_schema_value, read_plan_document,
    validate_plan, validate_plan_json, validate_resolved_plan,
};
use serde_json::json;

fn plans_dir() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/../../plans"))
}

#[test]
fn default_plan_validates_against_schema() {
    let plan_json = read_plan_document(&plans_dir().join("default.plan.json")).expect("read plan");
    let plan_schema = plan_json_schema_value().expect("plan schema");

    let structural = validate_plan_json(&plan_json, &plan_schema).expect("validate plan json");
    assert!(structural.errors.is_empty(), "structural errors found");

    let validated = validate_plan(&plan_json, &plan_schema).expect("plan validation");
    assert_eq!(validated.plan, Plan::default());
    let codes: Vec<&str> = validated
        .warnings
        .iter()
        .map(|issue| issue.code.as_str())
        .collect();
    assert_eq!(codes, vec!["adoptions_clamped"]);
}

#[test]
fn toml_plan_loads_with_options() {
    let plan = load_plan(&plans_dir().join("small.plan.toml")).expect("load toml plan");
    assert_eq!(plan.seed, 7);
    assert_eq!(plan.max_unproductive_draws(), 5000);
    assert_eq!(plan.effective_adoption_target(), 150);
}

#[test]
fn preference_weight_defaults_when_missing() {
    let plan_json = json!({
        "plan_version": "0.1",
        "seed": 1,
        "num_pets": 10,
        "num_users": 5,
        "num_adoptions": 5
    });
    let plan_schema = plan_json_schema_value().expect("plan schema");
    let validated = validate_plan(&plan_json, &plan_schema).expect("plan validation");
    assert_eq!(validated.plan.preference_weight, 0.7);
    assert!(validated.warnings.is_empty());
}

#[test]
fn schema_rejects_out_of_range_weight() {
    let plan_json = json!({
        "plan_version": "0.1",
        "seed": 1,
        "num_pets": 10,
        "num_users": 5,
        "num_adoptions": 5,
        "preference_weight": 1.5
    });
    let plan_schema = plan_json_schema_value().expect("plan schema");
    let report = validate_plan(&plan_json, &plan_schema).expect_err("weight out of range");
    assert!(
        report
            .errors
            .iter()
            .any(|issue| issue.path == "/preference_weight")
    );
}

#[test]
fn resolved_plan_reports_semantic_errors() {
    let plan = Plan {
        plan_version: "9.9".to_string(),
        options: Some(PlanOptions {
            max_unproductive_draws: Some(0),
        }),
        ..Plan::default()
    };
    let report = validate_resolved_plan(&plan).expect_err("invalid plan");
    assert!(!report.is_ok());
    assert!(report.lines().iter().any(|line| line.starts_with("error")));
}

#[test]
fn oversized_tables_are_rejected() {
    let plan = Plan {
        num_pets: u64::MAX,
        num_users: MAX_TABLE_ROWS + 1,
        num_adoptions: 1,
        ..Plan::default()
    };
    let report = validate_resolved_plan(&plan).expect_err("oversized plan");
    let codes: Vec<&str> = report
        .errors
        .iter()
        .map(|issue| issue.code.as_str())
        .collect();
    assert!(codes.contains(&"pets_too_many"));
    assert!(codes.contains(&"users_too_many"));

    let plan_json = json!({
        "plan_version": "1.0",
        "seed": 1,
        "num_pets": MAX_TABLE_ROWS + 1,
        "num_users": 5,
        "num_adoptions": 5,
        "preference_weight": 0.5
    });
    let plan_schema = plan_json_schema_value().expect("plan schema");
    let report = validate_plan(&plan_json, &plan_schema).expect_err("schema ceiling");
    assert!(report.errors.iter().any(|issue| issue.path == "/num_pets"));

    let at_limit = Plan {
        num_pets: MAX_TABLE_ROWS,
        num_adoptions: 1,
        ..Plan::default()
    };
    assert!(validate_resolved_plan(&at_limit).is_ok());
}
