use std::fs;
use std::path::PathBuf;

use pawmatch_core::{ADOPTIONS_FILE, AdoptionRecord, PETS_FILE, Pet, USERS_FILE, User};
use pawmatch_generate::output::read_table_csv;
use pawmatch_generate::{GenerateOptions, GenerationEngine, generate_dataset};
use pawmatch_plan::Plan;

fn small_plan() -> Plan {
    Plan {
        seed: 7,
        num_pets: 120,
        num_users: 40,
        num_adoptions: 80,
        ..Plan::default()
    }
}

fn engine_for(label: &str) -> GenerationEngine {
    let mut options = GenerateOptions::default();
    options.out_dir = temp_out_dir(label);
    GenerationEngine::new(options)
}

#[test]
fn generate_is_deterministic() {
    let plan = small_plan();

    let result_a = engine_for("run_a").run(&plan).expect("run generation A");
    let result_b = engine_for("run_b").run(&plan).expect("run generation B");

    for file in [PETS_FILE, USERS_FILE, ADOPTIONS_FILE] {
        let a = fs::read_to_string(result_a.run_dir.join(file)).expect("read csv A");
        let b = fs::read_to_string(result_b.run_dir.join(file)).expect("read csv B");
        assert_eq!(a, b, "{file} should be deterministic");
    }

    let hashes = |report: &pawmatch_generate::GenerationReport| {
        report
            .tables
            .iter()
            .map(|table| table.sha256.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(hashes(&result_a.report), hashes(&result_b.report));
}

#[test]
fn generate_writes_run_artifacts() {
    let plan = small_plan();
    let result = engine_for("run_artifacts").run(&plan).expect("run generation");

    for file in [
        "resolved_plan.json",
        "generation_report.json",
        PETS_FILE,
        USERS_FILE,
        ADOPTIONS_FILE,
    ] {
        assert!(result.run_dir.join(file).exists(), "missing {file}");
    }

    let pets_table = result.report.table("pets").expect("pets table report");
    assert_eq!(pets_table.rows_generated, 120);
    assert!(result.report.table("owners").is_none());

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(result.run_dir.join("generation_report.json"))
            .expect("read generation_report.json"),
    )
    .expect("parse report");
    let tables = report
        .get("tables")
        .and_then(|value| value.as_array())
        .expect("tables array");
    assert_eq!(tables.len(), 3);
    assert!(report.get("stop_reason").is_some());
    assert!(report.get("failure").is_none());
}

#[test]
fn written_tables_round_trip_and_hold_invariants() {
    let plan = small_plan();
    let result = engine_for("run_tables").run(&plan).expect("run generation");

    let pets: Vec<Pet> = read_table_csv(&result.run_dir.join(PETS_FILE)).expect("read pets");
    let users: Vec<User> = read_table_csv(&result.run_dir.join(USERS_FILE)).expect("read users");
    let adoptions: Vec<AdoptionRecord> =
        read_table_csv(&result.run_dir.join(ADOPTIONS_FILE)).expect("read adoptions");

    assert_eq!(pets.len(), 120);
    assert_eq!(users.len(), 40);
    assert_eq!(adoptions, result.generated.dataset.adoptions);
    assert!(adoptions.len() <= 80);

    let dataset = pawmatch_core::Dataset {
        pets,
        users,
        adoptions,
    };
    pawmatch_core::validate_dataset(&dataset).expect("persisted dataset is valid");
}

#[test]
fn adoption_target_is_clamped_to_pet_count() {
    let plan = Plan {
        seed: 3,
        num_pets: 10,
        num_users: 20,
        num_adoptions: 1_000,
        ..Plan::default()
    };

    let generated = generate_dataset(&plan).expect("generate");

    assert_eq!(generated.adoption_target, 10);
    assert!(generated.dataset.adoptions.len() <= 10);
}

#[test]
fn oversized_plan_is_rejected() {
    let plan = Plan {
        num_pets: u64::MAX,
        num_adoptions: 1,
        ..small_plan()
    };

    let err = generate_dataset(&plan).expect_err("u64::MAX pets must fail");
    assert!(matches!(
        err,
        pawmatch_generate::GenerationError::InvalidPlan(_)
    ));
}

#[test]
fn invalid_plan_writes_failure_report() {
    let plan = Plan {
        num_users: 0,
        ..small_plan()
    };
    let run_dir = temp_out_dir("run_failure").join("run");

    let err = engine_for("unused")
        .run_in(&plan, "failure", &run_dir)
        .expect_err("zero users must fail");
    assert!(matches!(
        err,
        pawmatch_generate::GenerationError::InvalidPlan(_)
    ));

    let report: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(run_dir.join("generation_report.json")).expect("read report"),
    )
    .expect("parse report");
    assert!(report.get("failure").and_then(|v| v.as_str()).is_some());
}

fn temp_out_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!(
        "pawmatch_generate_{label}_{}",
        uuid::Uuid::new_v4()
    ));
    fs::create_dir_all(&dir).expect("create temp out dir");
    dir
}
