use std::path::Path;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use pawmatch_core::{ADOPTIONS_FILE, AdoptionRecord, PETS_FILE, Pet, USERS_FILE, User};
use pawmatch_generate::model::GenerationReport;
use pawmatch_generate::output::read_table_csv;
use pawmatch_plan::Plan;

use crate::errors::EvalError;
use crate::metrics::{
    METRICS_VERSION, MetricsPlanRef, MetricsReport, PerformanceMetrics, TableMetrics,
};
use crate::model::{EvaluateOptions, EvaluationResult};
use crate::report::render_report;
use crate::validator::validate;

/// Evaluate a dataset directory holding `pets.csv`, `users.csv` and
/// `adoptions.csv`.
#[derive(Debug, Clone, Default)]
pub struct EvaluationEngine {
    options: EvaluateOptions,
}

impl EvaluationEngine {
    pub fn new(options: EvaluateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, dataset_dir: &Path) -> Result<EvaluationResult, EvalError> {
        let total_start = Instant::now();
        let load_start = Instant::now();

        let run_id = detect_run_id(dataset_dir).unwrap_or_else(|| "unknown".to_string());
        let plan = load_resolved_plan(dataset_dir);

        let pets: Vec<Pet> = load_table(dataset_dir, PETS_FILE)?;
        let users: Vec<User> = load_table(dataset_dir, USERS_FILE)?;
        let adoptions: Vec<AdoptionRecord> = load_table(dataset_dir, ADOPTIONS_FILE)?;

        let load_ms = load_start.elapsed().as_millis();
        let validate_start = Instant::now();

        let dataset = validate(&users, &pets, &adoptions).inspect_err(|err| {
            warn!(run_id = %run_id, error = %err, "dataset failed validation");
        })?;

        let validate_ms = validate_start.elapsed().as_millis();

        let tables = vec![
            table_metrics(
                "pets",
                PETS_FILE,
                pets.len(),
                plan.as_ref().map(|plan| plan.num_pets),
            ),
            table_metrics(
                "users",
                USERS_FILE,
                users.len(),
                plan.as_ref().map(|plan| plan.num_users),
            ),
            table_metrics(
                "adoptions",
                ADOPTIONS_FILE,
                adoptions.len(),
                plan.as_ref().map(Plan::effective_adoption_target),
            ),
        ];

        let metrics = MetricsReport {
            metrics_version: METRICS_VERSION.to_string(),
            run_id: run_id.clone(),
            plan_ref: plan.as_ref().map(|plan| MetricsPlanRef {
                plan_version: plan.plan_version.clone(),
                seed: plan.seed,
                preference_weight: plan.preference_weight,
            }),
            tables,
            dataset,
            performance: PerformanceMetrics {
                load_ms,
                validate_ms,
                total_ms: total_start.elapsed().as_millis(),
            },
        };

        let report = render_report(&metrics);
        let out_dir = self
            .options
            .out_dir
            .clone()
            .unwrap_or_else(|| dataset_dir.to_path_buf());
        std::fs::create_dir_all(&out_dir)?;

        let metrics_path = out_dir.join("metrics.json");
        std::fs::write(&metrics_path, serde_json::to_vec_pretty(&metrics)?)?;

        let report_path = out_dir.join("report.md");
        std::fs::write(&report_path, report.as_bytes())?;

        info!(
            run_id = %run_id,
            pets = metrics.dataset.pets,
            users = metrics.dataset.users,
            adoptions = metrics.dataset.adoptions,
            density_percent = metrics.dataset.density_percent,
            preference_match_rate = ?metrics.dataset.preference_match_rate,
            users_without_adoptions = metrics.dataset.users_without_adoptions,
            "evaluation completed"
        );

        Ok(EvaluationResult {
            run_dir: out_dir,
            metrics_path,
            report_path,
            metrics,
            report,
        })
    }
}

fn load_table<T: DeserializeOwned>(dataset_dir: &Path, file: &str) -> Result<Vec<T>, EvalError> {
    let path = dataset_dir.join(file);
    if !path.is_file() {
        return Err(EvalError::InvalidDataset(format!(
            "missing {file} in {}",
            dataset_dir.display()
        )));
    }
    Ok(read_table_csv(&path)?)
}

fn table_metrics(table: &str, file: &str, rows: usize, expected: Option<u64>) -> TableMetrics {
    TableMetrics {
        table: table.to_string(),
        file: file.to_string(),
        rows_found: rows as u64,
        rows_expected: expected,
    }
}

/// The run's resolved plan. `None` when the file is missing or unreadable;
/// the latter is logged.
fn load_resolved_plan(dataset_dir: &Path) -> Option<Plan> {
    let path = dataset_dir.join("resolved_plan.json");
    if !path.is_file() {
        return None;
    }
    let parsed = std::fs::read_to_string(&path)
        .map_err(|err| err.to_string())
        .and_then(|contents| serde_json::from_str(&contents).map_err(|err| err.to_string()));
    match parsed {
        Ok(plan) => Some(plan),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable resolved plan");
            None
        }
    }
}

fn detect_run_id(dataset_dir: &Path) -> Option<String> {
    let report_path = dataset_dir.join("generation_report.json");
    if let Ok(contents) = std::fs::read_to_string(report_path) {
        if let Ok(report) = serde_json::from_str::<GenerationReport>(&contents) {
            return Some(report.run_id);
        }
    }

    let name = dataset_dir.file_name()?.to_string_lossy();
    if let Some((_, run_part)) = name.split_once("__run_") {
        return Some(run_part.to_string());
    }

    None
}
