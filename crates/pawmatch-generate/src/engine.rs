use std::path::{Path, PathBuf};
use std::time::Instant;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use pawmatch_core::{ADOPTIONS_FILE, AdoptionRecord, Dataset, PETS_FILE, Pet, USERS_FILE, User};
use pawmatch_plan::{MAX_TABLE_ROWS, Plan};

use crate::entities::{PetGenerator, UserGenerator};
use crate::errors::GenerationError;
use crate::matching::{MatchGenerator, MatchOptions, MatchStats, StopReason};
use crate::model::{GenerateOptions, GenerationReport, TableReport};
use crate::output::write_table_csv;
use crate::seed::{ADOPTIONS_STREAM, PETS_STREAM, USERS_STREAM, hash_seed};

/// In-memory output of a plan.
#[derive(Debug, Clone)]
pub struct GeneratedDataset {
    pub dataset: Dataset,
    /// Adoption target after clamping to the pet pool size.
    pub adoption_target: usize,
    pub stop_reason: StopReason,
    pub stats: MatchStats,
}

/// Samples entity tables and matches them, without touching the filesystem.
#[derive(Debug, Clone, Default)]
pub struct DatasetGenerator {
    pets: PetGenerator,
    users: UserGenerator,
}

impl DatasetGenerator {
    pub fn new(pets: PetGenerator, users: UserGenerator) -> Self {
        Self { pets, users }
    }

    pub fn generate(&self, plan: &Plan) -> Result<GeneratedDataset, GenerationError> {
        check_plan(plan)?;

        let mut pet_rng = ChaCha8Rng::seed_from_u64(hash_seed(plan.seed, PETS_STREAM));
        let mut user_rng = ChaCha8Rng::seed_from_u64(hash_seed(plan.seed, USERS_STREAM));
        let mut adoption_rng = ChaCha8Rng::seed_from_u64(hash_seed(plan.seed, ADOPTIONS_STREAM));

        let pets = self.pets.generate_table(plan.num_pets, &mut pet_rng)?;
        info!(rows = pets.len(), "pet table generated");
        let users = self.users.generate_table(plan.num_users, &mut user_rng)?;
        info!(rows = users.len(), "user table generated");

        let matcher = MatchGenerator::new(MatchOptions {
            preference_weight: plan.preference_weight,
            max_unproductive_draws: plan.max_unproductive_draws(),
            ..MatchOptions::default()
        });
        let target = usize::try_from(plan.num_adoptions).unwrap_or(usize::MAX);
        let outcome = matcher.generate(&users, &pets, target, &mut adoption_rng)?;

        Ok(GeneratedDataset {
            dataset: Dataset {
                pets,
                users,
                adoptions: outcome.records,
            },
            adoption_target: outcome.target,
            stop_reason: outcome.stop_reason,
            stats: outcome.stats,
        })
    }
}

/// Generate a dataset from a plan with the default distributions.
pub fn generate_dataset(plan: &Plan) -> Result<GeneratedDataset, GenerationError> {
    DatasetGenerator::default().generate(plan)
}

/// Result of a generation run.
#[derive(Debug, Clone)]
pub struct GenerationResult {
    pub run_dir: PathBuf,
    pub report: GenerationReport,
    pub generated: GeneratedDataset,
}

/// Entry point for generating a dataset from a plan and persisting it.
#[derive(Debug, Clone)]
pub struct GenerationEngine {
    options: GenerateOptions,
}

impl GenerationEngine {
    pub fn new(options: GenerateOptions) -> Self {
        Self { options }
    }

    pub fn run(&self, plan: &Plan) -> Result<GenerationResult, GenerationError> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let timestamp = chrono::Utc::now().format("%Y-%m-%dT%H-%M-%SZ").to_string();
        let run_dir = self
            .options
            .out_dir
            .join(format!("{timestamp}__run_{run_id}"));
        self.run_in(plan, &run_id, &run_dir)
    }

    /// Run into a caller-chosen directory.
    pub fn run_in(
        &self,
        plan: &Plan,
        run_id: &str,
        run_dir: &Path,
    ) -> Result<GenerationResult, GenerationError> {
        let start = Instant::now();
        std::fs::create_dir_all(run_dir)?;
        std::fs::write(
            run_dir.join("resolved_plan.json"),
            serde_json::to_vec_pretty(plan)?,
        )?;

        let mut report = GenerationReport::new(run_id.to_string(), plan.seed);
        report.adoption_target = plan.effective_adoption_target();

        info!(
            run_id = %run_id,
            seed = plan.seed,
            pets = plan.num_pets,
            users = plan.num_users,
            adoptions = plan.num_adoptions,
            "generation started"
        );

        let generator = DatasetGenerator::new(
            PetGenerator::with_config(self.options.pets.clone()),
            UserGenerator::with_config(self.options.users.clone()),
        );
        let outcome = generator
            .generate(plan)
            .and_then(|generated| {
                write_dataset(run_dir, plan, &generated.dataset, &mut report)?;
                Ok(generated)
            });

        report.duration_ms = start.elapsed().as_millis() as u64;
        let report_path = run_dir.join("generation_report.json");

        match outcome {
            Ok(generated) => {
                report.stop_reason = Some(generated.stop_reason);
                report.matching = Some(generated.stats.clone());
                std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
                info!(
                    run_id = %run_id,
                    adoptions = generated.dataset.adoptions.len(),
                    target = generated.adoption_target,
                    stop_reason = ?generated.stop_reason,
                    duration_ms = report.duration_ms,
                    bytes_written = report.bytes_written,
                    "generation completed"
                );
                Ok(GenerationResult {
                    run_dir: run_dir.to_path_buf(),
                    report,
                    generated,
                })
            }
            Err(err) => {
                report.record_failure(err.to_string());
                std::fs::write(&report_path, serde_json::to_vec_pretty(&report)?)?;
                warn!(run_id = %run_id, error = %err, "generation failed");
                Err(err)
            }
        }
    }
}

/// Write the three tables of a dataset into `dir`.
pub fn write_dataset(
    dir: &Path,
    plan: &Plan,
    dataset: &Dataset,
    report: &mut GenerationReport,
) -> Result<(), GenerationError> {
    report.record_table(write_table::<Pet>(
        dir,
        "pets",
        PETS_FILE,
        &Pet::COLUMNS,
        &dataset.pets,
        plan.num_pets,
    )?);
    report.record_table(write_table::<User>(
        dir,
        "users",
        USERS_FILE,
        &User::COLUMNS,
        &dataset.users,
        plan.num_users,
    )?);
    report.record_table(write_table::<AdoptionRecord>(
        dir,
        "adoptions",
        ADOPTIONS_FILE,
        &AdoptionRecord::COLUMNS,
        &dataset.adoptions,
        plan.num_adoptions,
    )?);
    Ok(())
}

fn write_table<T: serde::Serialize>(
    dir: &Path,
    table: &str,
    file: &str,
    header: &[&str],
    rows: &[T],
    rows_requested: u64,
) -> Result<TableReport, GenerationError> {
    let digest = write_table_csv(&dir.join(file), header, rows)?;
    info!(table, rows = digest.rows, bytes = digest.bytes_written, "table written");
    Ok(TableReport {
        table: table.to_string(),
        file: file.to_string(),
        rows_requested,
        rows_generated: digest.rows,
        bytes_written: digest.bytes_written,
        sha256: digest.sha256,
    })
}

fn check_plan(plan: &Plan) -> Result<(), GenerationError> {
    if plan.num_pets == 0 {
        return Err(GenerationError::InvalidPlan(
            "num_pets must be greater than zero".to_string(),
        ));
    }
    if plan.num_users == 0 {
        return Err(GenerationError::InvalidPlan(
            "num_users must be greater than zero".to_string(),
        ));
    }
    if plan.num_pets > MAX_TABLE_ROWS || plan.num_users > MAX_TABLE_ROWS {
        return Err(GenerationError::InvalidPlan(format!(
            "num_pets and num_users must not exceed {MAX_TABLE_ROWS}"
        )));
    }
    Ok(())
}
