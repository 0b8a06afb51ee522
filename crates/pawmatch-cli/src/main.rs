mod registry;

use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use pawmatch_eval::{EvalError, EvaluateOptions, EvaluationEngine};
use pawmatch_generate::{GenerateOptions, GenerationEngine, GenerationError};
use pawmatch_plan::{
    Plan, PlanError, PlanOptions, ValidationReport, plan_json_schema, plan_json_schema_value,
    read_plan_document, validate_plan_json, validate_resolved_plan,
};
use registry::{RunContext, init_console_logging, init_run_logging, start_run};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("plan error: {0}")]
    Plan(#[from] PlanError),
    #[error("invalid plan:\n{0}")]
    InvalidPlan(String),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("evaluation error: {0}")]
    Eval(#[from] EvalError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ValidationReport> for CliError {
    fn from(report: ValidationReport) -> Self {
        CliError::InvalidPlan(report.lines().join("\n"))
    }
}

#[derive(Parser, Debug)]
#[command(name = "pawmatch", version, about = "Pawmatch adoption dataset generator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate pets, users and adoptions from a plan.
    Generate(GenerateArgs),
    /// Validate an existing dataset directory and compute its metrics.
    Evaluate(EvaluateArgs),
    /// Print the plan JSON Schema.
    PlanSchema,
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// Plan file (.json or .toml); defaults apply when omitted.
    #[arg(long)]
    plan: Option<PathBuf>,
    /// Override the plan seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Override the number of pets.
    #[arg(long)]
    pets: Option<u64>,
    /// Override the number of users.
    #[arg(long)]
    users: Option<u64>,
    /// Override the requested number of adoptions.
    #[arg(long)]
    adoptions: Option<u64>,
    /// Override the probability of honoring a preferred pet type.
    #[arg(long)]
    preference_weight: Option<f64>,
    /// Override the bound on consecutive empty fill draws.
    #[arg(long)]
    max_unproductive_draws: Option<u64>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Skip dataset evaluation after generation.
    #[arg(long, default_value_t = false)]
    skip_eval: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Directory holding pets.csv, users.csv and adoptions.csv.
    #[arg(value_name = "DATASET_DIR")]
    dataset_dir: PathBuf,
    /// Write metrics.json and report.md here instead of the dataset directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::Evaluate(args) => run_evaluate(args),
        Command::PlanSchema => {
            println!("{}", serde_json::to_string_pretty(&plan_json_schema())?);
            Ok(())
        }
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let plan = resolve_plan(&args)?;
    let validated = validate_resolved_plan(&plan)?;

    let run_id = Uuid::new_v4().to_string();
    let run_ctx = RunContext {
        run_id: run_id.clone(),
        started_at: chrono::Utc::now(),
        command: "generate".to_string(),
        run_dir: args.run_dir.clone(),
        plan: validated.plan.clone(),
    };

    let run_paths = start_run(&run_ctx)?;
    init_run_logging(&run_paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %run_id,
        config = %run_paths.config_path.display()
    );
    for warning in &validated.warnings {
        tracing::warn!(
            event = "plan_warning",
            code = %warning.code,
            path = %warning.path,
            "{}",
            warning.message
        );
    }

    let timer = Instant::now();

    let options = GenerateOptions {
        out_dir: args.run_dir,
        ..GenerateOptions::default()
    };
    let result = GenerationEngine::new(options).run_in(
        &validated.plan,
        &run_id,
        &run_paths.run_root,
    )?;
    tracing::info!(
        event = "dataset_written",
        path = %result.run_dir.display(),
        adoptions = result.generated.dataset.adoptions.len(),
        stop_reason = ?result.generated.stop_reason
    );

    if args.skip_eval {
        println!("run_dir={}", result.run_dir.display());
    } else {
        let evaluation = EvaluationEngine::default().run(&result.run_dir)?;
        tracing::info!(event = "metrics_written", path = %evaluation.metrics_path.display());
        println!("{}", evaluation.report);
    }

    let duration_ms = timer.elapsed().as_millis();
    tracing::info!(event = "run_finished", status = "success", duration_ms = duration_ms);

    Ok(())
}

fn run_evaluate(args: EvaluateArgs) -> Result<(), CliError> {
    init_console_logging()?;

    let engine = EvaluationEngine::new(EvaluateOptions { out_dir: args.out });
    let result = engine.run(&args.dataset_dir)?;
    println!("{}", result.report);
    Ok(())
}

/// Load the plan file, if any, then apply flag overrides on top.
fn resolve_plan(args: &GenerateArgs) -> Result<Plan, CliError> {
    let mut plan = match &args.plan {
        Some(path) => load_checked_plan(path)?,
        None => Plan::default(),
    };

    if let Some(seed) = args.seed {
        plan.seed = seed;
    }
    if let Some(pets) = args.pets {
        plan.num_pets = pets;
    }
    if let Some(users) = args.users {
        plan.num_users = users;
    }
    if let Some(adoptions) = args.adoptions {
        plan.num_adoptions = adoptions;
    }
    if let Some(weight) = args.preference_weight {
        plan.preference_weight = weight;
    }
    if let Some(draws) = args.max_unproductive_draws {
        plan.options
            .get_or_insert_with(PlanOptions::default)
            .max_unproductive_draws = Some(draws);
    }

    Ok(plan)
}

fn load_checked_plan(path: &Path) -> Result<Plan, CliError> {
    let document = read_plan_document(path)?;
    let report = validate_plan_json(&document, &plan_json_schema_value()?)?;
    if !report.is_ok() {
        return Err(report.into());
    }
    Ok(serde_json::from_value(document)?)
}
