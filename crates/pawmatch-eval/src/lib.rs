//! Dataset validation and quality metrics for Pawmatch.
//!
//! The validator fails fast on structural violations and otherwise derives
//! descriptive metrics; the engine runs it over a dataset directory and
//! persists `metrics.json` and `report.md`.

pub mod engine;
pub mod errors;
pub mod metrics;
pub mod model;
pub mod report;
pub mod validator;

pub use engine::EvaluationEngine;
pub use errors::EvalError;
pub use metrics::{
    BreedCount, DatasetMetrics, DistributionSummary, METRICS_VERSION, MetricsPlanRef,
    MetricsReport, PerformanceMetrics, PetTypeCount, TableMetrics,
};
pub use model::{EvaluateOptions, EvaluationResult};
pub use report::render_report;
pub use validator::{evaluate_dataset, validate};
