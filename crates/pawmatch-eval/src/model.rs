use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsReport;

/// Options for dataset evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluateOptions {
    /// Optional output directory override; defaults to the dataset directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
}

/// Result of a dataset evaluation.
#[derive(Debug, Clone)]
pub struct EvaluationResult {
    pub run_dir: PathBuf,
    pub metrics_path: PathBuf,
    pub report_path: PathBuf,
    pub metrics: MetricsReport,
    pub report: String,
}
