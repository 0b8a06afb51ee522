use serde::{Deserialize, Serialize};

use pawmatch_core::PetType;

/// Metrics contract version for dataset evaluation.
pub const METRICS_VERSION: &str = "0.1";

/// Machine-readable metrics for a dataset evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsReport {
    pub metrics_version: String,
    pub run_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_ref: Option<MetricsPlanRef>,
    pub tables: Vec<TableMetrics>,
    pub dataset: DatasetMetrics,
    pub performance: PerformanceMetrics,
}

/// Reference metadata for the plan that produced the dataset, when known.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsPlanRef {
    pub plan_version: String,
    pub seed: u64,
    pub preference_weight: f64,
}

/// Per-table row counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableMetrics {
    pub table: String,
    pub file: String,
    pub rows_found: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows_expected: Option<u64>,
}

/// Descriptive metrics of a structurally valid dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetMetrics {
    pub pets: u64,
    pub users: u64,
    pub adoptions: u64,
    /// Realized pairs over the user x pet cross product, in percent.
    pub density_percent: f64,
    /// Adoptions per user, over users with at least one adoption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adoptions_per_user: Option<DistributionSummary>,
    pub users_without_adoptions: u64,
    pub distinct_breeds: u64,
    /// Pet table breed counts, most frequent first.
    pub breed_frequency: Vec<BreedCount>,
    /// Fraction of adoptions whose pet type is the adopter's preferred type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preference_match_rate: Option<f64>,
    pub adoptions_by_pet_type: Vec<PetTypeCount>,
}

/// Count, moments and quartiles of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistributionSummary {
    pub count: u64,
    pub mean: f64,
    /// Sample standard deviation; absent for a single observation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub std: Option<f64>,
    pub min: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub max: f64,
}

impl DistributionSummary {
    /// Summarize `values`, or `None` for an empty sample.
    ///
    /// Quartiles interpolate linearly between closest ranks.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = (count > 1).then(|| {
            let squares: f64 = sorted.iter().map(|value| (value - mean).powi(2)).sum();
            (squares / (count - 1) as f64).sqrt()
        });

        Some(Self {
            count: count as u64,
            mean,
            std,
            min: sorted[0],
            p25: quantile(&sorted, 0.25),
            p50: quantile(&sorted, 0.5),
            p75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Number of pets of one breed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreedCount {
    pub breed: String,
    pub count: u64,
}

/// Number of adoptions of one pet type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PetTypeCount {
    pub pet_type: PetType,
    pub count: u64,
}

/// Performance timings for the evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub load_ms: u128,
    pub validate_ms: u128,
    pub total_ms: u128,
}
