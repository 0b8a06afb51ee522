use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Contract version for plan documents.
pub const PLAN_VERSION: &str = "0.1";

/// Probability of honoring a declared type preference during random fill.
pub const DEFAULT_PREFERENCE_WEIGHT: f64 = 0.7;

/// Consecutive empty fill-phase draws tolerated before a run stops early.
pub const DEFAULT_MAX_UNPRODUCTIVE_DRAWS: u64 = 10_000;

/// Largest pet or user table a plan may request.
pub const MAX_TABLE_ROWS: u64 = 10_000_000;

/// Optional plan-level tuning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PlanOptions {
    /// Bound on consecutive fill-phase draws that emit no adoption.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(range(min = 1))]
    pub max_unproductive_draws: Option<u64>,
}

/// Canonical plan definition for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Plan {
    /// Contract version for the plan format.
    pub plan_version: String,
    /// Seed for reproducibility.
    pub seed: u64,
    /// Number of pet rows to sample.
    #[schemars(range(min = 1, max = 10000000))]
    pub num_pets: u64,
    /// Number of user rows to sample.
    #[schemars(range(min = 1, max = 10000000))]
    pub num_users: u64,
    /// Requested adoption rows, before clamping to the pet pool size.
    pub num_adoptions: u64,
    /// Probability of honoring a user's preferred pet type.
    #[serde(default = "default_preference_weight")]
    #[schemars(range(min = 0.0, max = 1.0))]
    pub preference_weight: f64,
    /// Optional plan-level options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PlanOptions>,
}

fn default_preference_weight() -> f64 {
    DEFAULT_PREFERENCE_WEIGHT
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            plan_version: PLAN_VERSION.to_string(),
            seed: 42,
            num_pets: 1000,
            num_users: 1000,
            num_adoptions: 25_000,
            preference_weight: DEFAULT_PREFERENCE_WEIGHT,
            options: None,
        }
    }
}

impl Plan {
    pub fn max_unproductive_draws(&self) -> u64 {
        self.options
            .as_ref()
            .and_then(|opts| opts.max_unproductive_draws)
            .unwrap_or(DEFAULT_MAX_UNPRODUCTIVE_DRAWS)
    }

    /// Adoption target after clamping to the pet pool: a pet can only be
    /// adopted once.
    pub fn effective_adoption_target(&self) -> u64 {
        self.num_adoptions.min(self.num_pets)
    }
}
