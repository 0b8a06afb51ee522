//! Generation plan contracts and validation.
//!
//! A plan fixes every knob of a run (table sizes, adoption target,
//! preference weight, seed) so that the same plan always yields the same
//! dataset.

pub mod errors;
pub mod load;
pub mod model;
pub mod schema;
pub mod validate;

pub use errors::{IssueSeverity, PlanError, Result, ValidationIssue, ValidationReport};
pub use load::{load_plan, read_plan_document};
pub use model::{
    DEFAULT_MAX_UNPRODUCTIVE_DRAWS, DEFAULT_PREFERENCE_WEIGHT, MAX_TABLE_ROWS, PLAN_VERSION, Plan,
    PlanOptions,
};
pub use schema::{plan_json_schema, plan_json_schema_value};
pub use validate::{
    ValidatedPlan, validate_plan, validate_plan_json, validate_plan_semantics,
    validate_resolved_plan,
};
