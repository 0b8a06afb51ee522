//! Deterministic dataset generation for Pawmatch.
//!
//! Entity tables are sampled from fixed categorical/numeric distributions,
//! then the match generator assigns pets to users under budget, preference
//! and one-adopter-per-pet constraints. Every random draw comes from a
//! ChaCha stream derived from the plan seed.

pub mod engine;
pub mod entities;
pub mod errors;
pub mod matching;
pub mod model;
pub mod output;
pub mod pool;
pub mod seed;

pub use engine::{
    DatasetGenerator, GeneratedDataset, GenerationEngine, GenerationResult, generate_dataset,
    write_dataset,
};
pub use entities::{ClippedNormal, PetGenConfig, PetGenerator, UserGenConfig, UserGenerator};
pub use errors::GenerationError;
pub use matching::{
    MatchGenerator, MatchOptions, MatchOutcome, MatchStats, StopReason, generate_adoptions,
};
pub use model::{GenerateOptions, GenerationReport, TableReport};
pub use pool::PetPool;
