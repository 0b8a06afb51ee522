//! Core contracts and helpers for Pawmatch.
//!
//! This crate defines the pet, user and adoption record types, the
//! structural error taxonomy, and the invariant checks shared by the
//! generator and the dataset validator.

pub mod error;
pub mod model;
pub mod types;
pub mod validation;

pub use error::{Error, Result};
pub use model::{AdoptionRecord, Dataset, Pet, PetId, User, UserId};
pub use types::{
    ActivityLevel, EnergyLevel, HealthCondition, LivingSpace, Money, PetExperience, PetSize,
    PetType,
};
pub use validation::{EntityIndex, validate_adoptions, validate_dataset, validate_entity_tables};

/// Current contract version for persisted datasets.
pub const DATASET_VERSION: &str = "0.1";

/// File name used for the pet table inside a dataset directory.
pub const PETS_FILE: &str = "pets.csv";
/// File name used for the user table inside a dataset directory.
pub const USERS_FILE: &str = "users.csv";
/// File name used for the adoption table inside a dataset directory.
pub const ADOPTIONS_FILE: &str = "adoptions.csv";
