use thiserror::Error;

use crate::model::{PetId, UserId};
use crate::types::Money;

/// Structural error type shared across Pawmatch crates.
///
/// Every variant is fatal: a dataset carrying one of these is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A primary key repeats inside an entity table.
    #[error("duplicate {table} key: {id}")]
    DuplicateKey { table: &'static str, id: u64 },
    /// The same (UserID, PetID) pair was recorded twice.
    #[error("duplicate adoption pair: UserID {user_id}, PetID {pet_id}")]
    DuplicatePair { user_id: UserId, pet_id: PetId },
    /// A pet shows up in more than one adoption record.
    #[error("pet adopted more than once: PetID {0}")]
    PetAdoptedTwice(PetId),
    /// An adoption points at an entity that does not exist.
    #[error("adoption references unknown {table} key: {id}")]
    UnknownReference { table: &'static str, id: u64 },
    /// The adopted pet costs more than the user is willing to pay.
    #[error(
        "adoption over budget: PetID {pet_id} fee {fee} exceeds UserID {user_id} budget {budget}"
    )]
    OverBudget {
        user_id: UserId,
        pet_id: PetId,
        fee: Money,
        budget: Money,
    },
    /// A value could not be parsed into its column domain.
    #[error("invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },
}

/// Convenience alias for results returned by Pawmatch crates.
pub type Result<T> = std::result::Result<T, Error>;
