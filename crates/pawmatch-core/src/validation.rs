use std::collections::{HashMap, HashSet};

use crate::error::{Error, Result};
use crate::model::{AdoptionRecord, Dataset, Pet, PetId, User, UserId};

/// Key lookup over the two entity tables.
///
/// Building the index is itself the primary-key check: it fails on the first
/// zero or duplicate PetID, then on the first zero or duplicate UserID.
#[derive(Debug)]
pub struct EntityIndex<'a> {
    pets: HashMap<PetId, &'a Pet>,
    users: HashMap<UserId, &'a User>,
}

impl<'a> EntityIndex<'a> {
    pub fn new(pets: &'a [Pet], users: &'a [User]) -> Result<Self> {
        let mut pet_index = HashMap::with_capacity(pets.len());
        for pet in pets {
            if pet.pet_id.0 == 0 {
                return Err(zero_key("PetID"));
            }
            if pet_index.insert(pet.pet_id, pet).is_some() {
                return Err(Error::DuplicateKey {
                    table: "PetID",
                    id: pet.pet_id.0,
                });
            }
        }

        let mut user_index = HashMap::with_capacity(users.len());
        for user in users {
            if user.user_id.0 == 0 {
                return Err(zero_key("UserID"));
            }
            if user_index.insert(user.user_id, user).is_some() {
                return Err(Error::DuplicateKey {
                    table: "UserID",
                    id: user.user_id.0,
                });
            }
        }

        Ok(Self {
            pets: pet_index,
            users: user_index,
        })
    }

    pub fn pet(&self, id: PetId) -> Option<&'a Pet> {
        self.pets.get(&id).copied()
    }

    pub fn user(&self, id: UserId) -> Option<&'a User> {
        self.users.get(&id).copied()
    }

    /// Fail on the first record whose UserID or PetID is unknown.
    pub fn check_references(&self, adoptions: &[AdoptionRecord]) -> Result<()> {
        for record in adoptions {
            if !self.users.contains_key(&record.user_id) {
                return Err(Error::UnknownReference {
                    table: "UserID",
                    id: record.user_id.0,
                });
            }
            if !self.pets.contains_key(&record.pet_id) {
                return Err(Error::UnknownReference {
                    table: "PetID",
                    id: record.pet_id.0,
                });
            }
        }
        Ok(())
    }

    /// Fail on the first record whose pet costs more than the user's budget.
    ///
    /// Records with unknown references are skipped; run
    /// [`EntityIndex::check_references`] first.
    pub fn check_budgets(&self, adoptions: &[AdoptionRecord]) -> Result<()> {
        for record in adoptions {
            let (Some(user), Some(pet)) = (self.user(record.user_id), self.pet(record.pet_id))
            else {
                continue;
            };
            if !user.can_afford(pet) {
                return Err(Error::OverBudget {
                    user_id: user.user_id,
                    pet_id: pet.pet_id,
                    fee: pet.adoption_fee,
                    budget: user.max_adoption_fee,
                });
            }
        }
        Ok(())
    }
}

fn zero_key(field: &'static str) -> Error {
    Error::InvalidValue {
        field,
        value: "0".to_string(),
    }
}

/// Validate primary-key uniqueness of both entity tables.
pub fn validate_entity_tables(pets: &[Pet], users: &[User]) -> Result<()> {
    EntityIndex::new(pets, users).map(|_| ())
}

/// Validate adoption records against already key-unique entity tables.
///
/// Checks run in this order, each stopping at the first offender:
/// - duplicate (UserID, PetID) pairs
/// - a PetID adopted more than once
/// - unknown UserID or PetID
/// - fee above the adopter's budget
pub fn validate_adoptions(
    index: &EntityIndex<'_>,
    adoptions: &[AdoptionRecord],
) -> Result<()> {
    let mut pairs = HashSet::with_capacity(adoptions.len());
    for record in adoptions {
        if !pairs.insert((record.user_id, record.pet_id)) {
            return Err(Error::DuplicatePair {
                user_id: record.user_id,
                pet_id: record.pet_id,
            });
        }
    }

    let mut adopted = HashSet::with_capacity(adoptions.len());
    for record in adoptions {
        if !adopted.insert(record.pet_id) {
            return Err(Error::PetAdoptedTwice(record.pet_id));
        }
    }

    index.check_references(adoptions)?;
    index.check_budgets(adoptions)
}

/// Run every structural check over a full dataset.
pub fn validate_dataset(dataset: &Dataset) -> Result<()> {
    let index = EntityIndex::new(&dataset.pets, &dataset.users)?;
    validate_adoptions(&index, &dataset.adoptions)
}
