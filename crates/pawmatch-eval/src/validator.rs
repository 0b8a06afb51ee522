//! Structural checks and descriptive metrics over the three tables.

use std::collections::{BTreeMap, HashMap};

use pawmatch_core::{
    AdoptionRecord, Dataset, EntityIndex, Pet, PetType, User, UserId, validate_adoptions,
};

use crate::errors::EvalError;
use crate::metrics::{BreedCount, DatasetMetrics, DistributionSummary, PetTypeCount};

/// Validate a dataset and derive its metrics.
///
/// Hard checks stop at the first offender, in this order: duplicate PetID,
/// duplicate UserID, duplicate adoption pair, pet adopted twice, unknown
/// reference, fee over budget.
pub fn validate(
    users: &[User],
    pets: &[Pet],
    adoptions: &[AdoptionRecord],
) -> Result<DatasetMetrics, EvalError> {
    let index = EntityIndex::new(pets, users)?;
    validate_adoptions(&index, adoptions)?;
    Ok(collect_metrics(&index, users, pets, adoptions))
}

/// [`validate`] over an in-memory [`Dataset`].
pub fn evaluate_dataset(dataset: &Dataset) -> Result<DatasetMetrics, EvalError> {
    validate(&dataset.users, &dataset.pets, &dataset.adoptions)
}

fn collect_metrics(
    index: &EntityIndex<'_>,
    users: &[User],
    pets: &[Pet],
    adoptions: &[AdoptionRecord],
) -> DatasetMetrics {
    let density_percent = if users.is_empty() || pets.is_empty() {
        0.0
    } else {
        adoptions.len() as f64 / (users.len() as f64 * pets.len() as f64) * 100.0
    };

    let mut per_user: BTreeMap<UserId, u64> = BTreeMap::new();
    for record in adoptions {
        *per_user.entry(record.user_id).or_default() += 1;
    }
    let counts: Vec<f64> = per_user.values().map(|&count| count as f64).collect();

    let mut matching = 0_u64;
    let mut by_type: HashMap<PetType, u64> = HashMap::new();
    for record in adoptions {
        let (Some(user), Some(pet)) = (index.user(record.user_id), index.pet(record.pet_id))
        else {
            continue;
        };
        if user.prefers(pet) {
            matching += 1;
        }
        *by_type.entry(pet.pet_type).or_default() += 1;
    }
    let preference_match_rate =
        (!adoptions.is_empty()).then(|| matching as f64 / adoptions.len() as f64);

    let breed_frequency = breed_frequency(pets);

    DatasetMetrics {
        pets: pets.len() as u64,
        users: users.len() as u64,
        adoptions: adoptions.len() as u64,
        density_percent,
        adoptions_per_user: DistributionSummary::from_values(&counts),
        users_without_adoptions: (users.len() - per_user.len()) as u64,
        distinct_breeds: breed_frequency.len() as u64,
        breed_frequency,
        preference_match_rate,
        adoptions_by_pet_type: PetType::ALL
            .into_iter()
            .map(|pet_type| PetTypeCount {
                pet_type,
                count: by_type.get(&pet_type).copied().unwrap_or(0),
            })
            .collect(),
    }
}

fn breed_frequency(pets: &[Pet]) -> Vec<BreedCount> {
    let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
    for pet in pets {
        *counts.entry(pet.breed.as_str()).or_default() += 1;
    }
    let mut breeds: Vec<BreedCount> = counts
        .into_iter()
        .map(|(breed, count)| BreedCount {
            breed: breed.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the name order among equal counts.
    breeds.sort_by(|a, b| b.count.cmp(&a.count));
    breeds
}
