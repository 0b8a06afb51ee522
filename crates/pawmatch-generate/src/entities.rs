//! Pet and user table sampling.
//!
//! Every column is drawn independently from a fixed categorical or clipped
//! numeric distribution; only `Breed` depends on another column (`PetType`).

use rand::Rng;
use rand::distr::weighted::WeightedIndex;
use rand::seq::IndexedRandom;
use rand_distr::{Distribution, Exp, Normal};
use serde::{Deserialize, Serialize};

use pawmatch_core::{
    ActivityLevel, EnergyLevel, HealthCondition, LivingSpace, Money, Pet, PetExperience, PetId,
    PetSize, PetType, User, UserId,
};

use pawmatch_plan::MAX_TABLE_ROWS;

use crate::errors::GenerationError;

const DOG_BREEDS: &[&str] = &[
    "Labrador",
    "Poodle",
    "Bulldog",
    "Beagle",
    "German Shepherd",
    "Golden Retriever",
    "Rottweiler",
    "Dachshund",
    "Boxer",
    "Siberian Husky",
];
const CAT_BREEDS: &[&str] = &[
    "Persian",
    "Maine Coon",
    "Siamese",
    "Tabby",
    "Sphynx",
    "Bengal",
    "Ragdoll",
    "Abyssinian",
    "British Shorthair",
    "Scottish Fold",
];
const RABBIT_BREEDS: &[&str] = &[
    "Holland Lop",
    "Netherland Dwarf",
    "Flemish Giant",
    "Lionhead",
    "Mini Rex",
    "Angora",
    "English Lop",
    "Dutch",
    "Havana",
];
const BIRD_BREEDS: &[&str] = &[
    "Parakeet",
    "Cockatiel",
    "Canary",
    "Lovebird",
    "African Grey",
    "Macaw",
    "Conure",
    "Finch",
    "Quaker Parrot",
];

/// Breed catalogue for a pet type.
pub fn breeds(pet_type: PetType) -> &'static [&'static str] {
    match pet_type {
        PetType::Dog => DOG_BREEDS,
        PetType::Cat => CAT_BREEDS,
        PetType::Rabbit => RABBIT_BREEDS,
        PetType::Bird => BIRD_BREEDS,
    }
}

/// Normal distribution clipped to `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClippedNormal {
    pub mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
}

impl ClippedNormal {
    pub const fn new(mean: f64, std_dev: f64, min: f64, max: f64) -> Self {
        Self {
            mean,
            std_dev,
            min,
            max,
        }
    }

    fn sampler(&self, column: &str) -> Result<ClippedSampler, GenerationError> {
        if !(self.min <= self.max) {
            return Err(GenerationError::InvalidConfig(format!(
                "{column}: min {} exceeds max {}",
                self.min, self.max
            )));
        }
        let normal = Normal::new(self.mean, self.std_dev)
            .map_err(|err| GenerationError::InvalidConfig(format!("{column}: {err}")))?;
        Ok(ClippedSampler {
            normal,
            min: self.min,
            max: self.max,
        })
    }
}

struct ClippedSampler {
    normal: Normal<f64>,
    min: f64,
    max: f64,
}

impl ClippedSampler {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.normal.sample(rng).clamp(self.min, self.max)
    }
}

/// Weighted choice over a fixed set of values.
struct Categorical<T: Copy> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> Categorical<T> {
    fn new(column: &str, values: &[T], weights: &[f64]) -> Result<Self, GenerationError> {
        if values.len() != weights.len() {
            return Err(GenerationError::InvalidConfig(format!(
                "{column}: {} weights for {} values",
                weights.len(),
                values.len()
            )));
        }
        let index = WeightedIndex::new(weights.iter().copied())
            .map_err(|err| GenerationError::InvalidConfig(format!("{column}: {err}")))?;
        Ok(Self {
            values: values.to_vec(),
            index,
        })
    }

    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }
}

/// Distributions for the pet table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetGenConfig {
    /// Weights over Dog, Cat, Rabbit, Bird.
    pub type_weights: [f64; 4],
    /// Weights over Small, Medium, Large.
    pub size_weights: [f64; 3],
    pub age_months: ClippedNormal,
    pub weight_kg: ClippedNormal,
    /// Mean of the exponential time-in-shelter distribution.
    pub shelter_days_mean: f64,
    pub shelter_days_max: f64,
    pub adoption_fee: ClippedNormal,
    /// Weights over Healthy, Minor Issues, Special Needs.
    pub health_weights: [f64; 3],
    /// Weights over Low, Medium, High.
    pub energy_weights: [f64; 3],
}

impl Default for PetGenConfig {
    fn default() -> Self {
        Self {
            type_weights: [0.4, 0.3, 0.2, 0.1],
            size_weights: [0.3, 0.4, 0.3],
            age_months: ClippedNormal::new(36.0, 24.0, 1.0, 120.0),
            weight_kg: ClippedNormal::new(12.0, 6.0, 0.5, 50.0),
            shelter_days_mean: 30.0,
            shelter_days_max: 180.0,
            adoption_fee: ClippedNormal::new(120.0, 50.0, 50.0, 500.0),
            health_weights: [0.7, 0.2, 0.1],
            energy_weights: [0.3, 0.4, 0.3],
        }
    }
}

/// Generates the pet table.
#[derive(Debug, Clone, Default)]
pub struct PetGenerator {
    config: PetGenConfig,
}

impl PetGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PetGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PetGenConfig {
        &self.config
    }

    /// Sample `rows` pets with ids `1..=rows`.
    pub fn generate_table<R: Rng + ?Sized>(
        &self,
        rows: u64,
        rng: &mut R,
    ) -> Result<Vec<Pet>, GenerationError> {
        let config = &self.config;
        let pet_type = Categorical::new("PetType", &PetType::ALL, &config.type_weights)?;
        let size = Categorical::new("Size", &PetSize::ALL, &config.size_weights)?;
        let health = Categorical::new(
            "HealthCondition",
            &HealthCondition::ALL,
            &config.health_weights,
        )?;
        let energy = Categorical::new("EnergyLevel", &EnergyLevel::ALL, &config.energy_weights)?;
        let age = config.age_months.sampler("AgeMonths")?;
        let weight = config.weight_kg.sampler("WeightKg")?;
        let fee = config.adoption_fee.sampler("AdoptionFee")?;
        if config.adoption_fee.min < 0.0 {
            return Err(GenerationError::InvalidConfig(
                "AdoptionFee: min must be non-negative".to_string(),
            ));
        }
        let shelter = Exp::new(1.0 / config.shelter_days_mean)
            .map_err(|err| GenerationError::InvalidConfig(format!("TimeInShelterDays: {err}")))?;

        let mut pets = table_buffer(rows)?;
        for id in 1..=rows {
            let pet_type = pet_type.sample(rng);
            let breed = breeds(pet_type)
                .choose(rng)
                .copied()
                .unwrap_or(pet_type.as_str());
            let adoption_fee = Money::from_f64(fee.sample(rng)).ok_or_else(|| {
                GenerationError::InvalidConfig("AdoptionFee: sampled invalid amount".to_string())
            })?;

            pets.push(Pet {
                pet_id: PetId(id),
                pet_type,
                breed: breed.to_string(),
                size: size.sample(rng),
                age_months: age.sample(rng) as u32,
                weight_kg: round_cents(weight.sample(rng)),
                time_in_shelter_days: shelter
                    .sample(rng)
                    .clamp(0.0, config.shelter_days_max) as u32,
                adoption_fee,
                health_condition: health.sample(rng),
                energy_level: energy.sample(rng),
            });
        }

        Ok(pets)
    }
}

/// Distributions for the user table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserGenConfig {
    /// Weights over Dog, Cat, Rabbit, Bird.
    pub preference_weights: [f64; 4],
    /// Weights over Apartment, House, Small Space.
    pub living_space_weights: [f64; 3],
    /// Probability that a user has allergies.
    pub allergy_rate: f64,
    /// Weights over Low, Moderate, High.
    pub activity_weights: [f64; 3],
    /// Weights over None, Some, Experienced.
    pub experience_weights: [f64; 3],
    pub max_adoption_fee: ClippedNormal,
}

impl Default for UserGenConfig {
    fn default() -> Self {
        Self {
            preference_weights: [0.4, 0.3, 0.2, 0.1],
            living_space_weights: [0.4, 0.4, 0.2],
            allergy_rate: 0.2,
            activity_weights: [0.3, 0.4, 0.3],
            experience_weights: [0.3, 0.4, 0.3],
            max_adoption_fee: ClippedNormal::new(200.0, 75.0, 50.0, 400.0),
        }
    }
}

/// Generates the user table.
#[derive(Debug, Clone, Default)]
pub struct UserGenerator {
    config: UserGenConfig,
}

impl UserGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: UserGenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &UserGenConfig {
        &self.config
    }

    /// Sample `rows` users with ids `1..=rows`.
    pub fn generate_table<R: Rng + ?Sized>(
        &self,
        rows: u64,
        rng: &mut R,
    ) -> Result<Vec<User>, GenerationError> {
        let config = &self.config;
        let preference = Categorical::new(
            "PreferredPetType",
            &PetType::ALL,
            &config.preference_weights,
        )?;
        let living_space = Categorical::new(
            "LivingSpace",
            &LivingSpace::ALL,
            &config.living_space_weights,
        )?;
        let activity = Categorical::new(
            "ActivityLevel",
            &ActivityLevel::ALL,
            &config.activity_weights,
        )?;
        let experience = Categorical::new(
            "PastPetExperience",
            &PetExperience::ALL,
            &config.experience_weights,
        )?;
        if !(0.0..=1.0).contains(&config.allergy_rate) {
            return Err(GenerationError::InvalidConfig(format!(
                "Allergies: rate {} outside [0, 1]",
                config.allergy_rate
            )));
        }
        if config.max_adoption_fee.min < 0.0 {
            return Err(GenerationError::InvalidConfig(
                "MaxAdoptionFee: min must be non-negative".to_string(),
            ));
        }
        let budget = config.max_adoption_fee.sampler("MaxAdoptionFee")?;

        let mut users = table_buffer(rows)?;
        for id in 1..=rows {
            let max_adoption_fee = Money::from_f64(budget.sample(rng)).ok_or_else(|| {
                GenerationError::InvalidConfig(
                    "MaxAdoptionFee: sampled invalid amount".to_string(),
                )
            })?;
            users.push(User {
                user_id: UserId(id),
                preferred_pet_type: preference.sample(rng),
                living_space: living_space.sample(rng),
                allergies: rng.random_bool(config.allergy_rate),
                activity_level: activity.sample(rng),
                past_pet_experience: experience.sample(rng),
                max_adoption_fee,
            });
        }

        Ok(users)
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Row buffer for `rows` entries. Sizes above [`MAX_TABLE_ROWS`] are a plan error.
fn table_buffer<T>(rows: u64) -> Result<Vec<T>, GenerationError> {
    if rows > MAX_TABLE_ROWS {
        return Err(GenerationError::InvalidPlan(format!(
            "{rows} rows exceeds the limit of {MAX_TABLE_ROWS}"
        )));
    }
    let capacity = usize::try_from(rows)
        .map_err(|_| GenerationError::InvalidPlan(format!("{rows} rows do not fit in memory")))?;
    let mut buffer = Vec::new();
    buffer
        .try_reserve_exact(capacity)
        .map_err(|err| GenerationError::InvalidPlan(format!("{rows} rows: {err}")))?;
    Ok(buffer)
}
