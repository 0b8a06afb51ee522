use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::{
    ActivityLevel, EnergyLevel, HealthCondition, LivingSpace, Money, PetExperience, PetSize,
    PetType,
};

/// Primary key of a pet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PetId(pub u64);

/// Primary key of a user row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A shelter animal available for adoption.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pet {
    #[serde(rename = "PetID")]
    pub pet_id: PetId,
    pub pet_type: PetType,
    pub breed: String,
    pub size: PetSize,
    pub age_months: u32,
    pub weight_kg: f64,
    pub time_in_shelter_days: u32,
    pub adoption_fee: Money,
    pub health_condition: HealthCondition,
    pub energy_level: EnergyLevel,
}

/// A prospective adopter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    pub preferred_pet_type: PetType,
    pub living_space: LivingSpace,
    #[serde(with = "bool_as_int")]
    pub allergies: bool,
    pub activity_level: ActivityLevel,
    pub past_pet_experience: PetExperience,
    pub max_adoption_fee: Money,
}

impl Pet {
    /// Persisted column order.
    pub const COLUMNS: [&'static str; 10] = [
        "PetID",
        "PetType",
        "Breed",
        "Size",
        "AgeMonths",
        "WeightKg",
        "TimeInShelterDays",
        "AdoptionFee",
        "HealthCondition",
        "EnergyLevel",
    ];
}

impl User {
    /// Persisted column order.
    pub const COLUMNS: [&'static str; 7] = [
        "UserID",
        "PreferredPetType",
        "LivingSpace",
        "Allergies",
        "ActivityLevel",
        "PastPetExperience",
        "MaxAdoptionFee",
    ];

    /// Whether the user's budget covers the given pet.
    pub fn can_afford(&self, pet: &Pet) -> bool {
        pet.adoption_fee <= self.max_adoption_fee
    }

    /// Whether the pet matches the user's declared type preference.
    pub fn prefers(&self, pet: &Pet) -> bool {
        pet.pet_type == self.preferred_pet_type
    }
}

/// One adoption event linking a user to a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AdoptionRecord {
    #[serde(rename = "UserID")]
    pub user_id: UserId,
    #[serde(rename = "PetID")]
    pub pet_id: PetId,
}

impl AdoptionRecord {
    /// Persisted column order.
    pub const COLUMNS: [&'static str; 2] = ["UserID", "PetID"];

    pub fn new(user_id: UserId, pet_id: PetId) -> Self {
        Self { user_id, pet_id }
    }
}

/// The three tables produced by a generation run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub pets: Vec<Pet>,
    pub users: Vec<User>,
    pub adoptions: Vec<AdoptionRecord>,
}

/// Persists booleans as `0`/`1`.
mod bool_as_int {
    use serde::de::{self, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }

    struct FlagVisitor;

    impl Visitor<'_> for FlagVisitor {
        type Value = bool;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("0, 1, true or false")
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<bool, E> {
            Ok(value)
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::custom(format!("invalid flag: {other}"))),
            }
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<bool, E> {
            match value {
                0 => Ok(false),
                1 => Ok(true),
                other => Err(E::custom(format!("invalid flag: {other}"))),
            }
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<bool, E> {
            match value.trim() {
                "0" | "false" | "False" => Ok(false),
                "1" | "true" | "True" => Ok(true),
                other => Err(E::custom(format!("invalid flag: {other}"))),
            }
        }
    }
}
