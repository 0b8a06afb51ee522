use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Animal category shared by `Pet.PetType` and `User.PreferredPetType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PetType {
    Dog,
    Cat,
    Rabbit,
    Bird,
}

impl PetType {
    pub const ALL: [PetType; 4] = [PetType::Dog, PetType::Cat, PetType::Rabbit, PetType::Bird];

    pub fn as_str(self) -> &'static str {
        match self {
            PetType::Dog => "Dog",
            PetType::Cat => "Cat",
            PetType::Rabbit => "Rabbit",
            PetType::Bird => "Bird",
        }
    }
}

impl fmt::Display for PetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetType {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PetType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(value.trim()))
            .ok_or_else(|| Error::InvalidValue {
                field: "PetType",
                value: value.to_string(),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetSize {
    Small,
    Medium,
    Large,
}

impl PetSize {
    pub const ALL: [PetSize; 3] = [PetSize::Small, PetSize::Medium, PetSize::Large];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthCondition {
    Healthy,
    #[serde(rename = "Minor Issues")]
    MinorIssues,
    #[serde(rename = "Special Needs")]
    SpecialNeeds,
}

impl HealthCondition {
    pub const ALL: [HealthCondition; 3] = [
        HealthCondition::Healthy,
        HealthCondition::MinorIssues,
        HealthCondition::SpecialNeeds,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnergyLevel {
    Low,
    Medium,
    High,
}

impl EnergyLevel {
    pub const ALL: [EnergyLevel; 3] = [EnergyLevel::Low, EnergyLevel::Medium, EnergyLevel::High];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LivingSpace {
    Apartment,
    House,
    #[serde(rename = "Small Space")]
    SmallSpace,
}

impl LivingSpace {
    pub const ALL: [LivingSpace; 3] = [
        LivingSpace::Apartment,
        LivingSpace::House,
        LivingSpace::SmallSpace,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityLevel {
    Low,
    Moderate,
    High,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 3] = [
        ActivityLevel::Low,
        ActivityLevel::Moderate,
        ActivityLevel::High,
    ];
}

/// Prior pet ownership; persisted as `None`, `Some` or `Experienced`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PetExperience {
    #[serde(rename = "None")]
    Inexperienced,
    Some,
    Experienced,
}

impl PetExperience {
    pub const ALL: [PetExperience; 3] = [
        PetExperience::Inexperienced,
        PetExperience::Some,
        PetExperience::Experienced,
    ];
}

/// Non-negative currency amount held in whole cents.
///
/// Persisted as a decimal with two fractional digits (`120.50`). Comparisons
/// are exact, so the budget constraint never depends on float rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Round a float amount to the nearest cent. Rejects negative and
    /// non-finite values.
    pub fn from_f64(amount: f64) -> Option<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return None;
        }
        let cents = (amount * 100.0).round();
        if cents >= u64::MAX as f64 {
            return None;
        }
        Some(Self(cents as u64))
    }

    pub fn as_f64(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl FromStr for Money {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidValue {
            field: "Money",
            value: value.to_string(),
        };
        let trimmed = value.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            // Extra precision is rounded the same way float inputs are.
            let amount: f64 = trimmed.parse().map_err(|_| invalid())?;
            return Money::from_f64(amount).ok_or_else(invalid);
        }

        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let fraction_cents = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<u64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse::<u64>().map_err(|_| invalid())?,
        };
        whole
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(fraction_cents))
            .map(Money)
            .ok_or_else(invalid)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

struct MoneyVisitor;

impl Visitor<'_> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-negative amount with at most two decimals")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Money, E> {
        value.parse().map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Money, E> {
        value
            .checked_mul(100)
            .map(Money)
            .ok_or_else(|| E::custom(format!("amount out of range: {value}")))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Money, E> {
        let value = u64::try_from(value)
            .map_err(|_| E::custom(format!("negative amount: {value}")))?;
        self.visit_u64(value)
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Money, E> {
        Money::from_f64(value).ok_or_else(|| E::custom(format!("invalid amount: {value}")))
    }
}
