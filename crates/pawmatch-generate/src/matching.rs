//! Constrained random matching of pets to adopters.
//!
//! A run has two phases over one shrinking [`PetPool`]:
//!
//! 1. Cold start: each user, in input order, gets 2–3 affordable pets of the
//!    preferred type when any exist.
//! 2. Fill: users are drawn with replacement and given one affordable pet,
//!    honoring the preferred type with probability `preference_weight`.
//!
//! A pet leaves the pool the moment it is adopted, so no pet is ever adopted
//! twice. The fill phase is bounded: it stops when the target is met, the
//! pool is empty, no user can afford any remaining pet, or too many draws in
//! a row produce nothing.

use std::collections::HashSet;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pawmatch_core::{AdoptionRecord, EntityIndex, Money, Pet, User, validate_adoptions};
use pawmatch_plan::{DEFAULT_MAX_UNPRODUCTIVE_DRAWS, DEFAULT_PREFERENCE_WEIGHT};

use crate::errors::GenerationError;
use crate::pool::PetPool;

/// Tuning for a match run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchOptions {
    /// Probability of honoring the preferred type during fill.
    pub preference_weight: f64,
    /// Consecutive fill draws allowed to emit nothing before stopping.
    pub max_unproductive_draws: u64,
    /// Smallest cold-start quota per user.
    pub cold_start_min: usize,
    /// Largest cold-start quota per user.
    pub cold_start_max: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            preference_weight: DEFAULT_PREFERENCE_WEIGHT,
            max_unproductive_draws: DEFAULT_MAX_UNPRODUCTIVE_DRAWS,
            cold_start_min: 2,
            cold_start_max: 3,
        }
    }
}

/// Why the fill phase ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The (clamped) adoption target was met.
    TargetReached,
    /// Every pet has been adopted.
    PoolExhausted,
    /// No user's budget covers the cheapest remaining pet.
    NoAffordablePets,
    /// Too many consecutive draws emitted nothing.
    DrawLimitReached,
}

impl StopReason {
    /// True when the run ended before its target for a reason other than
    /// running out of pets.
    pub fn is_early(self) -> bool {
        matches!(
            self,
            StopReason::NoAffordablePets | StopReason::DrawLimitReached
        )
    }
}

/// Counters describing how a match run went.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub cold_start_records: u64,
    pub cold_start_users: u64,
    pub fill_records: u64,
    pub preferred_picks: u64,
    pub non_matching_picks: u64,
    pub fallback_picks: u64,
    pub unproductive_draws: u64,
    pub duplicate_pairs_removed: u64,
    pub duplicate_pets_removed: u64,
    pub downsampled: u64,
}

/// Result of a match run.
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    pub records: Vec<AdoptionRecord>,
    /// Requested target after clamping to the pet pool size.
    pub target: usize,
    pub stop_reason: StopReason,
    pub stats: MatchStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PickKind {
    Preferred,
    NonMatching,
    Fallback,
}

/// Assigns pets to users. See the module docs for the algorithm.
#[derive(Debug, Clone, Default)]
pub struct MatchGenerator {
    options: MatchOptions,
}

impl MatchGenerator {
    pub fn new(options: MatchOptions) -> Self {
        Self { options }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        users: &[User],
        pets: &[Pet],
        target_count: usize,
        rng: &mut R,
    ) -> Result<MatchOutcome, GenerationError> {
        self.check_inputs(users, pets)?;
        let index = EntityIndex::new(pets, users)?;

        let target = target_count.min(pets.len());
        let mut pool = PetPool::new(pets);
        let mut records = Vec::with_capacity(target);
        let mut stats = MatchStats::default();

        info!(
            users = users.len(),
            pets = pets.len(),
            requested = target_count,
            target,
            preference_weight = self.options.preference_weight,
            "matching started"
        );

        self.cold_start(users, &mut pool, &mut records, target, rng, &mut stats);
        info!(
            records = stats.cold_start_records,
            users_covered = stats.cold_start_users,
            pets_left = pool.len(),
            "cold start finished"
        );

        let stop_reason = self.fill(users, &mut pool, &mut records, target, rng, &mut stats);
        if stop_reason.is_early() {
            warn!(
                ?stop_reason,
                records = records.len(),
                target,
                unproductive_draws = stats.unproductive_draws,
                "fill stopped before reaching target"
            );
        } else {
            info!(?stop_reason, records = records.len(), "fill finished");
        }

        let records = finalize(records, target, rng, &mut stats);
        validate_adoptions(&index, &records)?;

        Ok(MatchOutcome {
            records,
            target,
            stop_reason,
            stats,
        })
    }

    fn check_inputs(&self, users: &[User], pets: &[Pet]) -> Result<(), GenerationError> {
        if users.is_empty() {
            return Err(GenerationError::InvalidInput(
                "user table is empty".to_string(),
            ));
        }
        if pets.is_empty() {
            return Err(GenerationError::InvalidInput("pet table is empty".to_string()));
        }
        let weight = self.options.preference_weight;
        if !weight.is_finite() || !(0.0..=1.0).contains(&weight) {
            return Err(GenerationError::InvalidInput(format!(
                "preference_weight must be within [0, 1], got {weight}"
            )));
        }
        if self.options.max_unproductive_draws == 0 {
            return Err(GenerationError::InvalidInput(
                "max_unproductive_draws must be greater than zero".to_string(),
            ));
        }
        if self.options.cold_start_min == 0
            || self.options.cold_start_min > self.options.cold_start_max
        {
            return Err(GenerationError::InvalidInput(format!(
                "invalid cold start quota range {}..={}",
                self.options.cold_start_min, self.options.cold_start_max
            )));
        }
        Ok(())
    }

    fn cold_start<R: Rng + ?Sized>(
        &self,
        users: &[User],
        pool: &mut PetPool<'_>,
        records: &mut Vec<AdoptionRecord>,
        target: usize,
        rng: &mut R,
        stats: &mut MatchStats,
    ) {
        for user in users {
            if records.len() >= target || pool.is_empty() {
                break;
            }

            let mut candidates =
                pool.slots_where(|pet| user.prefers(pet) && user.can_afford(pet));
            if candidates.is_empty() {
                debug!(user_id = %user.user_id, "no affordable preferred pet for cold start");
                continue;
            }

            let quota =
                rng.random_range(self.options.cold_start_min..=self.options.cold_start_max);
            let mut granted = 0;
            while granted < quota
                && !candidates.is_empty()
                && records.len() < target
                && !pool.is_empty()
            {
                let slot = candidates.swap_remove(rng.random_range(0..candidates.len()));
                if let Some(pet) = pool.take(slot) {
                    records.push(AdoptionRecord::new(user.user_id, pet.pet_id));
                    granted += 1;
                }
            }

            if granted > 0 {
                stats.cold_start_users += 1;
                stats.cold_start_records += granted as u64;
            }
            debug!(user_id = %user.user_id, quota, granted, "cold start allocation");
        }
    }

    fn fill<R: Rng + ?Sized>(
        &self,
        users: &[User],
        pool: &mut PetPool<'_>,
        records: &mut Vec<AdoptionRecord>,
        target: usize,
        rng: &mut R,
        stats: &mut MatchStats,
    ) -> StopReason {
        let richest = users
            .iter()
            .map(|user| user.max_adoption_fee)
            .max()
            .unwrap_or(Money::ZERO);
        let mut unproductive_streak = 0_u64;

        loop {
            if records.len() >= target {
                return StopReason::TargetReached;
            }
            match pool.cheapest_fee() {
                None => return StopReason::PoolExhausted,
                Some(fee) if fee > richest => return StopReason::NoAffordablePets,
                Some(_) => {}
            }

            let user = &users[rng.random_range(0..users.len())];
            match self.pick(user, pool, rng) {
                Some((slot, kind)) => {
                    if let Some(pet) = pool.take(slot) {
                        records.push(AdoptionRecord::new(user.user_id, pet.pet_id));
                        stats.fill_records += 1;
                        match kind {
                            PickKind::Preferred => stats.preferred_picks += 1,
                            PickKind::NonMatching => stats.non_matching_picks += 1,
                            PickKind::Fallback => stats.fallback_picks += 1,
                        }
                    }
                    unproductive_streak = 0;
                }
                None => {
                    stats.unproductive_draws += 1;
                    unproductive_streak += 1;
                    if unproductive_streak >= self.options.max_unproductive_draws {
                        return StopReason::DrawLimitReached;
                    }
                }
            }
        }
    }

    /// Choose one available pet for `user`, or `None` when nothing is
    /// affordable.
    fn pick<R: Rng + ?Sized>(
        &self,
        user: &User,
        pool: &PetPool<'_>,
        rng: &mut R,
    ) -> Option<(usize, PickKind)> {
        let mut matching = Vec::new();
        let mut non_matching = Vec::new();
        for (slot, pet) in pool.iter() {
            if !user.can_afford(pet) {
                continue;
            }
            if user.prefers(pet) {
                matching.push(slot);
            } else {
                non_matching.push(slot);
            }
        }
        if matching.is_empty() && non_matching.is_empty() {
            return None;
        }

        let honor_preference = rng.random_bool(self.options.preference_weight);
        let (candidates, kind) = if honor_preference && !matching.is_empty() {
            (&matching, PickKind::Preferred)
        } else if !non_matching.is_empty() {
            (&non_matching, PickKind::NonMatching)
        } else {
            (&matching, PickKind::Fallback)
        };

        Some((candidates[rng.random_range(0..candidates.len())], kind))
    }
}

/// Drop repeated pairs, then repeated pets, keeping first occurrences, and
/// down-sample to `target` if still over.
fn finalize<R: Rng + ?Sized>(
    records: Vec<AdoptionRecord>,
    target: usize,
    rng: &mut R,
    stats: &mut MatchStats,
) -> Vec<AdoptionRecord> {
    let before = records.len();
    let mut seen_pairs = HashSet::with_capacity(before);
    let mut records: Vec<AdoptionRecord> = records
        .into_iter()
        .filter(|record| seen_pairs.insert((record.user_id, record.pet_id)))
        .collect();
    stats.duplicate_pairs_removed = (before - records.len()) as u64;

    let before = records.len();
    let mut seen_pets = HashSet::with_capacity(before);
    records.retain(|record| seen_pets.insert(record.pet_id));
    stats.duplicate_pets_removed = (before - records.len()) as u64;

    if stats.duplicate_pairs_removed > 0 || stats.duplicate_pets_removed > 0 {
        warn!(
            pairs = stats.duplicate_pairs_removed,
            pets = stats.duplicate_pets_removed,
            "removed duplicate adoptions"
        );
    }

    if records.len() > target {
        let mut keep = rand::seq::index::sample(rng, records.len(), target).into_vec();
        keep.sort_unstable();
        stats.downsampled = (records.len() - target) as u64;
        records = keep.into_iter().map(|idx| records[idx]).collect();
        warn!(kept = target, dropped = stats.downsampled, "down-sampled adoptions");
    }

    records
}

/// Generate adoptions with default options and the given preference weight.
pub fn generate_adoptions<R: Rng + ?Sized>(
    users: &[User],
    pets: &[Pet],
    target_count: usize,
    preference_weight: f64,
    rng: &mut R,
) -> Result<Vec<AdoptionRecord>, GenerationError> {
    let generator = MatchGenerator::new(MatchOptions {
        preference_weight,
        ..MatchOptions::default()
    });
    Ok(generator.generate(users, pets, target_count, rng)?.records)
}
