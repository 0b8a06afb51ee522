use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pawmatch_core::{
    ActivityLevel, AdoptionRecord, EnergyLevel, HealthCondition, LivingSpace, Money, Pet,
    PetExperience, PetId, PetSize, PetType, User, UserId,
};
use pawmatch_generate::{
    GenerationError, MatchGenerator, MatchOptions, PetGenerator, StopReason, UserGenerator,
    generate_adoptions,
};

fn pet(id: u64, pet_type: PetType, fee: u64) -> Pet {
    Pet {
        pet_id: PetId(id),
        pet_type,
        breed: "Mixed".to_string(),
        size: PetSize::Medium,
        age_months: 24,
        weight_kg: 8.5,
        time_in_shelter_days: 10,
        adoption_fee: Money::from_cents(fee * 100),
        health_condition: HealthCondition::Healthy,
        energy_level: EnergyLevel::Medium,
    }
}

fn user(id: u64, preferred: PetType, budget: u64) -> User {
    User {
        user_id: UserId(id),
        preferred_pet_type: preferred,
        living_space: LivingSpace::Apartment,
        allergies: false,
        activity_level: ActivityLevel::Moderate,
        past_pet_experience: PetExperience::Some,
        max_adoption_fee: Money::from_cents(budget * 100),
    }
}

fn matcher(preference_weight: f64) -> MatchGenerator {
    MatchGenerator::new(MatchOptions {
        preference_weight,
        ..MatchOptions::default()
    })
}

fn assert_invariants(users: &[User], pets: &[Pet], records: &[AdoptionRecord]) {
    let users: HashMap<UserId, &User> = users.iter().map(|u| (u.user_id, u)).collect();
    let pets: HashMap<PetId, &Pet> = pets.iter().map(|p| (p.pet_id, p)).collect();
    let mut seen_pets = HashSet::new();
    let mut seen_pairs = HashSet::new();
    for record in records {
        let user = users.get(&record.user_id).expect("known user");
        let pet = pets.get(&record.pet_id).expect("known pet");
        assert!(pet.adoption_fee <= user.max_adoption_fee, "over budget");
        assert!(seen_pets.insert(record.pet_id), "pet adopted twice");
        assert!(seen_pairs.insert((record.user_id, record.pet_id)), "pair repeated");
    }
}

#[test]
fn single_affordable_pet_is_adopted_once() {
    let pets = vec![pet(1, PetType::Dog, 100)];
    let users = vec![user(1, PetType::Dog, 150)];
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let records = generate_adoptions(&users, &pets, 5, 0.7, &mut rng).expect("generate");

    assert_eq!(records, vec![AdoptionRecord::new(UserId(1), PetId(1))]);
}

#[test]
fn unaffordable_pool_yields_no_adoptions() {
    let pets = vec![
        pet(1, PetType::Dog, 60),
        pet(2, PetType::Cat, 80),
        pet(3, PetType::Bird, 120),
    ];
    let users = vec![user(1, PetType::Dog, 50), user(2, PetType::Cat, 50)];
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    let outcome = matcher(0.7)
        .generate(&users, &pets, 10, &mut rng)
        .expect("generate");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::NoAffordablePets);
    assert_eq!(outcome.target, 3);
    assert_eq!(outcome.stats.unproductive_draws, 0);
}

#[test]
fn full_preference_weight_falls_through_to_non_matching() {
    let pets = vec![
        pet(1, PetType::Dog, 200),
        pet(2, PetType::Cat, 50),
        pet(3, PetType::Cat, 60),
    ];
    let users = vec![user(1, PetType::Dog, 100)];
    let mut rng = ChaCha8Rng::seed_from_u64(3);

    let outcome = matcher(1.0)
        .generate(&users, &pets, 2, &mut rng)
        .expect("generate");

    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    assert_eq!(outcome.stats.cold_start_records, 0);
    assert_eq!(outcome.stats.non_matching_picks, 2);
    let adopted: HashSet<PetId> = outcome.records.iter().map(|r| r.pet_id).collect();
    assert_eq!(adopted, HashSet::from([PetId(2), PetId(3)]));
}

#[test]
fn zero_preference_weight_falls_back_to_matching_when_nothing_else_fits() {
    let pets: Vec<Pet> = (1..=5).map(|id| pet(id, PetType::Dog, 80)).collect();
    let users = vec![user(1, PetType::Dog, 100)];
    let mut rng = ChaCha8Rng::seed_from_u64(11);

    let outcome = matcher(0.0)
        .generate(&users, &pets, 5, &mut rng)
        .expect("generate");

    assert_eq!(outcome.records.len(), 5);
    assert!((2..=3).contains(&outcome.stats.cold_start_records));
    assert_eq!(outcome.stats.preferred_picks, 0);
    assert_eq!(
        outcome.stats.fallback_picks,
        5 - outcome.stats.cold_start_records
    );
}

#[test]
fn full_preference_weight_exhausts_preferred_pets_first() {
    let mut pets: Vec<Pet> = (1..=8).map(|id| pet(id, PetType::Dog, 50)).collect();
    pets.extend((9..=12).map(|id| pet(id, PetType::Cat, 50)));
    let users = vec![user(1, PetType::Dog, 100)];
    let mut rng = ChaCha8Rng::seed_from_u64(17);

    let outcome = matcher(1.0)
        .generate(&users, &pets, 12, &mut rng)
        .expect("generate");

    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    assert_eq!(outcome.records.len(), 12);
    assert_eq!(
        outcome.stats.preferred_picks,
        8 - outcome.stats.cold_start_records
    );
    assert_eq!(outcome.stats.non_matching_picks, 4);
    assert_eq!(outcome.stats.fallback_picks, 0);

    let types: Vec<PetType> = outcome
        .records
        .iter()
        .map(|record| pets[(record.pet_id.0 - 1) as usize].pet_type)
        .collect();
    assert!(types[..8].iter().all(|&pet_type| pet_type == PetType::Dog));
    assert!(types[8..].iter().all(|&pet_type| pet_type == PetType::Cat));
}

#[test]
fn preference_weight_skews_fill_toward_preferred_types() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let pets = PetGenerator::new()
        .generate_table(2_000, &mut rng)
        .expect("generate pets");
    let users = UserGenerator::new()
        .generate_table(100, &mut rng)
        .expect("generate users");

    let match_rate = |weight: f64| {
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let outcome = matcher(weight)
            .generate(&users, &pets, 1_000, &mut rng)
            .expect("generate");
        assert_eq!(outcome.stop_reason, StopReason::TargetReached);
        let stats = outcome.stats;
        assert!(stats.fill_records >= 500, "fill records {}", stats.fill_records);
        (stats.preferred_picks + stats.fallback_picks) as f64 / stats.fill_records as f64
    };

    // Independent draws would match about 30% of the time.
    let skewed = match_rate(0.7);
    assert!(skewed > 0.55, "match rate {skewed}");
    let unskewed = match_rate(0.0);
    assert!(unskewed < 0.2, "match rate {unskewed}");
}

#[test]
fn cold_start_covers_every_user_with_an_affordable_match() {
    let mut pets = Vec::new();
    let mut id = 0;
    for pet_type in PetType::ALL {
        for _ in 0..5 {
            id += 1;
            pets.push(pet(id, pet_type, 70));
        }
    }
    let users: Vec<User> = PetType::ALL
        .into_iter()
        .enumerate()
        .map(|(idx, pet_type)| user(idx as u64 + 1, pet_type, 100))
        .collect();
    let mut rng = ChaCha8Rng::seed_from_u64(5);

    let outcome = matcher(0.7)
        .generate(&users, &pets, 20, &mut rng)
        .expect("generate");

    assert_eq!(outcome.stats.cold_start_users, 4);
    let cold_start = &outcome.records[..outcome.stats.cold_start_records as usize];
    for user in &users {
        let granted: Vec<&AdoptionRecord> = cold_start
            .iter()
            .filter(|record| record.user_id == user.user_id)
            .collect();
        assert!((2..=3).contains(&granted.len()), "user {}", user.user_id);
        for record in granted {
            let adopted = pets.iter().find(|p| p.pet_id == record.pet_id).expect("pet");
            assert_eq!(adopted.pet_type, user.preferred_pet_type);
        }
    }
    assert_eq!(outcome.records.len(), 20);
    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
    assert_invariants(&users, &pets, &outcome.records);
}

#[test]
fn cold_start_stops_at_target() {
    let pets: Vec<Pet> = (1..=9).map(|id| pet(id, PetType::Cat, 50)).collect();
    let users = vec![
        user(1, PetType::Cat, 100),
        user(2, PetType::Cat, 100),
        user(3, PetType::Cat, 100),
    ];
    let mut rng = ChaCha8Rng::seed_from_u64(8);

    let outcome = matcher(0.7)
        .generate(&users, &pets, 2, &mut rng)
        .expect("generate");

    assert_eq!(outcome.records.len(), 2);
    assert!(outcome.records.iter().all(|r| r.user_id == UserId(1)));
    assert_eq!(outcome.stats.cold_start_users, 1);
}

#[test]
fn unproductive_draws_are_bounded() {
    let pets: Vec<Pet> = (1..=10).map(|id| pet(id, PetType::Dog, 500)).collect();
    let mut users = vec![user(1, PetType::Bird, 1000)];
    users.extend((2..=50).map(|id| user(id, PetType::Dog, 10)));
    let mut rng = ChaCha8Rng::seed_from_u64(21);

    let outcome = MatchGenerator::new(MatchOptions {
        max_unproductive_draws: 1,
        ..MatchOptions::default()
    })
    .generate(&users, &pets, 10, &mut rng)
    .expect("generate");

    assert_eq!(outcome.stop_reason, StopReason::DrawLimitReached);
    assert!(outcome.records.len() < 10);
    assert!(outcome.records.iter().all(|r| r.user_id == UserId(1)));
    assert_eq!(outcome.stats.unproductive_draws, 1);
}

#[test]
fn zero_target_returns_nothing() {
    let pets = vec![pet(1, PetType::Dog, 10)];
    let users = vec![user(1, PetType::Dog, 100)];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let outcome = matcher(0.7)
        .generate(&users, &pets, 0, &mut rng)
        .expect("generate");

    assert!(outcome.records.is_empty());
    assert_eq!(outcome.stop_reason, StopReason::TargetReached);
}

#[test]
fn invalid_inputs_are_rejected() {
    let pets = vec![pet(1, PetType::Dog, 10), pet(1, PetType::Cat, 10)];
    let users = vec![user(1, PetType::Dog, 100)];
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = matcher(0.7)
        .generate(&[], &pets, 1, &mut rng)
        .expect_err("empty users");
    assert!(matches!(err, GenerationError::InvalidInput(_)));

    let err = matcher(1.5)
        .generate(&users, &pets[..1], 1, &mut rng)
        .expect_err("weight out of range");
    assert!(matches!(err, GenerationError::InvalidInput(_)));

    let err = matcher(0.7)
        .generate(&users, &pets, 1, &mut rng)
        .expect_err("duplicate pet id");
    assert!(matches!(
        err,
        GenerationError::Structural(pawmatch_core::Error::DuplicateKey { .. })
    ));
}

#[test]
fn sampled_tables_respect_invariants_and_are_deterministic() {
    let mut entity_rng = ChaCha8Rng::seed_from_u64(2024);
    let pets = PetGenerator::new()
        .generate_table(300, &mut entity_rng)
        .expect("pets");
    let users = UserGenerator::new()
        .generate_table(80, &mut entity_rng)
        .expect("users");

    for seed in [1_u64, 7, 42] {
        let mut rng_a = ChaCha8Rng::seed_from_u64(seed);
        let mut rng_b = ChaCha8Rng::seed_from_u64(seed);
        let a = matcher(0.7)
            .generate(&users, &pets, 250, &mut rng_a)
            .expect("run a");
        let b = matcher(0.7)
            .generate(&users, &pets, 250, &mut rng_b)
            .expect("run b");

        assert_eq!(a.records, b.records);
        assert_eq!(a.stats, b.stats);
        assert!(a.records.len() <= 250);
        if a.stop_reason == StopReason::TargetReached {
            assert_eq!(a.records.len(), 250);
        }
        assert_invariants(&users, &pets, &a.records);
    }
}
