use std::collections::HashSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use pawmatch_core::{Money, PetId, PetType, UserId};
use pawmatch_generate::entities::breeds;
use pawmatch_generate::{
    GenerationError, PetGenConfig, PetGenerator, UserGenConfig, UserGenerator,
};

#[test]
fn pet_columns_stay_within_configured_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let pets = PetGenerator::new()
        .generate_table(500, &mut rng)
        .expect("generate pets");

    assert_eq!(pets.len(), 500);
    for (idx, pet) in pets.iter().enumerate() {
        assert_eq!(pet.pet_id, PetId(idx as u64 + 1));
        assert!(breeds(pet.pet_type).contains(&pet.breed.as_str()));
        assert!((1..=120).contains(&pet.age_months));
        assert!((0.5..=50.0).contains(&pet.weight_kg));
        assert!(pet.time_in_shelter_days <= 180);
        assert!(pet.adoption_fee >= Money::from_cents(5_000));
        assert!(pet.adoption_fee <= Money::from_cents(50_000));
    }

    let types: HashSet<PetType> = pets.iter().map(|pet| pet.pet_type).collect();
    assert_eq!(types.len(), PetType::ALL.len());
}

#[test]
fn user_columns_stay_within_configured_ranges() {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let users = UserGenerator::new()
        .generate_table(500, &mut rng)
        .expect("generate users");

    assert_eq!(users.len(), 500);
    for (idx, user) in users.iter().enumerate() {
        assert_eq!(user.user_id, UserId(idx as u64 + 1));
        assert!(user.max_adoption_fee >= Money::from_cents(5_000));
        assert!(user.max_adoption_fee <= Money::from_cents(40_000));
    }
    assert!(users.iter().any(|user| user.allergies));
    assert!(users.iter().any(|user| !user.allergies));
}

#[test]
fn tables_are_deterministic_per_seed() {
    let generator = PetGenerator::new();
    let a = generator
        .generate_table(50, &mut ChaCha8Rng::seed_from_u64(9))
        .expect("pets a");
    let b = generator
        .generate_table(50, &mut ChaCha8Rng::seed_from_u64(9))
        .expect("pets b");
    assert_eq!(a, b);

    let generator = UserGenerator::new();
    let a = generator
        .generate_table(50, &mut ChaCha8Rng::seed_from_u64(9))
        .expect("users a");
    let b = generator
        .generate_table(50, &mut ChaCha8Rng::seed_from_u64(9))
        .expect("users b");
    assert_eq!(a, b);
}

#[test]
fn zero_rows_yield_empty_tables() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    assert!(PetGenerator::new().generate_table(0, &mut rng).expect("pets").is_empty());
    assert!(UserGenerator::new().generate_table(0, &mut rng).expect("users").is_empty());
}

#[test]
fn custom_config_narrows_the_distribution() {
    let config = PetGenConfig {
        type_weights: [0.0, 1.0, 0.0, 0.0],
        ..PetGenConfig::default()
    };
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let generator = PetGenerator::with_config(config);
    assert_eq!(generator.config().type_weights, [0.0, 1.0, 0.0, 0.0]);
    let pets = generator
        .generate_table(40, &mut rng)
        .expect("generate pets");
    assert!(pets.iter().all(|pet| pet.pet_type == PetType::Cat));

    let config = UserGenConfig {
        allergy_rate: 1.0,
        ..UserGenConfig::default()
    };
    let generator = UserGenerator::with_config(config);
    assert_eq!(generator.config().allergy_rate, 1.0);
    let users = generator
        .generate_table(40, &mut rng)
        .expect("generate users");
    assert!(users.iter().all(|user| user.allergies));
}

#[test]
fn invalid_configs_are_rejected() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let config = PetGenConfig {
        type_weights: [0.0; 4],
        ..PetGenConfig::default()
    };
    let err = PetGenerator::with_config(config)
        .generate_table(1, &mut rng)
        .expect_err("all-zero weights");
    assert!(matches!(err, GenerationError::InvalidConfig(_)));

    let config = UserGenConfig {
        allergy_rate: 1.5,
        ..UserGenConfig::default()
    };
    let err = UserGenerator::with_config(config)
        .generate_table(1, &mut rng)
        .expect_err("allergy rate out of range");
    assert!(matches!(err, GenerationError::InvalidConfig(_)));
}

#[test]
fn oversized_tables_are_refused_before_allocating() {
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    let err = PetGenerator::new()
        .generate_table(u64::MAX, &mut rng)
        .expect_err("u64::MAX pets");
    assert!(matches!(err, GenerationError::InvalidPlan(_)));

    let err = UserGenerator::new()
        .generate_table(pawmatch_plan::MAX_TABLE_ROWS + 1, &mut rng)
        .expect_err("users above the ceiling");
    assert!(matches!(err, GenerationError::InvalidPlan(_)));
}
