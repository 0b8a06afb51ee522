use pawmatch_core::{
    ActivityLevel, AdoptionRecord, Dataset, EnergyLevel, EntityIndex, Error, HealthCondition,
    LivingSpace, Money, Pet, PetExperience, PetId, PetSize, PetType, User, UserId,
    validate_adoptions, validate_dataset, validate_entity_tables,
};

fn pet(id: u64, pet_type: PetType, fee_cents: u64) -> Pet {
    Pet {
        pet_id: PetId(id),
        pet_type,
        breed: "Mixed".to_string(),
        size: PetSize::Small,
        age_months: 12,
        weight_kg: 4.0,
        time_in_shelter_days: 3,
        adoption_fee: Money::from_cents(fee_cents),
        health_condition: HealthCondition::Healthy,
        energy_level: EnergyLevel::Low,
    }
}

fn user(id: u64, preferred: PetType, budget_cents: u64) -> User {
    User {
        user_id: UserId(id),
        preferred_pet_type: preferred,
        living_space: LivingSpace::House,
        allergies: false,
        activity_level: ActivityLevel::Low,
        past_pet_experience: PetExperience::Some,
        max_adoption_fee: Money::from_cents(budget_cents),
    }
}

fn adoption(user_id: u64, pet_id: u64) -> AdoptionRecord {
    AdoptionRecord::new(UserId(user_id), PetId(pet_id))
}

#[test]
fn duplicate_pet_key_is_reported_before_users() {
    let pets = vec![pet(1, PetType::Dog, 100), pet(1, PetType::Cat, 100)];
    let users = vec![user(5, PetType::Dog, 100), user(5, PetType::Dog, 100)];
    let err = validate_entity_tables(&pets, &users).expect_err("duplicate keys");
    assert_eq!(
        err,
        Error::DuplicateKey {
            table: "PetID",
            id: 1
        }
    );
}

#[test]
fn duplicate_pair_wins_over_pet_reuse() {
    let pets = vec![pet(1, PetType::Dog, 100)];
    let users = vec![user(1, PetType::Dog, 100), user(2, PetType::Dog, 100)];
    let index = EntityIndex::new(&pets, &users).expect("unique keys");

    let err = validate_adoptions(&index, &[adoption(2, 1), adoption(1, 1), adoption(1, 1)])
        .expect_err("duplicate pair");
    assert_eq!(
        err,
        Error::DuplicatePair {
            user_id: UserId(1),
            pet_id: PetId(1)
        }
    );

    let err = validate_adoptions(&index, &[adoption(2, 1), adoption(1, 1)])
        .expect_err("pet adopted twice");
    assert_eq!(err, Error::PetAdoptedTwice(PetId(1)));
}

#[test]
fn unknown_references_are_rejected() {
    let dataset = Dataset {
        pets: vec![pet(1, PetType::Dog, 100)],
        users: vec![user(1, PetType::Dog, 100)],
        adoptions: vec![adoption(9, 1)],
    };
    assert_eq!(
        validate_dataset(&dataset),
        Err(Error::UnknownReference {
            table: "UserID",
            id: 9
        })
    );
}

#[test]
fn fee_above_budget_is_rejected_and_equal_fee_is_allowed() {
    let pets = vec![pet(1, PetType::Dog, 15000), pet(2, PetType::Cat, 15001)];
    let users = vec![user(1, PetType::Dog, 15000)];
    let index = EntityIndex::new(&pets, &users).expect("unique keys");

    assert!(validate_adoptions(&index, &[adoption(1, 1)]).is_ok());
    let err = validate_adoptions(&index, &[adoption(1, 2)]).expect_err("over budget");
    assert!(matches!(err, Error::OverBudget { pet_id: PetId(2), .. }));
}

#[test]
fn empty_adoption_table_is_valid() {
    let dataset = Dataset {
        pets: vec![pet(1, PetType::Bird, 9000)],
        users: vec![user(1, PetType::Bird, 5000), user(2, PetType::Dog, 5000)],
        adoptions: Vec::new(),
    };
    assert!(validate_dataset(&dataset).is_ok());
}

#[test]
fn zero_keys_are_rejected() {
    let users = vec![user(1, PetType::Dog, 100)];
    let err = validate_entity_tables(&[pet(0, PetType::Dog, 100)], &users).expect_err("zero PetID");
    assert_eq!(
        err,
        Error::InvalidValue {
            field: "PetID",
            value: "0".to_string()
        }
    );

    let pets = vec![pet(1, PetType::Dog, 100)];
    let err = validate_entity_tables(&pets, &[user(0, PetType::Dog, 100)]).expect_err("zero UserID");
    assert_eq!(
        err,
        Error::InvalidValue {
            field: "UserID",
            value: "0".to_string()
        }
    );
}
