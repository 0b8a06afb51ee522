//! Seed derivation for independent random streams.

/// Derive a stream seed from the plan seed and a stream label.
///
/// Each table gets its own stream so that, for example, changing the user
/// count never perturbs the pet table.
pub fn hash_seed(seed: u64, key: &str) -> u64 {
    let mut hash = seed ^ 0xcbf29ce484222325;
    for byte in key.as_bytes() {
        hash ^= *byte as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

pub const PETS_STREAM: &str = "pets";
pub const USERS_STREAM: &str = "users";
pub const ADOPTIONS_STREAM: &str = "adoptions";
