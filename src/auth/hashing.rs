//! Password hashing built on Argon2id.

use crate::errors::{Result, WardenError};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;

pub fn password_hasher() -> Argon2<'static> {
    // Tuned for interactive API calls: Argon2id with moderate memory keeps
    // verification fast enough for a login endpoint while retaining
    // side-channel protections.
    const MEMORY_COST_KIB: u32 = 19 * 1024;
    const ITERATIONS: u32 = 2;
    const PARALLELISM: u32 = 1;
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, Some(32))
        .expect("valid Argon2 parameters");
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
}

/// Hash a password with a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    use argon2::password_hash::SaltString;
    use argon2::PasswordHasher;

    let salt = SaltString::generate(&mut OsRng);
    let hash = password_hasher()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| WardenError::internal(format!("Failed to hash password: {}", err)))?;
    Ok(hash.to_string())
}

/// Verify a candidate password against a stored PHC hash string.
///
/// Runs the full Argon2 derivation regardless of where the candidate
/// diverges; never compares plaintext.
pub fn verify_password(candidate: &str, stored: &str) -> Result<bool> {
    use argon2::{PasswordHash, PasswordVerifier};

    let parsed = PasswordHash::new(stored)
        .map_err(|err| WardenError::internal(format!("Invalid password hash: {}", err)))?;
    Ok(password_hasher().verify_password(candidate.as_bytes(), &parsed).is_ok())
}
