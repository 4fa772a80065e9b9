use argon2::{
    Argon2,
    password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng},
};

use crate::domain::repository::PasswordHasher;
use crate::error::MoviesServiceError;

/// Argon2id with the crate's default parameters and a random salt per hash.
/// Produces a PHC string (`$argon2id$v=19$...`).
#[derive(Clone, Default)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> Result<String, MoviesServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!("hash password: {e}"))?;
        Ok(hash.to_string())
    }
}
