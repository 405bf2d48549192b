// Password hashing and validation service

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::auth::error::AuthError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Password service for hashing and verification
///
/// Argon2id with a fixed work factor (19 MiB memory, 2 passes, 1 lane).
/// Every hash carries its own random salt in PHC string form.
#[derive(Clone)]
pub struct PasswordService {
    hasher: Argon2<'static>,
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordService {
    pub fn new() -> Self {
        Self {
            hasher: Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::DEFAULT),
        }
    }

    /// Hash a password using Argon2id
    pub fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        self.hasher
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::PasswordHashError(e.to_string()))
    }

    /// Verify a password against a stored hash
    ///
    /// A mismatch is `Ok(false)`; only an unparseable stored hash is an error.
    pub fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let parsed =
            PasswordHash::new(hash).map_err(|e| AuthError::PasswordHashError(e.to_string()))?;

        match self.hasher.verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(AuthError::PasswordHashError(e.to_string())),
        }
    }

    /// Validate password strength requirements
    pub fn validate_password_strength(password: &str) -> Result<(), AuthError> {
        let length = password.chars().count();
        if length < MIN_PASSWORD_LEN {
            return Err(AuthError::InvalidPasswordFormat(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if length > MAX_PASSWORD_LEN {
            return Err(AuthError::InvalidPasswordFormat(format!(
                "Password must be at most {} characters",
                MAX_PASSWORD_LEN
            )));
        }
        if !password.chars().any(|c| c.is_alphabetic()) || !password.chars().any(|c| c.is_ascii_digit()) {
            return Err(AuthError::InvalidPasswordFormat(
                "Password must contain at least one letter and one digit".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let service = PasswordService::new();
        let hash = service.hash_password("sunset-villa-42").unwrap();

        assert!(hash.starts_with("$argon2id$v=19$m=19456,t=2,p=1$"));
        assert!(service.verify_password("sunset-villa-42", &hash).unwrap());
        assert!(!service.verify_password("sunset-villa-43", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let service = PasswordService::new();
        let first = service.hash_password("harbour-view-7").unwrap();
        let second = service.hash_password("harbour-view-7").unwrap();

        assert_ne!(first, second);
        assert!(service.verify_password("harbour-view-7", &second).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let service = PasswordService::new();
        let result = service.verify_password("anything1", "not-a-phc-string");
        assert!(matches!(result, Err(AuthError::PasswordHashError(_))));
    }

    #[test]
    fn test_password_strength() {
        assert!(PasswordService::validate_password_strength("short1").is_err());
        assert!(PasswordService::validate_password_strength("onlyletters").is_err());
        assert!(PasswordService::validate_password_strength("1234567890").is_err());
        assert!(PasswordService::validate_password_strength(&"a1".repeat(65)).is_err());
        assert!(PasswordService::validate_password_strength("garden2bed").is_ok());
    }
}
