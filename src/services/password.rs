//! Password hashing and strength checks
//!
//! Argon2id with secure defaults for storage; a weighted character-class
//! score gates registration so weak passwords are rejected up front.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum strength score (out of 100) accepted at registration
pub const MIN_STRENGTH_SCORE: u32 = 50;

/// Hash a password using Argon2id with secure defaults.
///
/// Returns the hash in PHC string format (algorithm, parameters, salt, hash).
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `true` if the password matches, `false` if it does not, and an
/// error only when the stored hash itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    let argon2 = Argon2::default();

    match argon2.verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e))
            .context("Password verification error"),
    }
}

/// Score a password from 0 to 100.
///
/// Length contributes up to 40 points (8+ chars gets 25, 12+ gets 40); each
/// character class present (lowercase, uppercase, digit, symbol) adds 15.
pub fn strength_score(password: &str) -> u32 {
    let mut score = 0;

    let len = password.chars().count();
    if len >= 12 {
        score += 40;
    } else if len >= MIN_PASSWORD_LENGTH {
        score += 25;
    } else if len >= 6 {
        score += 10;
    }

    if password.chars().any(|c| c.is_ascii_lowercase()) {
        score += 15;
    }
    if password.chars().any(|c| c.is_ascii_uppercase()) {
        score += 15;
    }
    if password.chars().any(|c| c.is_ascii_digit()) {
        score += 15;
    }
    if password.chars().any(|c| !c.is_ascii_alphanumeric()) {
        score += 15;
    }

    score.min(100)
}

/// Check whether a password is acceptable for registration
pub fn is_acceptable(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH && strength_score(password) >= MIN_STRENGTH_SCORE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_produces_argon2id() {
        let hash = hash_password("test_password_123").expect("Failed to hash password");
        assert!(hash.starts_with("$argon2id$"), "Hash should use Argon2id");
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();
        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_correct_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(verify_password("correct_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_wrong_password() {
        let hash = hash_password("correct_password").unwrap();
        assert!(!verify_password("wrong_password", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash_errors() {
        assert!(verify_password("password", "invalid_hash_format").is_err());
    }

    #[test]
    fn test_verify_unicode_password() {
        let hash = hash_password("emoji🔐password").unwrap();
        assert!(verify_password("emoji🔐password", &hash).unwrap());
    }

    #[test]
    fn test_strength_score_ranges() {
        assert!(strength_score("abc") < MIN_STRENGTH_SCORE);
        assert!(strength_score("password") < MIN_STRENGTH_SCORE + 10);
        assert!(strength_score("Passw0rd!") >= MIN_STRENGTH_SCORE);
        assert_eq!(strength_score("Long-Enough-Passw0rd"), 100);
    }

    #[test]
    fn test_is_acceptable() {
        assert!(!is_acceptable("short1!"));
        assert!(!is_acceptable("abcdefgh"));
        assert!(is_acceptable("Passw0rd!"));
        assert!(is_acceptable("Correct Horse 9 Battery"));
    }
}
