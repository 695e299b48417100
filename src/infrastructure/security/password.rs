//! Verification-hash handling for UI-level "is this the right password"
//! prompts. Computed with the same scrypt family as the encryption key but
//! stored separately in settings and never used for actual decryption.

use rand::RngCore;
use scrypt::Params;
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};

const VERIFICATION_HASH_LENGTH: usize = 64;
const SALT_LENGTH: usize = 16;

/// Generate a fresh random salt, hex-encoded, for a new verification hash.
pub fn generate_salt() -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::rng().fill_bytes(&mut salt);
    hex::encode(salt)
}

/// Compute the verification hash for (password, hex salt), hex-encoded.
/// Deterministic, so recomputing with the stored salt checks a passphrase
/// without performing a full decrypt.
pub fn verification_hash(password: &str, salt_hex: &str) -> Result<String> {
    let salt = hex::decode(salt_hex)?;
    let params = Params::new(14, 8, 1, VERIFICATION_HASH_LENGTH)
        .expect("static scrypt parameters are valid");
    let mut hash = [0u8; VERIFICATION_HASH_LENGTH];
    scrypt::scrypt(password.as_bytes(), &salt, &params, &mut hash)
        .map_err(|e| AppError::encryption(format!("hash computation failed: {}", e)))?;
    Ok(hex::encode(hash))
}

/// Constant-time comparison of a candidate password against the stored
/// hash/salt pair.
pub fn verify_password(password: &str, salt_hex: &str, expected_hash_hex: &str) -> Result<bool> {
    let computed = verification_hash(password, salt_hex)?;
    Ok(computed.as_bytes().ct_eq(expected_hash_hex.as_bytes()).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_salt_unique() {
        let a = generate_salt();
        let b = generate_salt();
        assert!(!a.is_empty());
        assert_ne!(a, b);
        assert_eq!(hex::decode(&a).unwrap().len(), SALT_LENGTH);
    }

    #[test]
    fn test_hash_deterministic_per_salt() {
        let salt = generate_salt();
        let a = verification_hash("Secr3t!", &salt).unwrap();
        let b = verification_hash("Secr3t!", &salt).unwrap();
        assert_eq!(a, b);
        assert_eq!(hex::decode(&a).unwrap().len(), VERIFICATION_HASH_LENGTH);
    }

    #[test]
    fn test_verify_password() {
        let salt = generate_salt();
        let hash = verification_hash("Secr3t!", &salt).unwrap();
        assert!(verify_password("Secr3t!", &salt, &hash).unwrap());
        assert!(!verify_password("wrong", &salt, &hash).unwrap());
    }
}
