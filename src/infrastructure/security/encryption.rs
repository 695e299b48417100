//! At-rest encryption engine: scrypt key derivation + AES-256-GCM.
//!
//! Matches the wire shape of the persisted rows: ciphertext, IV, auth tag
//! and salt are each hex-encoded, the IV and salt are 16 bytes, and both
//! are freshly randomized on every call so identical plaintext never
//! produces identical ciphertext.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Nonce};
use rand::RngCore;
use scrypt::Params;

use crate::error::{AppError, Result};
use crate::models::EncryptionData;

/// AES-256-GCM with the 16-byte IV the row format carries.
type Cipher = AesGcm<Aes256, U16>;

pub const KEY_LENGTH: usize = 32;
pub const IV_LENGTH: usize = 16;
pub const SALT_LENGTH: usize = 16;
pub const AUTH_TAG_LENGTH: usize = 16;

/// Ciphertext plus the three parameters needed to invert it, all hex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedPayload {
    pub content: String,
    pub iv: String,
    pub auth_tag: String,
    pub salt: String,
}

impl EncryptedPayload {
    pub fn encryption_data(&self) -> EncryptionData {
        EncryptionData {
            iv: self.iv.clone(),
            auth_tag: self.auth_tag.clone(),
            salt: self.salt.clone(),
        }
    }

    pub fn from_parts(content: String, data: &EncryptionData) -> Self {
        Self {
            content,
            iv: data.iv.clone(),
            auth_tag: data.auth_tag.clone(),
            salt: data.salt.clone(),
        }
    }
}

/// scrypt parameters matching the historical on-disk data: N=16384, r=8,
/// p=1. Deliberately slow so brute-forcing a passphrase is expensive.
fn kdf_params() -> Params {
    Params::new(14, 8, 1, KEY_LENGTH).expect("static scrypt parameters are valid")
}

/// Derive a 256-bit symmetric key from a passphrase and salt.
/// Deterministic for the same (password, salt) pair.
pub fn derive_key(password: &str, salt: &[u8]) -> Result<[u8; KEY_LENGTH]> {
    let mut key = [0u8; KEY_LENGTH];
    scrypt::scrypt(password.as_bytes(), salt, &kdf_params(), &mut key)
        .map_err(|e| AppError::encryption(format!("key derivation failed: {}", e)))?;
    Ok(key)
}

/// Encrypt a UTF-8 string under a passphrase.
///
/// A fresh random salt and IV are generated on every call; neither is ever
/// reused, so two encryptions of the same input differ in all four fields.
pub fn encrypt(plaintext: &str, password: &str) -> Result<EncryptedPayload> {
    let mut salt = [0u8; SALT_LENGTH];
    let mut iv = [0u8; IV_LENGTH];
    rand::rng().fill_bytes(&mut salt);
    rand::rng().fill_bytes(&mut iv);

    let key = derive_key(password, &salt)?;
    let cipher = Cipher::new_from_slice(&key)
        .map_err(|e| AppError::encryption(format!("invalid key length: {}", e)))?;

    // The aead API appends the 16-byte tag to the ciphertext; the row
    // format stores it separately.
    let sealed = cipher
        .encrypt(Nonce::from_slice(&iv), plaintext.as_bytes())
        .map_err(|_| AppError::encryption("encryption failed"))?;
    let (ciphertext, auth_tag) = sealed.split_at(sealed.len() - AUTH_TAG_LENGTH);

    Ok(EncryptedPayload {
        content: hex::encode(ciphertext),
        iv: hex::encode(iv),
        auth_tag: hex::encode(auth_tag),
        salt: hex::encode(salt),
    })
}

/// Decrypt a payload produced by [`encrypt`].
///
/// Re-derives the key from the carried salt, reconstructs the cipher with
/// the carried IV and verifies the auth tag. A wrong password or a corrupt
/// tag is an explicit error, never silent wrong output; this is the sole
/// mechanism of password verification for decryption itself.
pub fn decrypt(payload: &EncryptedPayload, password: &str) -> Result<String> {
    let salt = hex::decode(&payload.salt)?;
    let iv = hex::decode(&payload.iv)?;
    let auth_tag = hex::decode(&payload.auth_tag)?;
    let ciphertext = hex::decode(&payload.content)?;

    if iv.len() != IV_LENGTH {
        return Err(AppError::encryption("invalid IV length"));
    }
    if auth_tag.len() != AUTH_TAG_LENGTH {
        return Err(AppError::encryption("invalid auth tag length"));
    }

    let key = derive_key(password, &salt)?;
    let cipher = Cipher::new_from_slice(&key)
        .map_err(|e| AppError::encryption(format!("invalid key length: {}", e)))?;

    let mut sealed = ciphertext;
    sealed.extend_from_slice(&auth_tag);

    let plaintext = cipher
        .decrypt(Nonce::from_slice(&iv), sealed.as_ref())
        .map_err(|_| AppError::encryption("decryption failed: wrong password or corrupted data"))?;

    String::from_utf8(plaintext)
        .map_err(|e| AppError::encryption(format!("decrypted data is not UTF-8: {}", e)))
}
