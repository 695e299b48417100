pub mod encryption;
pub mod password;

pub use encryption::{decrypt, derive_key, encrypt, EncryptedPayload};
pub use password::{generate_salt, verification_hash, verify_password};
