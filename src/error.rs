//! Unified error type for the clipvault core.
//!
//! Every boundary crossing (store, crypto, clipboard, command surface)
//! returns a typed `AppError` instead of bubbling raw library errors or
//! panicking. Capture-loop internals catch and log these; command/query
//! callers receive them as explicit results.

use std::fmt;

/// Unified application error type, organized by domain.
#[derive(Debug, Clone)]
pub enum AppError {
    /// Clipboard read/write failures (OS clipboard unavailable, bad payload)
    Clipboard(String),

    /// Storage/database errors (SQLite, Diesel, connection pool)
    Storage(String),

    /// Encryption/decryption errors (key derivation, corrupt auth tag)
    Encryption(String),

    /// User-facing authentication failure: supplied password does not match
    /// the stored verification hash. Distinct from `Encryption` so the UI
    /// can prompt again instead of reporting data corruption.
    WrongPassword,

    /// Configuration errors (settings file, data directory)
    Config(String),

    /// Validation errors (invalid input, constraint violations)
    Validation(String),

    /// I/O errors (file read/write, permissions)
    Io(String),

    /// Generic/internal errors that don't fit other categories
    Internal(String),
}

impl AppError {
    pub fn clipboard(msg: impl Into<String>) -> Self {
        Self::Clipboard(msg.into())
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    pub fn encryption(msg: impl Into<String>) -> Self {
        Self::Encryption(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error message as a string slice.
    pub fn message(&self) -> &str {
        match self {
            AppError::Clipboard(msg) => msg,
            AppError::Storage(msg) => msg,
            AppError::Encryption(msg) => msg,
            AppError::WrongPassword => "wrong password",
            AppError::Config(msg) => msg,
            AppError::Validation(msg) => msg,
            AppError::Io(msg) => msg,
            AppError::Internal(msg) => msg,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Clipboard(msg) => write!(f, "Clipboard error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Encryption(msg) => write!(f, "Encryption error: {}", msg),
            AppError::WrongPassword => write!(f, "Wrong password"),
            AppError::Config(msg) => write!(f, "Config error: {}", msg),
            AppError::Validation(msg) => write!(f, "Validation error: {}", msg),
            AppError::Io(msg) => write!(f, "I/O error: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<diesel::result::Error> for AppError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => AppError::storage("record not found in database"),
            diesel::result::Error::DatabaseError(kind, info) => {
                AppError::storage(format!("database error: {:?}: {}", kind, info.message()))
            }
            _ => AppError::storage(format!("database error: {}", err)),
        }
    }
}

impl From<diesel::r2d2::PoolError> for AppError {
    fn from(err: diesel::r2d2::PoolError) -> Self {
        AppError::storage(format!("connection pool error: {}", err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::internal(format!("JSON error: {}", err))
    }
}

impl From<hex::FromHexError> for AppError {
    fn from(err: hex::FromHexError) -> Self {
        AppError::encryption(format!("invalid hex encoding: {}", err))
    }
}

/// Type alias for Result with AppError.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AppError::clipboard("failed to read clipboard");
        assert!(matches!(err, AppError::Clipboard(_)));
        assert_eq!(err.message(), "failed to read clipboard");
    }

    #[test]
    fn test_error_display() {
        let err = AppError::storage("database connection failed");
        let display = format!("{}", err);
        assert!(display.contains("Storage error"));
        assert!(display.contains("database connection failed"));
    }

    #[test]
    fn test_from_diesel_not_found() {
        let diesel_err = diesel::result::Error::NotFound;
        let app_err: AppError = diesel_err.into();
        assert!(matches!(app_err, AppError::Storage(_)));
        assert!(app_err.message().contains("not found"));
    }

    #[test]
    fn test_wrong_password_distinct_from_encryption() {
        let auth = AppError::WrongPassword;
        let crypto = AppError::encryption("auth tag mismatch");
        assert!(matches!(auth, AppError::WrongPassword));
        assert!(matches!(crypto, AppError::Encryption(_)));
    }
}
