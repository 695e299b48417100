pub mod capture;
pub mod history_service;
pub mod session;

pub use capture::{CaptureHandle, CaptureLoop};
pub use history_service::{
    EncryptionStatus, HistoryService, DECRYPT_FAILED_PLACEHOLDER, LOCKED_PLACEHOLDER,
};
pub use session::Session;
