pub mod application;
pub mod config;
pub mod core;
pub mod error;
pub mod infrastructure;
pub mod models;

pub use application::{CaptureHandle, CaptureLoop, HistoryService, Session};
pub use error::{AppError, Result};
pub use infrastructure::storage::ClipboardStore;
