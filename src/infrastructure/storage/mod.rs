pub mod db;
pub mod store;

pub use store::{now_iso, ClipboardStore};
