pub mod content_bag;
pub mod content_detector;
pub mod content_type;

pub use content_bag::{ContentBag, ImageSize};
pub use content_detector::classify;
pub use content_type::ContentType;
