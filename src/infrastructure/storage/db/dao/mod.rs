pub mod group;
pub mod item;
pub mod tag;
pub mod version;
