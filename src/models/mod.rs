pub mod group;
pub mod item;
pub mod tag;
pub mod version;

pub use group::{Group, GroupChanges, NewGroup};
pub use item::{ClipboardItem, EncryptionData, ItemChanges, NewItem};
pub use tag::{Tag, DEFAULT_TAG_COLOR};
pub use version::Version;
