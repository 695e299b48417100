use serde::{Deserialize, Serialize};

/// A display tag, independent of any item until associated through the
/// `item_tags` relation. Names are globally unique.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

pub const DEFAULT_TAG_COLOR: &str = "cyan";
