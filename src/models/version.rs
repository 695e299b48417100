use serde::{Deserialize, Serialize};

/// Immutable append-only snapshot of an item's content at a point in time.
///
/// Versions are never mutated or merged; restoring one copies its content
/// back onto the live item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub id: String,
    pub item_id: String,
    pub content: String,
    /// sha256 content fingerprint, hex-encoded.
    pub hash: String,
    /// Free-text description of what changed.
    pub changes: Option<String>,
    pub created_at: String,
}
