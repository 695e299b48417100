use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{ContentBag, ContentType};

/// Parameters needed to invert an at-rest encryption, all hex-encoded.
///
/// Present iff the owning item's `content` column holds ciphertext. The
/// three fields travel together: an item is either fully encrypted (all of
/// iv/auth_tag/salt set) or fully plaintext (none of them).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionData {
    pub iv: String,
    pub auth_tag: String,
    pub salt: String,
}

/// One captured clipboard snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipboardItem {
    pub id: String,
    /// Primary textual representation; ciphertext (hex) when encrypted.
    pub content: String,
    #[serde(rename = "type")]
    pub item_type: ContentType,
    pub title: Option<String>,
    /// Capture time, ISO-8601. Primary ordering key, descending.
    pub timestamp: String,
    /// Length of the serialized capture, pre-encryption.
    pub size: i64,
    pub formats: Vec<String>,
    /// Richer multi-format payload. Dropped entirely when encryption is
    /// active at capture time: confidentiality over richness.
    pub full_content: Option<ContentBag>,
    pub is_encrypted: bool,
    pub encryption_data: Option<EncryptionData>,
    pub is_favorite: bool,
    pub group_id: Option<String>,
    /// Denormalized read cache; the `item_tags` relation is authoritative.
    pub tags: Vec<String>,
    pub metadata: Option<Value>,
}

impl ClipboardItem {
    /// The encryption-state invariant: ciphertext rows carry the full
    /// parameter bundle, plaintext rows carry none of it.
    pub fn encryption_state_consistent(&self) -> bool {
        self.is_encrypted == self.encryption_data.is_some()
    }
}

/// Fields for a new history row; the store allocates the id.
#[derive(Debug, Clone, Default)]
pub struct NewItem {
    pub content: String,
    pub item_type: ContentType,
    pub title: Option<String>,
    pub timestamp: String,
    pub size: i64,
    pub formats: Vec<String>,
    pub full_content: Option<ContentBag>,
    pub is_encrypted: bool,
    pub encryption_data: Option<EncryptionData>,
    pub group_id: Option<String>,
    pub tags: Vec<String>,
    pub metadata: Option<Value>,
}

/// Sparse update for an existing item. `None` fields are left untouched;
/// `group_id` distinguishes "leave alone" (`None`) from "clear" legacy
/// (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct ItemChanges {
    pub content: Option<String>,
    pub item_type: Option<ContentType>,
    pub title: Option<String>,
    pub formats: Option<Vec<String>>,
    pub full_content: Option<ContentBag>,
    pub tags: Option<Vec<String>>,
    pub is_favorite: Option<bool>,
    pub group_id: Option<Option<String>>,
    pub metadata: Option<Value>,
}

impl ItemChanges {
    /// True when no field is supplied; such an update is a no-op that
    /// reports `false` without touching the database.
    pub fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.item_type.is_none()
            && self.title.is_none()
            && self.formats.is_none()
            && self.full_content.is_none()
            && self.tags.is_none()
            && self.is_favorite.is_none()
            && self.group_id.is_none()
            && self.metadata.is_none()
    }
}
