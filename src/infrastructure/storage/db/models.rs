//! Diesel row structs and their mapping to the domain models. JSON-bearing
//! columns (`formats`, `full_content`, `tags`, `metadata`) are decoded
//! leniently: a malformed cell degrades to empty/absent instead of failing
//! the whole listing.

use diesel::prelude::*;

use crate::core::{ContentBag, ContentType};
use crate::models::{ClipboardItem, EncryptionData, Group, Tag, Version};

use super::schema::{clipboard_history, groups, item_tags, tags, versions};

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = clipboard_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbClipboardItem {
    pub id: String,
    pub content: String,
    pub item_type: String,
    pub title: Option<String>,
    pub timestamp: String,
    pub size: i64,
    pub formats: Option<String>,
    pub full_content: Option<String>,
    pub is_favorite: bool,
    pub tags: Option<String>,
    pub is_encrypted: bool,
    pub iv: Option<String>,
    pub auth_tag: Option<String>,
    pub salt: Option<String>,
    pub group_id: Option<String>,
    pub metadata: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl DbClipboardItem {
    pub fn into_domain(self) -> ClipboardItem {
        let encryption_data = if self.is_encrypted {
            match (self.iv, self.auth_tag, self.salt) {
                (Some(iv), Some(auth_tag), Some(salt)) => {
                    Some(EncryptionData { iv, auth_tag, salt })
                }
                _ => None,
            }
        } else {
            None
        };

        ClipboardItem {
            id: self.id,
            content: self.content,
            item_type: ContentType::parse_lossy(&self.item_type),
            title: self.title,
            timestamp: self.timestamp,
            size: self.size,
            formats: decode_json_or_default(self.formats.as_deref()),
            full_content: self
                .full_content
                .as_deref()
                .and_then(|s| serde_json::from_str::<ContentBag>(s).ok()),
            is_encrypted: self.is_encrypted,
            encryption_data,
            is_favorite: self.is_favorite,
            group_id: self.group_id,
            tags: decode_json_or_default(self.tags.as_deref()),
            metadata: self
                .metadata
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok()),
        }
    }
}

fn decode_json_or_default<T: Default + serde::de::DeserializeOwned>(raw: Option<&str>) -> T {
    raw.and_then(|s| serde_json::from_str(s).ok()).unwrap_or_default()
}

/// Sparse changeset for item updates. `None` skips a column; the
/// double-`Option` on `group_id` writes NULL for `Some(None)`.
/// `updated_at` is always supplied so every update bumps it.
#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = clipboard_history)]
pub struct DbItemChanges {
    pub content: Option<String>,
    pub item_type: Option<String>,
    pub title: Option<String>,
    pub formats: Option<String>,
    pub full_content: Option<String>,
    pub tags: Option<String>,
    pub is_favorite: Option<bool>,
    pub group_id: Option<Option<String>>,
    pub metadata: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = groups)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbGroup {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
    pub created_at: String,
}

impl DbGroup {
    pub fn into_domain(self) -> Group {
        Group {
            id: self.id,
            name: self.name,
            parent_id: self.parent_id,
            icon: self.icon,
            color: self.color,
            sort_order: self.sort_order,
            created_at: self.created_at,
        }
    }
}

#[derive(AsChangeset, Debug, Default)]
#[diesel(table_name = groups)]
pub struct DbGroupChanges {
    pub name: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbTag {
    pub id: String,
    pub name: String,
    pub color: String,
    pub created_at: String,
}

impl DbTag {
    pub fn into_domain(self) -> Tag {
        Tag {
            id: self.id,
            name: self.name,
            color: self.color,
            created_at: self.created_at,
        }
    }
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = item_tags)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbItemTag {
    pub item_id: String,
    pub tag_id: String,
    pub created_at: String,
}

#[derive(Queryable, Selectable, Insertable, Debug)]
#[diesel(table_name = versions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DbVersion {
    pub id: String,
    pub item_id: String,
    pub content: String,
    pub hash: String,
    pub changes: Option<String>,
    pub created_at: String,
}

impl DbVersion {
    pub fn into_domain(self) -> Version {
        Version {
            id: self.id,
            item_id: self.item_id,
            content: self.content,
            hash: self.hash,
            changes: self.changes,
            created_at: self.created_at,
        }
    }
}
