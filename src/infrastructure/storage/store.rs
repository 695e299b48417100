//! `ClipboardStore`: owner of the connection pool, the schema and all typed
//! CRUD. Schema setup is additive and idempotent so it can run on every
//! process start regardless of which prior version created the file.

use chrono::{SecondsFormat, Utc};
use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sqlite::SqliteConnection;
use log::{debug, info};
use uuid::Uuid;

use crate::core::ContentType;
use crate::error::{AppError, Result};
use crate::models::{
    ClipboardItem, Group, GroupChanges, ItemChanges, NewGroup, NewItem, Tag, Version,
    DEFAULT_TAG_COLOR,
};

use super::db::dao::{group, item, tag, version};
use super::db::models::{
    DbClipboardItem, DbGroup, DbGroupChanges, DbItemChanges, DbItemTag, DbTag, DbVersion,
};
use super::db::pool::{init_db_pool, DbPool};

const CREATE_TABLES_SQL: &str = "
CREATE TABLE IF NOT EXISTS clipboard_history (
    id TEXT PRIMARY KEY,
    content TEXT NOT NULL,
    type TEXT NOT NULL,
    title TEXT,
    timestamp TEXT NOT NULL,
    size INTEGER NOT NULL,
    formats TEXT,
    full_content TEXT,
    is_favorite BOOLEAN NOT NULL DEFAULT 0,
    tags TEXT,
    is_encrypted BOOLEAN NOT NULL DEFAULT 0,
    iv TEXT,
    auth_tag TEXT,
    salt TEXT,
    group_id TEXT,
    metadata TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE TABLE IF NOT EXISTS groups (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    parent_id TEXT,
    icon TEXT,
    color TEXT,
    sort_order INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (parent_id) REFERENCES groups(id)
);
CREATE TABLE IF NOT EXISTS tags (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    color TEXT NOT NULL DEFAULT 'cyan',
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);
CREATE TABLE IF NOT EXISTS item_tags (
    item_id TEXT NOT NULL,
    tag_id TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    PRIMARY KEY (item_id, tag_id),
    FOREIGN KEY (item_id) REFERENCES clipboard_history(id),
    FOREIGN KEY (tag_id) REFERENCES tags(id)
);
CREATE TABLE IF NOT EXISTS versions (
    id TEXT PRIMARY KEY,
    item_id TEXT NOT NULL,
    content TEXT NOT NULL,
    hash TEXT NOT NULL,
    changes TEXT,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    FOREIGN KEY (item_id) REFERENCES clipboard_history(id)
);
";

/// Columns added after the first released schema. Each runs individually
/// and a failure (in practice: duplicate column) is swallowed, so the set
/// is safe against any prior schema version in any state.
const ADDITIVE_COLUMNS_SQL: &[&str] = &[
    "ALTER TABLE clipboard_history ADD COLUMN is_encrypted BOOLEAN NOT NULL DEFAULT 0",
    "ALTER TABLE clipboard_history ADD COLUMN iv TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN auth_tag TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN salt TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN title TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN group_id TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN metadata TEXT",
    "ALTER TABLE clipboard_history ADD COLUMN updated_at TEXT NOT NULL DEFAULT ''",
];

const CREATE_INDEXES_SQL: &str = "
CREATE INDEX IF NOT EXISTS idx_timestamp ON clipboard_history(timestamp DESC);
CREATE INDEX IF NOT EXISTS idx_type ON clipboard_history(type);
CREATE INDEX IF NOT EXISTS idx_content ON clipboard_history(content);
CREATE INDEX IF NOT EXISTS idx_group ON clipboard_history(group_id);
CREATE INDEX IF NOT EXISTS idx_parent ON groups(parent_id);
CREATE INDEX IF NOT EXISTS idx_item_versions ON versions(item_id);
";

/// Current UTC time as an ISO-8601 string, the store's ordering key format.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct ClipboardStore {
    pool: DbPool,
}

impl ClipboardStore {
    /// Open (or create) the database at `database_url` and bring its schema
    /// up to date. Initialization failure is fatal to the caller: the
    /// process cannot usefully run without persistence.
    pub fn open(database_url: &str) -> Result<Self> {
        let store = Self {
            pool: init_db_pool(database_url)?,
        };
        store.initialize()?;
        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection<ConnectionManager<SqliteConnection>>> {
        Ok(self.pool.get()?)
    }

    /// Idempotent schema setup: create missing tables, add late columns
    /// (duplicates swallowed), then (re)build indexes. Never destructive
    /// and safe to call any number of times.
    pub fn initialize(&self) -> Result<()> {
        let mut conn = self.conn()?;

        conn.batch_execute(CREATE_TABLES_SQL)
            .map_err(|e| AppError::storage(format!("failed to create schema: {}", e)))?;

        for alter in ADDITIVE_COLUMNS_SQL {
            if let Err(e) = conn.batch_execute(alter) {
                // Expected on any database that already has the column.
                debug!("additive migration skipped: {}", e);
            }
        }

        conn.batch_execute(CREATE_INDEXES_SQL)
            .map_err(|e| AppError::storage(format!("failed to create indexes: {}", e)))?;

        info!("database schema initialized");
        Ok(())
    }

    // ----- items -----

    /// Insert one history row, allocating its id. Rejects rows that break
    /// the encryption invariant (ciphertext iff full parameter bundle).
    pub fn insert_item(&self, new: NewItem) -> Result<ClipboardItem> {
        if new.is_encrypted != new.encryption_data.is_some() {
            return Err(AppError::validation(
                "encrypted item must carry iv/auth_tag/salt together, plaintext must carry none",
            ));
        }

        let now = now_iso();
        let row = DbClipboardItem {
            id: Uuid::new_v4().to_string(),
            content: new.content,
            item_type: new.item_type.to_string(),
            title: new.title,
            timestamp: new.timestamp,
            size: new.size,
            formats: encode_json_if_nonempty(&new.formats)?,
            full_content: new
                .full_content
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            is_favorite: false,
            tags: encode_json_if_nonempty(&new.tags)?,
            is_encrypted: new.is_encrypted,
            iv: new.encryption_data.as_ref().map(|d| d.iv.clone()),
            auth_tag: new.encryption_data.as_ref().map(|d| d.auth_tag.clone()),
            salt: new.encryption_data.as_ref().map(|d| d.salt.clone()),
            group_id: new.group_id,
            metadata: new.metadata.as_ref().map(serde_json::to_string).transpose()?,
            created_at: now.clone(),
            updated_at: now,
        };

        let mut conn = self.conn()?;
        item::insert_item(&mut conn, &row)?;
        Ok(row.into_domain())
    }

    pub fn get_item(&self, id: &str) -> Result<Option<ClipboardItem>> {
        let mut conn = self.conn()?;
        Ok(item::get_item_by_id(&mut conn, id)?.map(DbClipboardItem::into_domain))
    }

    pub fn list_items(&self, limit: i64) -> Result<Vec<ClipboardItem>> {
        let mut conn = self.conn()?;
        Ok(item::list_items(&mut conn, limit)?
            .into_iter()
            .map(DbClipboardItem::into_domain)
            .collect())
    }

    pub fn list_items_by_type(&self, item_type: ContentType, limit: i64) -> Result<Vec<ClipboardItem>> {
        let mut conn = self.conn()?;
        Ok(item::list_items_by_type(&mut conn, item_type.as_str(), limit)?
            .into_iter()
            .map(DbClipboardItem::into_domain)
            .collect())
    }

    pub fn list_favorites(&self, limit: i64) -> Result<Vec<ClipboardItem>> {
        let mut conn = self.conn()?;
        Ok(item::list_favorites(&mut conn, limit)?
            .into_iter()
            .map(DbClipboardItem::into_domain)
            .collect())
    }

    pub fn search(&self, query: &str, limit: i64) -> Result<Vec<ClipboardItem>> {
        let mut conn = self.conn()?;
        Ok(item::search_items(&mut conn, query, limit)?
            .into_iter()
            .map(DbClipboardItem::into_domain)
            .collect())
    }

    /// Sparse update. Only supplied fields are written, `updated_at` is
    /// always bumped, and an empty changeset is a no-op reporting `false`.
    pub fn update_item(&self, id: &str, changes: ItemChanges) -> Result<bool> {
        if changes.is_empty() {
            return Ok(false);
        }

        let db_changes = DbItemChanges {
            content: changes.content,
            item_type: changes.item_type.map(|t| t.to_string()),
            title: changes.title,
            formats: changes.formats.as_ref().map(serde_json::to_string).transpose()?,
            full_content: changes
                .full_content
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            tags: changes.tags.as_ref().map(serde_json::to_string).transpose()?,
            is_favorite: changes.is_favorite,
            group_id: changes.group_id,
            metadata: changes.metadata.as_ref().map(serde_json::to_string).transpose()?,
            updated_at: Some(now_iso()),
        };

        let mut conn = self.conn()?;
        item::update_item(&mut conn, id, &db_changes)
    }

    /// Referential cleanup is manual (the store does not enable cascading
    /// deletes): versions first, then tag associations, then the row.
    pub fn delete_item(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        version::delete_versions_for_item(&mut conn, id)?;
        tag::detach_all_for_item(&mut conn, id)?;
        item::delete_item(&mut conn, id)
    }

    /// Remove all history in dependency order.
    pub fn clear_all(&self) -> Result<usize> {
        let mut conn = self.conn()?;
        version::clear_versions(&mut conn)?;
        tag::clear_item_tags(&mut conn)?;
        let count = item::clear_items(&mut conn)?;
        info!("cleared {} clipboard items", count);
        Ok(count)
    }

    // ----- groups -----

    pub fn create_group(&self, new: NewGroup) -> Result<Group> {
        let row = DbGroup {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            parent_id: new.parent_id,
            icon: new.icon,
            color: new.color,
            sort_order: new.sort_order,
            created_at: now_iso(),
        };
        let mut conn = self.conn()?;
        if let Some(parent) = row.parent_id.as_deref() {
            group::ensure_no_cycle(&mut conn, &row.id, parent)?;
        }
        group::insert_group(&mut conn, &row)?;
        Ok(row.into_domain())
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        let mut conn = self.conn()?;
        Ok(group::list_groups(&mut conn)?
            .into_iter()
            .map(DbGroup::into_domain)
            .collect())
    }

    /// Sparse group update. Reparenting walks to the root first and rejects
    /// any move that would make the group its own descendant's child.
    pub fn update_group(&self, id: &str, changes: GroupChanges) -> Result<bool> {
        if changes.is_empty() {
            return Ok(false);
        }

        let mut conn = self.conn()?;
        if let Some(Some(new_parent)) = changes.parent_id.as_ref() {
            group::ensure_no_cycle(&mut conn, id, new_parent)?;
        }

        let db_changes = DbGroupChanges {
            name: changes.name,
            parent_id: changes.parent_id,
            icon: changes.icon,
            color: changes.color,
            sort_order: changes.sort_order,
        };
        group::update_group(&mut conn, id, &db_changes)
    }

    /// Deleting a group ungroups its member items rather than deleting
    /// them, and reparents child groups to the top level.
    pub fn delete_group(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        item::ungroup_items(&mut conn, id)?;
        let orphans: Vec<String> = group::list_groups(&mut conn)?
            .into_iter()
            .filter(|g| g.parent_id.as_deref() == Some(id))
            .map(|g| g.id)
            .collect();
        for child in orphans {
            group::update_group(
                &mut conn,
                &child,
                &DbGroupChanges {
                    parent_id: Some(None),
                    ..Default::default()
                },
            )?;
        }
        group::delete_group(&mut conn, id)
    }

    // ----- tags -----

    pub fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag> {
        let row = DbTag {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.unwrap_or(DEFAULT_TAG_COLOR).to_string(),
            created_at: now_iso(),
        };
        let mut conn = self.conn()?;
        tag::insert_tag(&mut conn, &row)?;
        Ok(row.into_domain())
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        let mut conn = self.conn()?;
        Ok(tag::list_tags(&mut conn)?
            .into_iter()
            .map(DbTag::into_domain)
            .collect())
    }

    /// Delete a tag and its associations, then refresh the cache of every
    /// item that carried it so no item keeps listing a dead tag.
    pub fn delete_tag(&self, id: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let affected_items = tag::item_ids_for_tag(&mut conn, id)?;
        let removed = tag::delete_tag(&mut conn, id)?;
        for item_id in &affected_items {
            self.refresh_tag_cache(&mut conn, item_id)?;
        }
        Ok(removed)
    }

    /// Attach a tag (created on first use) to an item, then refresh the
    /// item's denormalized tag cache from the relation.
    pub fn tag_item(&self, item_id: &str, tag_name: &str) -> Result<()> {
        let mut conn = self.conn()?;
        let tag_row = match tag::get_tag_by_name(&mut conn, tag_name)? {
            Some(existing) => existing,
            None => {
                let row = DbTag {
                    id: Uuid::new_v4().to_string(),
                    name: tag_name.to_string(),
                    color: DEFAULT_TAG_COLOR.to_string(),
                    created_at: now_iso(),
                };
                tag::insert_tag(&mut conn, &row)?;
                row
            }
        };

        tag::attach_tag(
            &mut conn,
            &DbItemTag {
                item_id: item_id.to_string(),
                tag_id: tag_row.id,
                created_at: now_iso(),
            },
        )?;
        self.refresh_tag_cache(&mut conn, item_id)
    }

    pub fn untag_item(&self, item_id: &str, tag_name: &str) -> Result<bool> {
        let mut conn = self.conn()?;
        let Some(tag_row) = tag::get_tag_by_name(&mut conn, tag_name)? else {
            return Ok(false);
        };
        let removed = tag::detach_tag(&mut conn, item_id, &tag_row.id)?;
        if removed {
            self.refresh_tag_cache(&mut conn, item_id)?;
        }
        Ok(removed)
    }

    pub fn tags_for_item(&self, item_id: &str) -> Result<Vec<String>> {
        let mut conn = self.conn()?;
        tag::tag_names_for_item(&mut conn, item_id)
    }

    fn refresh_tag_cache(&self, conn: &mut SqliteConnection, item_id: &str) -> Result<()> {
        let names = tag::tag_names_for_item(conn, item_id)?;
        let json = serde_json::to_string(&names)?;
        item::write_tag_cache(conn, item_id, &json)
    }

    // ----- versions -----

    /// Append a version snapshot of the given content, fingerprinted with
    /// sha256.
    pub fn add_version(&self, item_id: &str, content: &str, changes: Option<&str>) -> Result<Version> {
        use sha2::{Digest, Sha256};

        let row = DbVersion {
            id: Uuid::new_v4().to_string(),
            item_id: item_id.to_string(),
            content: content.to_string(),
            hash: hex::encode(Sha256::digest(content.as_bytes())),
            changes: changes.map(str::to_string),
            created_at: now_iso(),
        };
        let mut conn = self.conn()?;
        version::insert_version(&mut conn, &row)?;
        Ok(row.into_domain())
    }

    pub fn list_versions(&self, item_id: &str) -> Result<Vec<Version>> {
        let mut conn = self.conn()?;
        Ok(version::list_versions_for_item(&mut conn, item_id)?
            .into_iter()
            .map(DbVersion::into_domain)
            .collect())
    }

    /// Restore a snapshot by copying its content back onto the live item.
    /// The item's current content is snapshotted first, so a restore is
    /// itself undoable.
    pub fn restore_version(&self, version_id: &str) -> Result<bool> {
        let snapshot = {
            let mut conn = self.conn()?;
            version::get_version_by_id(&mut conn, version_id)?
        };
        let Some(snapshot) = snapshot else {
            return Ok(false);
        };
        let Some(current) = self.get_item(&snapshot.item_id)? else {
            return Ok(false);
        };

        self.add_version(&current.id, &current.content, Some("before restore"))?;
        self.update_item(
            &current.id,
            ItemChanges {
                content: Some(snapshot.content),
                ..Default::default()
            },
        )
    }
}

fn encode_json_if_nonempty(values: &[String]) -> Result<Option<String>> {
    if values.is_empty() {
        Ok(None)
    } else {
        Ok(Some(serde_json::to_string(values)?))
    }
}
