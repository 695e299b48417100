use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::Result;

use super::super::models::{DbClipboardItem, DbItemChanges};
use super::super::schema::clipboard_history;

pub fn insert_item(conn: &mut SqliteConnection, row: &DbClipboardItem) -> Result<()> {
    diesel::insert_into(clipboard_history::table)
        .values(row)
        .execute(conn)?;
    Ok(())
}

pub fn get_item_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<DbClipboardItem>> {
    let row = clipboard_history::table
        .find(id)
        .select(DbClipboardItem::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Most recent items first, capped at `limit`.
pub fn list_items(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<DbClipboardItem>> {
    let rows = clipboard_history::table
        .order(clipboard_history::timestamp.desc())
        .limit(limit)
        .select(DbClipboardItem::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn list_items_by_type(
    conn: &mut SqliteConnection,
    item_type: &str,
    limit: i64,
) -> Result<Vec<DbClipboardItem>> {
    let rows = clipboard_history::table
        .filter(clipboard_history::item_type.eq(item_type))
        .order(clipboard_history::timestamp.desc())
        .limit(limit)
        .select(DbClipboardItem::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn list_favorites(conn: &mut SqliteConnection, limit: i64) -> Result<Vec<DbClipboardItem>> {
    let rows = clipboard_history::table
        .filter(clipboard_history::is_favorite.eq(true))
        .order(clipboard_history::timestamp.desc())
        .limit(limit)
        .select(DbClipboardItem::as_select())
        .load(conn)?;
    Ok(rows)
}

/// Case-insensitive substring match across content, type and title.
/// SQLite's LIKE is case-insensitive for ASCII by default.
pub fn search_items(
    conn: &mut SqliteConnection,
    query: &str,
    limit: i64,
) -> Result<Vec<DbClipboardItem>> {
    let pattern = format!("%{}%", query);
    let rows = clipboard_history::table
        .filter(
            clipboard_history::content
                .like(pattern.clone())
                .or(clipboard_history::item_type.like(pattern.clone()))
                .or(clipboard_history::title.like(pattern)),
        )
        .order(clipboard_history::timestamp.desc())
        .limit(limit)
        .select(DbClipboardItem::as_select())
        .load(conn)?;
    Ok(rows)
}

/// Sparse update; returns whether a row was actually affected. The caller
/// guarantees the changeset is non-empty.
pub fn update_item(
    conn: &mut SqliteConnection,
    id: &str,
    changes: &DbItemChanges,
) -> Result<bool> {
    let affected = diesel::update(clipboard_history::table.find(id))
        .set(changes)
        .execute(conn)?;
    Ok(affected > 0)
}

pub fn delete_item(conn: &mut SqliteConnection, id: &str) -> Result<bool> {
    let affected = diesel::delete(clipboard_history::table.find(id)).execute(conn)?;
    Ok(affected > 0)
}

pub fn clear_items(conn: &mut SqliteConnection) -> Result<usize> {
    let count = diesel::delete(clipboard_history::table).execute(conn)?;
    Ok(count)
}

/// Null out `group_id` on every member of a group. Used when the group is
/// deleted: members survive, ungrouped.
pub fn ungroup_items(conn: &mut SqliteConnection, group_id: &str) -> Result<usize> {
    let affected = diesel::update(
        clipboard_history::table.filter(clipboard_history::group_id.eq(group_id)),
    )
    .set(clipboard_history::group_id.eq(None::<String>))
    .execute(conn)?;
    Ok(affected)
}

/// Rewrite the denormalized `tags` JSON cache on an item from the
/// authoritative relation.
pub fn write_tag_cache(
    conn: &mut SqliteConnection,
    item_id: &str,
    tag_names_json: &str,
) -> Result<()> {
    diesel::update(clipboard_history::table.find(item_id))
        .set(clipboard_history::tags.eq(tag_names_json))
        .execute(conn)?;
    Ok(())
}
