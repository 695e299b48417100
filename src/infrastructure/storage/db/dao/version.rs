use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::Result;

use super::super::models::DbVersion;
use super::super::schema::versions;

/// Append-only: versions are inserted and read, never updated.
pub fn insert_version(conn: &mut SqliteConnection, row: &DbVersion) -> Result<()> {
    diesel::insert_into(versions::table).values(row).execute(conn)?;
    Ok(())
}

pub fn get_version_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<DbVersion>> {
    let row = versions::table
        .find(id)
        .select(DbVersion::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Snapshots for an item, newest first.
pub fn list_versions_for_item(
    conn: &mut SqliteConnection,
    item_id: &str,
) -> Result<Vec<DbVersion>> {
    let rows = versions::table
        .filter(versions::item_id.eq(item_id))
        .order(versions::created_at.desc())
        .select(DbVersion::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn delete_versions_for_item(conn: &mut SqliteConnection, item_id: &str) -> Result<usize> {
    let affected =
        diesel::delete(versions::table.filter(versions::item_id.eq(item_id))).execute(conn)?;
    Ok(affected)
}

pub fn clear_versions(conn: &mut SqliteConnection) -> Result<usize> {
    let count = diesel::delete(versions::table).execute(conn)?;
    Ok(count)
}
