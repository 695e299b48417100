use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::{AppError, Result};

use super::super::models::{DbGroup, DbGroupChanges};
use super::super::schema::groups;

pub fn insert_group(conn: &mut SqliteConnection, row: &DbGroup) -> Result<()> {
    diesel::insert_into(groups::table).values(row).execute(conn)?;
    Ok(())
}

pub fn get_group_by_id(conn: &mut SqliteConnection, id: &str) -> Result<Option<DbGroup>> {
    let row = groups::table
        .find(id)
        .select(DbGroup::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

/// Siblings ordered by sort_order, ties broken by name.
pub fn list_groups(conn: &mut SqliteConnection) -> Result<Vec<DbGroup>> {
    let rows = groups::table
        .order((groups::sort_order.asc(), groups::name.asc()))
        .select(DbGroup::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn update_group(
    conn: &mut SqliteConnection,
    id: &str,
    changes: &DbGroupChanges,
) -> Result<bool> {
    let affected = diesel::update(groups::table.find(id)).set(changes).execute(conn)?;
    Ok(affected > 0)
}

pub fn delete_group(conn: &mut SqliteConnection, id: &str) -> Result<bool> {
    let affected = diesel::delete(groups::table.find(id)).execute(conn)?;
    Ok(affected > 0)
}

/// Walk the parent chain from `candidate_parent` to the root and fail if
/// `group_id` appears: reparenting onto itself or any of its descendants
/// would create a cycle. The iteration cap defends against a cycle already
/// present in old data.
pub fn ensure_no_cycle(
    conn: &mut SqliteConnection,
    group_id: &str,
    candidate_parent: &str,
) -> Result<()> {
    const MAX_DEPTH: usize = 1000;

    let mut cursor = Some(candidate_parent.to_string());
    let mut depth = 0;
    while let Some(current) = cursor {
        if current == group_id {
            return Err(AppError::validation(
                "group cannot become a descendant of itself",
            ));
        }
        depth += 1;
        if depth > MAX_DEPTH {
            return Err(AppError::validation("group hierarchy too deep"));
        }
        cursor = groups::table
            .find(&current)
            .select(groups::parent_id)
            .first::<Option<String>>(conn)
            .optional()?
            .flatten();
    }
    Ok(())
}
