use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::error::Result;

use super::super::models::{DbItemTag, DbTag};
use super::super::schema::{item_tags, tags};

pub fn insert_tag(conn: &mut SqliteConnection, row: &DbTag) -> Result<()> {
    diesel::insert_into(tags::table).values(row).execute(conn)?;
    Ok(())
}

pub fn get_tag_by_name(conn: &mut SqliteConnection, name: &str) -> Result<Option<DbTag>> {
    let row = tags::table
        .filter(tags::name.eq(name))
        .select(DbTag::as_select())
        .first(conn)
        .optional()?;
    Ok(row)
}

pub fn list_tags(conn: &mut SqliteConnection) -> Result<Vec<DbTag>> {
    let rows = tags::table
        .order(tags::name.asc())
        .select(DbTag::as_select())
        .load(conn)?;
    Ok(rows)
}

pub fn delete_tag(conn: &mut SqliteConnection, id: &str) -> Result<bool> {
    diesel::delete(item_tags::table.filter(item_tags::tag_id.eq(id))).execute(conn)?;
    let affected = diesel::delete(tags::table.find(id)).execute(conn)?;
    Ok(affected > 0)
}

/// Items currently associated with a tag. The caller needs these before a
/// tag delete to refresh each item's denormalized cache afterwards.
pub fn item_ids_for_tag(conn: &mut SqliteConnection, tag_id: &str) -> Result<Vec<String>> {
    let ids = item_tags::table
        .filter(item_tags::tag_id.eq(tag_id))
        .select(item_tags::item_id)
        .load(conn)?;
    Ok(ids)
}

/// Associate a tag with an item; already-present pairs are left alone.
pub fn attach_tag(conn: &mut SqliteConnection, row: &DbItemTag) -> Result<()> {
    diesel::insert_into(item_tags::table)
        .values(row)
        .on_conflict_do_nothing()
        .execute(conn)?;
    Ok(())
}

pub fn detach_tag(conn: &mut SqliteConnection, item_id: &str, tag_id: &str) -> Result<bool> {
    let affected = diesel::delete(
        item_tags::table
            .filter(item_tags::item_id.eq(item_id))
            .filter(item_tags::tag_id.eq(tag_id)),
    )
    .execute(conn)?;
    Ok(affected > 0)
}

pub fn detach_all_for_item(conn: &mut SqliteConnection, item_id: &str) -> Result<usize> {
    let affected =
        diesel::delete(item_tags::table.filter(item_tags::item_id.eq(item_id))).execute(conn)?;
    Ok(affected)
}

pub fn clear_item_tags(conn: &mut SqliteConnection) -> Result<usize> {
    let count = diesel::delete(item_tags::table).execute(conn)?;
    Ok(count)
}

/// Tag names for an item from the authoritative relation, name-ordered.
pub fn tag_names_for_item(conn: &mut SqliteConnection, item_id: &str) -> Result<Vec<String>> {
    let names = item_tags::table
        .inner_join(tags::table.on(tags::id.eq(item_tags::tag_id)))
        .filter(item_tags::item_id.eq(item_id))
        .order(tags::name.asc())
        .select(tags::name)
        .load(conn)?;
    Ok(names)
}
