//! Diesel view of the five tables. The actual DDL lives in
//! `store::initialize`, which creates and additively migrates the schema
//! at startup; these definitions mirror its final shape.

diesel::table! {
    clipboard_history (id) {
        id -> Text,
        content -> Text,
        #[sql_name = "type"]
        item_type -> Text,
        title -> Nullable<Text>,
        timestamp -> Text,
        size -> BigInt,
        formats -> Nullable<Text>,
        full_content -> Nullable<Text>,
        is_favorite -> Bool,
        tags -> Nullable<Text>,
        is_encrypted -> Bool,
        iv -> Nullable<Text>,
        auth_tag -> Nullable<Text>,
        salt -> Nullable<Text>,
        group_id -> Nullable<Text>,
        metadata -> Nullable<Text>,
        created_at -> Text,
        updated_at -> Text,
    }
}

diesel::table! {
    groups (id) {
        id -> Text,
        name -> Text,
        parent_id -> Nullable<Text>,
        icon -> Nullable<Text>,
        color -> Nullable<Text>,
        sort_order -> Integer,
        created_at -> Text,
    }
}

diesel::table! {
    tags (id) {
        id -> Text,
        name -> Text,
        color -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    item_tags (item_id, tag_id) {
        item_id -> Text,
        tag_id -> Text,
        created_at -> Text,
    }
}

diesel::table! {
    versions (id) {
        id -> Text,
        item_id -> Text,
        content -> Text,
        hash -> Text,
        changes -> Nullable<Text>,
        created_at -> Text,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    clipboard_history,
    groups,
    tags,
    item_tags,
    versions,
);
