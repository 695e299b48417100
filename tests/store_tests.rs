use clipvault::core::ContentType;
use clipvault::infrastructure::storage::ClipboardStore;
use clipvault::models::{GroupChanges, ItemChanges, NewGroup, NewItem};
use tempfile::TempDir;

fn open_store() -> (TempDir, ClipboardStore) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let store = ClipboardStore::open(path.to_str().unwrap()).unwrap();
    (dir, store)
}

fn text_item(content: &str, timestamp: &str) -> NewItem {
    NewItem {
        content: content.to_string(),
        item_type: ContentType::Text,
        timestamp: timestamp.to_string(),
        size: content.len() as i64,
        formats: vec!["text".to_string()],
        ..Default::default()
    }
}

#[test]
fn initialize_is_idempotent_and_preserves_data() {
    let (_dir, store) = open_store();
    let inserted = store
        .insert_item(text_item("keep me", "2026-01-01T00:00:00.000Z"))
        .unwrap();

    for _ in 0..3 {
        store.initialize().unwrap();
    }

    let found = store.get_item(&inserted.id).unwrap().unwrap();
    assert_eq!(found.content, "keep me");
}

#[test]
fn insert_and_get_roundtrip() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("hello", "2026-01-01T00:00:00.000Z"))
        .unwrap();

    assert!(!item.id.is_empty());
    assert!(!item.is_favorite);
    assert!(!item.is_encrypted);

    let found = store.get_item(&item.id).unwrap().unwrap();
    assert_eq!(found.content, "hello");
    assert_eq!(found.item_type, ContentType::Text);
    assert_eq!(found.formats, vec!["text".to_string()]);
    assert!(found.encryption_state_consistent());
}

#[test]
fn insert_rejects_inconsistent_encryption_state() {
    let (_dir, store) = open_store();
    let mut new = text_item("x", "2026-01-01T00:00:00.000Z");
    new.is_encrypted = true; // flag without iv/auth_tag/salt
    assert!(store.insert_item(new).is_err());
}

#[test]
fn list_is_newest_first() {
    let (_dir, store) = open_store();
    store
        .insert_item(text_item("old", "2026-01-01T00:00:00.000Z"))
        .unwrap();
    store
        .insert_item(text_item("new", "2026-01-02T00:00:00.000Z"))
        .unwrap();

    let items = store.list_items(10).unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "new");
    assert_eq!(items[1].content, "old");
}

#[test]
fn empty_update_is_a_noop() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("x", "2026-01-01T00:00:00.000Z"))
        .unwrap();
    assert!(!store.update_item(&item.id, ItemChanges::default()).unwrap());
}

#[test]
fn update_missing_item_reports_false() {
    let (_dir, store) = open_store();
    let changes = ItemChanges {
        is_favorite: Some(true),
        ..Default::default()
    };
    assert!(!store.update_item("no-such-id", changes).unwrap());
}

#[test]
fn sparse_update_touches_only_named_fields() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("body", "2026-01-01T00:00:00.000Z"))
        .unwrap();

    let changed = store
        .update_item(
            &item.id,
            ItemChanges {
                title: Some("a title".to_string()),
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .unwrap();
    assert!(changed);

    let found = store.get_item(&item.id).unwrap().unwrap();
    assert_eq!(found.title.as_deref(), Some("a title"));
    assert!(found.is_favorite);
    assert_eq!(found.content, "body");
}

#[test]
fn delete_missing_item_reports_false() {
    let (_dir, store) = open_store();
    assert!(!store.delete_item("no-such-id").unwrap());
}

#[test]
fn delete_removes_versions_and_tag_links() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("x", "2026-01-01T00:00:00.000Z"))
        .unwrap();
    store.add_version(&item.id, "x", None).unwrap();
    store.tag_item(&item.id, "work").unwrap();

    assert!(store.delete_item(&item.id).unwrap());
    assert!(store.get_item(&item.id).unwrap().is_none());
    assert!(store.list_versions(&item.id).unwrap().is_empty());
    // tag itself survives, only the association is gone
    assert_eq!(store.list_tags().unwrap().len(), 1);
}

#[test]
fn clear_all_reports_count() {
    let (_dir, store) = open_store();
    for i in 0..3 {
        store
            .insert_item(text_item(
                &format!("item {}", i),
                &format!("2026-01-0{}T00:00:00.000Z", i + 1),
            ))
            .unwrap();
    }
    assert_eq!(store.clear_all().unwrap(), 3);
    assert!(store.list_items(10).unwrap().is_empty());
}

#[test]
fn search_matches_content_substring() {
    let (_dir, store) = open_store();
    store
        .insert_item(text_item(
            "the quick brown fox",
            "2026-01-01T00:00:00.000Z",
        ))
        .unwrap();
    store
        .insert_item(text_item("something else", "2026-01-02T00:00:00.000Z"))
        .unwrap();

    let hits = store.search("brown", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "the quick brown fox");
}

#[test]
fn search_is_case_insensitive_across_content_type_and_title() {
    let (_dir, store) = open_store();
    store
        .insert_item(text_item(
            "the quick brown fox",
            "2026-01-01T00:00:00.000Z",
        ))
        .unwrap();
    let titled = store
        .insert_item(text_item("plain body", "2026-01-02T00:00:00.000Z"))
        .unwrap();
    store
        .update_item(
            &titled.id,
            ItemChanges {
                title: Some("Meeting Notes".to_string()),
                ..Default::default()
            },
        )
        .unwrap();
    let mut link = text_item("https://example.com", "2026-01-03T00:00:00.000Z");
    link.item_type = ContentType::Url;
    let link = store.insert_item(link).unwrap();

    // case folding against a lowercase content row
    let hits = store.search("BROWN", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].content, "the quick brown fox");

    // title column, query cased differently from the stored value
    let hits = store.search("meeting", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, titled.id);

    // type column
    let hits = store.search("URL", 10).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, link.id);
}

#[test]
fn list_by_type_and_favorites_filter() {
    let (_dir, store) = open_store();
    let mut url = text_item("https://example.com", "2026-01-01T00:00:00.000Z");
    url.item_type = ContentType::Url;
    store.insert_item(url).unwrap();
    let plain = store
        .insert_item(text_item("plain", "2026-01-02T00:00:00.000Z"))
        .unwrap();
    store
        .update_item(
            &plain.id,
            ItemChanges {
                is_favorite: Some(true),
                ..Default::default()
            },
        )
        .unwrap();

    let urls = store.list_items_by_type(ContentType::Url, 10).unwrap();
    assert_eq!(urls.len(), 1);
    assert_eq!(urls[0].item_type, ContentType::Url);

    let favorites = store.list_favorites(10).unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].content, "plain");
}

#[test]
fn group_reparent_cycle_is_rejected() {
    let (_dir, store) = open_store();
    let parent = store
        .create_group(NewGroup {
            name: "parent".into(),
            ..Default::default()
        })
        .unwrap();
    let child = store
        .create_group(NewGroup {
            name: "child".into(),
            parent_id: Some(parent.id.clone()),
            ..Default::default()
        })
        .unwrap();

    // parent under its own child
    let result = store.update_group(
        &parent.id,
        GroupChanges {
            parent_id: Some(Some(child.id.clone())),
            ..Default::default()
        },
    );
    assert!(result.is_err());

    // self-parenting
    let result = store.update_group(
        &child.id,
        GroupChanges {
            parent_id: Some(Some(child.id.clone())),
            ..Default::default()
        },
    );
    assert!(result.is_err());
}

#[test]
fn delete_group_ungroups_items_and_lifts_children() {
    let (_dir, store) = open_store();
    let group = store
        .create_group(NewGroup {
            name: "g".into(),
            ..Default::default()
        })
        .unwrap();
    let child = store
        .create_group(NewGroup {
            name: "sub".into(),
            parent_id: Some(group.id.clone()),
            ..Default::default()
        })
        .unwrap();
    let mut new = text_item("member", "2026-01-01T00:00:00.000Z");
    new.group_id = Some(group.id.clone());
    let item = store.insert_item(new).unwrap();

    assert!(store.delete_group(&group.id).unwrap());

    let item = store.get_item(&item.id).unwrap().unwrap();
    assert!(item.group_id.is_none());

    let groups = store.list_groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].id, child.id);
    assert!(groups[0].parent_id.is_none());
}

#[test]
fn tagging_keeps_the_json_cache_in_sync() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("x", "2026-01-01T00:00:00.000Z"))
        .unwrap();

    store.tag_item(&item.id, "work").unwrap();
    store.tag_item(&item.id, "archive").unwrap();
    // repeat attach is a no-op
    store.tag_item(&item.id, "work").unwrap();

    let names = store.tags_for_item(&item.id).unwrap();
    assert_eq!(names, vec!["archive".to_string(), "work".to_string()]);
    let cached = store.get_item(&item.id).unwrap().unwrap().tags;
    assert_eq!(cached, names);

    assert!(store.untag_item(&item.id, "work").unwrap());
    assert!(!store.untag_item(&item.id, "work").unwrap());
    let cached = store.get_item(&item.id).unwrap().unwrap().tags;
    assert_eq!(cached, vec!["archive".to_string()]);
}

#[test]
fn deleting_a_tag_refreshes_every_carrier_cache() {
    let (_dir, store) = open_store();
    let first = store
        .insert_item(text_item("a", "2026-01-01T00:00:00.000Z"))
        .unwrap();
    let second = store
        .insert_item(text_item("b", "2026-01-02T00:00:00.000Z"))
        .unwrap();
    let work = store.create_tag("work", None).unwrap();
    store.tag_item(&first.id, "work").unwrap();
    store.tag_item(&second.id, "work").unwrap();
    store.tag_item(&second.id, "archive").unwrap();

    assert!(store.delete_tag(&work.id).unwrap());

    // relation and cache agree on both former carriers
    assert!(store.tags_for_item(&first.id).unwrap().is_empty());
    assert!(store.get_item(&first.id).unwrap().unwrap().tags.is_empty());
    assert_eq!(
        store.get_item(&second.id).unwrap().unwrap().tags,
        vec!["archive".to_string()]
    );
}

#[test]
fn version_restore_snapshots_before_overwriting() {
    let (_dir, store) = open_store();
    let item = store
        .insert_item(text_item("draft one", "2026-01-01T00:00:00.000Z"))
        .unwrap();
    let snapshot = store.add_version(&item.id, "draft one", None).unwrap();
    assert_eq!(snapshot.hash.len(), 64); // sha256 hex

    store
        .update_item(
            &item.id,
            ItemChanges {
                content: Some("draft two".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    assert!(store.restore_version(&snapshot.id).unwrap());

    let restored = store.get_item(&item.id).unwrap().unwrap();
    assert_eq!(restored.content, "draft one");

    let versions = store.list_versions(&item.id).unwrap();
    assert_eq!(versions.len(), 2);
    assert!(versions
        .iter()
        .any(|v| v.changes.as_deref() == Some("before restore") && v.content == "draft two"));
}

#[test]
fn restore_missing_version_reports_false() {
    let (_dir, store) = open_store();
    assert!(!store.restore_version("no-such-version").unwrap());
}
