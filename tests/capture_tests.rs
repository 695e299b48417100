use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use clipvault::application::{CaptureLoop, Session};
use clipvault::config::Settings;
use clipvault::core::ContentType;
use clipvault::infrastructure::clipboard::MemoryClipboard;
use clipvault::infrastructure::security::encryption::{self, EncryptedPayload};
use clipvault::infrastructure::storage::ClipboardStore;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    clipboard: MemoryClipboard,
    store: Arc<ClipboardStore>,
    session: Arc<Mutex<Session>>,
    capture: CaptureLoop,
}

fn fixture(settings: Settings) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("history.db");
    let store = Arc::new(ClipboardStore::open(path.to_str().unwrap()).unwrap());
    let session = Arc::new(Mutex::new(Session::new(settings, None)));
    let clipboard = MemoryClipboard::new();
    let capture = CaptureLoop::new(
        Box::new(clipboard.clone()),
        Arc::clone(&store),
        Arc::clone(&session),
    );
    Fixture {
        _dir: dir,
        clipboard,
        store,
        session,
        capture,
    }
}

#[test]
fn empty_clipboard_produces_nothing() {
    let mut fx = fixture(Settings::default());
    assert!(fx.capture.tick().unwrap().is_none());
    assert!(fx.store.list_items(10).unwrap().is_empty());
}

#[test]
fn unchanged_content_is_captured_once() {
    let mut fx = fixture(Settings::default());
    fx.clipboard.push_text("hello");

    let first = fx.capture.tick().unwrap();
    assert!(first.is_some());
    // same content still on the clipboard
    assert!(fx.capture.tick().unwrap().is_none());
    assert!(fx.capture.tick().unwrap().is_none());

    assert_eq!(fx.store.list_items(10).unwrap().len(), 1);
}

#[test]
fn changed_content_is_captured_again() {
    let mut fx = fixture(Settings::default());
    fx.clipboard.push_text("first");
    fx.capture.tick().unwrap();
    fx.clipboard.push_text("second");
    fx.capture.tick().unwrap();

    let items = fx.store.list_items(10).unwrap();
    assert_eq!(items.len(), 2);
}

#[test]
fn plaintext_capture_keeps_full_content_and_classifies() {
    let mut fx = fixture(Settings::default());
    fx.clipboard.push_text("https://example.com/page");

    let item = fx.capture.tick().unwrap().unwrap();
    assert_eq!(item.item_type, ContentType::Url);
    assert_eq!(item.content, "https://example.com/page");
    assert!(!item.is_encrypted);
    let bag = item.full_content.expect("plaintext capture keeps the bag");
    assert_eq!(bag.text.as_deref(), Some("https://example.com/page"));
}

#[test]
fn locked_session_drops_captures_silently() {
    let mut settings = Settings::default();
    settings.enable_encryption = true;
    let mut fx = fixture(settings);
    fx.clipboard.push_text("secret stuff");

    assert!(fx.capture.tick().unwrap().is_none());
    assert!(fx.store.list_items(10).unwrap().is_empty());
}

#[test]
fn unlocking_does_not_recapture_dropped_content() {
    let mut settings = Settings::default();
    settings.enable_encryption = true;
    let mut fx = fixture(settings);
    fx.clipboard.push_text("secret stuff");

    assert!(fx.capture.tick().unwrap().is_none());
    fx.session.lock().unwrap().set_password("pw".into());
    // the same content is still on the clipboard; it was already seen
    assert!(fx.capture.tick().unwrap().is_none());
    assert!(fx.store.list_items(10).unwrap().is_empty());
}

#[test]
fn unlocked_session_encrypts_at_rest() {
    let mut settings = Settings::default();
    settings.enable_encryption = true;
    let mut fx = fixture(settings);
    fx.session.lock().unwrap().set_password("pw".into());
    fx.clipboard.push_text("top secret");

    let item = fx.capture.tick().unwrap().unwrap();
    assert!(item.is_encrypted);
    assert_ne!(item.content, "top secret");
    assert!(item.full_content.is_none());

    let data = item.encryption_data.expect("encrypted item carries params");
    let payload = EncryptedPayload::from_parts(item.content.clone(), &data);
    assert_eq!(encryption::decrypt(&payload, "pw").unwrap(), "top secret");

    // the stored row matches
    let stored = fx.store.get_item(&item.id).unwrap().unwrap();
    assert!(stored.is_encrypted);
    assert!(stored.full_content.is_none());
}

#[test]
fn mirror_is_capped_and_newest_first() {
    let mut settings = Settings::default();
    settings.max_history_items = 2;
    let mut fx = fixture(settings);

    for text in ["one", "two", "three"] {
        fx.clipboard.push_text(text);
        fx.capture.tick().unwrap();
    }

    let session = fx.session.lock().unwrap();
    assert_eq!(session.recent_len(), 2);
    assert_eq!(session.recent(0).unwrap().content, "three");
    assert_eq!(session.recent(1).unwrap().content, "two");
}

#[test]
fn observer_sees_each_persisted_capture() {
    let mut fx = fixture(Settings::default());
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);
    fx.capture
        .set_observer(Box::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

    fx.clipboard.push_text("a");
    fx.capture.tick().unwrap();
    fx.capture.tick().unwrap(); // dedup, no notification
    fx.clipboard.push_text("b");
    fx.capture.tick().unwrap();

    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn run_stops_on_handle_signal() {
    let mut settings = Settings::default();
    settings.monitor_interval_ms = 5;
    let fx = fixture(settings);
    let handle = fx.capture.handle();

    let task = tokio::spawn(fx.capture.run());
    handle.stop();
    handle.stop(); // idempotent

    tokio::time::timeout(std::time::Duration::from_secs(1), task)
        .await
        .expect("loop exits promptly")
        .unwrap();
}
