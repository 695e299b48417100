//! Polling capture loop: read the clipboard at a fixed interval, dedup
//! against the previous read, and persist anything new.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use log::{debug, error, info};
use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;

use crate::error::Result;
use crate::infrastructure::clipboard::ClipboardReader;
use crate::infrastructure::security::encryption;
use crate::infrastructure::storage::{now_iso, ClipboardStore};
use crate::models::{ClipboardItem, NewItem};

use super::session::{lock_unpoisoned, Session};

pub type CaptureObserver = Box<dyn FnMut(&ClipboardItem) + Send>;

/// Cooperative stop signal for a running [`CaptureLoop`]. Stop is sticky
/// and idempotent: calling it any number of times, before or after the
/// loop starts waiting, stops the loop once.
#[derive(Clone)]
pub struct CaptureHandle {
    notify: Arc<Notify>,
    stopped: Arc<AtomicBool>,
}

impl CaptureHandle {
    pub fn stop(&self) {
        if !self.stopped.swap(true, Ordering::SeqCst) {
            info!("capture loop stop requested");
        }
        self.notify.notify_one();
    }
}

pub struct CaptureLoop {
    reader: Box<dyn ClipboardReader>,
    store: Arc<ClipboardStore>,
    session: Arc<Mutex<Session>>,
    observer: Option<CaptureObserver>,
    last_fingerprint: Option<String>,
    notify: Arc<Notify>,
    stopped: Arc<AtomicBool>,
}

impl CaptureLoop {
    pub fn new(
        reader: Box<dyn ClipboardReader>,
        store: Arc<ClipboardStore>,
        session: Arc<Mutex<Session>>,
    ) -> Self {
        Self {
            reader,
            store,
            session,
            observer: None,
            last_fingerprint: None,
            notify: Arc::new(Notify::new()),
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register a callback invoked after each persisted capture.
    pub fn set_observer(&mut self, observer: CaptureObserver) {
        self.observer = Some(observer);
    }

    pub fn handle(&self) -> CaptureHandle {
        CaptureHandle {
            notify: Arc::clone(&self.notify),
            stopped: Arc::clone(&self.stopped),
        }
    }

    /// One capture cycle. Returns the persisted item, or `None` when the
    /// clipboard was empty, unchanged since the last tick, or the session
    /// is locked. Storage failures are surfaced, not swallowed; the caller
    /// (`run`) logs and keeps polling.
    pub fn tick(&mut self) -> Result<Option<ClipboardItem>> {
        let bag = self.reader.read();
        if bag.is_empty() {
            return Ok(None);
        }

        let fingerprint = bag.fingerprint();
        if self.last_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(None);
        }
        // Remembered even for drops below, so unlocking does not cause a
        // burst re-capture of whatever is still on the clipboard.
        self.last_fingerprint = Some(fingerprint.clone());

        let (encrypt_with, is_locked) = {
            let session = lock_unpoisoned(&self.session);
            if session.encryption_enabled() {
                match session.password() {
                    Some(pw) => (Some(pw.to_string()), false),
                    None => (None, true),
                }
            } else {
                (None, false)
            }
        };
        if is_locked {
            debug!("session locked, dropping capture");
            return Ok(None);
        }

        let item_type = bag.resolve_type();
        let plaintext = bag
            .primary_text()
            .map(str::to_string)
            .unwrap_or_else(|| fingerprint.clone());
        let size = fingerprint.len() as i64;

        let new = match encrypt_with {
            Some(password) => {
                let sealed = encryption::encrypt(&plaintext, &password)?;
                NewItem {
                    content: sealed.content.clone(),
                    item_type,
                    timestamp: now_iso(),
                    size,
                    formats: bag.formats.clone(),
                    // Richer representations are not stored for encrypted
                    // captures; only the primary text is protected.
                    full_content: None,
                    is_encrypted: true,
                    encryption_data: Some(sealed.encryption_data()),
                    ..Default::default()
                }
            }
            None => NewItem {
                content: plaintext,
                item_type,
                timestamp: now_iso(),
                size,
                formats: bag.formats.clone(),
                full_content: Some(bag),
                ..Default::default()
            },
        };

        let item = self.store.insert_item(new)?;
        debug!("captured {} item {}", item.item_type, item.id);

        lock_unpoisoned(&self.session).push_recent(item.clone());
        if let Some(observer) = self.observer.as_mut() {
            observer(&item);
        }
        Ok(Some(item))
    }

    /// Poll until the handle signals stop. One failed tick never stops the
    /// loop.
    pub async fn run(mut self) {
        let period = {
            let session = lock_unpoisoned(&self.session);
            Duration::from_millis(session.settings().monitor_interval_ms.max(1))
        };
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!("capture loop started, polling every {:?}", period);

        loop {
            if self.stopped.load(Ordering::SeqCst) {
                break;
            }
            tokio::select! {
                _ = self.notify.notified() => break,
                _ = interval.tick() => {
                    if let Err(e) = self.tick() {
                        error!("capture tick failed: {}", e);
                    }
                }
            }
        }
        info!("capture loop stopped");
    }
}
