use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use crate::config::Settings;
use crate::models::ClipboardItem;

/// Lock a mutex, recovering the data from a poisoned guard. Session state
/// stays usable even if a holder panicked mid-update.
pub(crate) fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Per-run state: loaded settings, the in-memory password of an unlocked
/// encryption session, and a bounded mirror of recent captures for cheap
/// index-addressed paste.
///
/// The password lives only here. It is never persisted; a restart always
/// begins locked when encryption is enabled.
pub struct Session {
    settings: Settings,
    settings_path: Option<PathBuf>,
    password: Option<String>,
    mirror: VecDeque<ClipboardItem>,
}

impl Session {
    pub fn new(settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            settings,
            settings_path,
            password: None,
            mirror: VecDeque::new(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Write the current settings back to disk.
    pub fn persist_settings(&self) -> crate::error::Result<()> {
        self.settings.save(self.settings_path.clone())
    }

    pub fn encryption_enabled(&self) -> bool {
        self.settings.enable_encryption
    }

    /// Unlocked means captures can be encrypted and history decrypted.
    /// With encryption disabled the session is trivially unlocked.
    pub fn is_unlocked(&self) -> bool {
        !self.settings.enable_encryption || self.password.is_some()
    }

    pub fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    pub fn set_password(&mut self, password: String) {
        self.password = Some(password);
    }

    pub fn clear_password(&mut self) {
        self.password = None;
    }

    // ----- recent-capture mirror -----

    /// Prepend a capture, evicting the oldest entries past the configured
    /// history cap.
    pub fn push_recent(&mut self, item: ClipboardItem) {
        self.mirror.push_front(item);
        let cap = self.settings.max_history_items.max(1);
        while self.mirror.len() > cap {
            self.mirror.pop_back();
        }
    }

    /// Replace the mirror with a fresh newest-first listing, e.g. after a
    /// bulk query re-read the store.
    pub fn rebuild_mirror(&mut self, items: Vec<ClipboardItem>) {
        let cap = self.settings.max_history_items.max(1);
        self.mirror = items.into_iter().take(cap).collect();
    }

    /// Entry at mirror position `index` (0 = most recent).
    pub fn recent(&self, index: usize) -> Option<&ClipboardItem> {
        self.mirror.get(index)
    }

    pub fn recent_len(&self) -> usize {
        self.mirror.len()
    }

    pub fn remove_recent(&mut self, id: &str) {
        self.mirror.retain(|item| item.id != id);
    }

    pub fn clear_recent(&mut self) {
        self.mirror.clear();
    }
}
