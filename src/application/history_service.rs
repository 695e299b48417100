//! The command/query surface over the store, the session and the system
//! clipboard. Everything a front end (CLI, tray, hotkey) calls goes
//! through here.

use std::sync::{Arc, Mutex};

use log::{info, warn};
use serde::Serialize;

use crate::core::{classify, ContentType};
use crate::error::{AppError, Result};
use crate::infrastructure::clipboard::ClipboardWriter;
use crate::infrastructure::ocr::{TextRecognizer, DEFAULT_OCR_LANGUAGES};
use crate::infrastructure::security::encryption::{self, EncryptedPayload};
use crate::infrastructure::security::password;
use crate::infrastructure::storage::{now_iso, ClipboardStore};
use crate::models::{
    ClipboardItem, Group, GroupChanges, ItemChanges, NewGroup, NewItem, Tag, Version,
};

use super::session::{lock_unpoisoned, Session};

/// Shown in place of ciphertext while the session is locked.
pub const LOCKED_PLACEHOLDER: &str = "[encrypted - unlock to view]";
/// Shown for a row whose ciphertext does not decrypt under the session
/// password (corrupted row, or a row from a previous password era).
pub const DECRYPT_FAILED_PLACEHOLDER: &str = "[decryption failed]";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptionStatus {
    pub enabled: bool,
    pub unlocked: bool,
}

pub struct HistoryService {
    store: Arc<ClipboardStore>,
    session: Arc<Mutex<Session>>,
    writer: Box<dyn ClipboardWriter>,
    recognizer: Option<Box<dyn TextRecognizer>>,
}

impl HistoryService {
    pub fn new(
        store: Arc<ClipboardStore>,
        session: Arc<Mutex<Session>>,
        writer: Box<dyn ClipboardWriter>,
    ) -> Self {
        Self {
            store,
            session,
            writer,
            recognizer: None,
        }
    }

    pub fn set_recognizer(&mut self, recognizer: Box<dyn TextRecognizer>) {
        self.recognizer = Some(recognizer);
    }

    // ----- encryption lifecycle -----

    /// Turn on at-rest encryption with a fresh salt and verification hash,
    /// and leave the session unlocked under the new password. Existing
    /// plaintext rows are not rewritten.
    pub fn enable_encryption(&self, passphrase: &str) -> Result<()> {
        if passphrase.is_empty() {
            return Err(AppError::validation("password must not be empty"));
        }

        let mut session = lock_unpoisoned(&self.session);
        if session.encryption_enabled() {
            return Err(AppError::validation("encryption is already enabled"));
        }

        let salt = password::generate_salt();
        let hash = password::verification_hash(passphrase, &salt)?;

        let settings = session.settings_mut();
        settings.enable_encryption = true;
        settings.password_salt = Some(salt);
        settings.password_hash = Some(hash);
        session.persist_settings()?;
        session.set_password(passphrase.to_string());

        info!("encryption enabled");
        Ok(())
    }

    /// Verify the passphrase against the stored hash and keep it in memory
    /// for this session.
    pub fn unlock_encryption(&self, passphrase: &str) -> Result<()> {
        let mut session = lock_unpoisoned(&self.session);
        if !session.encryption_enabled() {
            return Err(AppError::validation("encryption is not enabled"));
        }

        if !Self::passphrase_matches(session.settings(), passphrase)? {
            return Err(AppError::WrongPassword);
        }
        session.set_password(passphrase.to_string());
        info!("session unlocked");
        Ok(())
    }

    /// Forget the in-memory password. Subsequent captures are dropped and
    /// encrypted rows read back as placeholders until the next unlock.
    pub fn lock_session(&self) {
        let mut session = lock_unpoisoned(&self.session);
        session.clear_password();
        info!("session locked");
    }

    /// Turn encryption off after verifying the passphrase. Rows already
    /// encrypted stay ciphertext; without the credential material they
    /// read back as failed decrypts.
    pub fn disable_encryption(&self, passphrase: &str) -> Result<()> {
        let mut session = lock_unpoisoned(&self.session);
        if !session.encryption_enabled() {
            return Err(AppError::validation("encryption is not enabled"));
        }
        if !Self::passphrase_matches(session.settings(), passphrase)? {
            return Err(AppError::WrongPassword);
        }

        let settings = session.settings_mut();
        settings.enable_encryption = false;
        settings.password_hash = None;
        settings.password_salt = None;
        session.persist_settings()?;
        session.clear_password();

        info!("encryption disabled");
        Ok(())
    }

    pub fn encryption_status(&self) -> EncryptionStatus {
        let session = lock_unpoisoned(&self.session);
        EncryptionStatus {
            enabled: session.encryption_enabled(),
            unlocked: session.is_unlocked(),
        }
    }

    fn passphrase_matches(settings: &crate::config::Settings, passphrase: &str) -> Result<bool> {
        let (salt, hash) = match (&settings.password_salt, &settings.password_hash) {
            (Some(salt), Some(hash)) => (salt, hash),
            _ => {
                return Err(AppError::config(
                    "encryption enabled but credential material is missing",
                ))
            }
        };
        password::verify_password(passphrase, salt, hash)
    }

    // ----- queries -----

    /// Newest-first history, decrypted for display where the session
    /// allows it. Also refreshes the session's recent-capture mirror so
    /// index-addressed paste agrees with what the caller just saw.
    pub fn get_history(&self, limit: i64) -> Result<Vec<ClipboardItem>> {
        let items = self.present_all(self.store.list_items(limit)?);
        lock_unpoisoned(&self.session).rebuild_mirror(items.clone());
        Ok(items)
    }

    pub fn search_history(&self, query: &str, limit: i64) -> Result<Vec<ClipboardItem>> {
        Ok(self.present_all(self.store.search(query, limit)?))
    }

    pub fn get_history_by_type(
        &self,
        item_type: ContentType,
        limit: i64,
    ) -> Result<Vec<ClipboardItem>> {
        Ok(self.present_all(self.store.list_items_by_type(item_type, limit)?))
    }

    pub fn get_favorites(&self, limit: i64) -> Result<Vec<ClipboardItem>> {
        Ok(self.present_all(self.store.list_favorites(limit)?))
    }

    pub fn get_item(&self, id: &str) -> Result<Option<ClipboardItem>> {
        Ok(self.store.get_item(id)?.map(|item| self.present(item)))
    }

    // ----- commands -----

    /// Store a piece of text as if it had been captured, classifying it
    /// and honoring the session's encryption state.
    pub fn save_text(&self, text: &str) -> Result<ClipboardItem> {
        if text.is_empty() {
            return Err(AppError::validation("cannot save empty text"));
        }

        let encrypt_with = {
            let session = lock_unpoisoned(&self.session);
            if session.encryption_enabled() {
                match session.password() {
                    Some(pw) => Some(pw.to_string()),
                    None => {
                        return Err(AppError::validation(
                            "session is locked; unlock before saving",
                        ))
                    }
                }
            } else {
                None
            }
        };

        let item_type = classify(text);
        let size = text.len() as i64;
        let new = match encrypt_with {
            Some(pw) => {
                let sealed = encryption::encrypt(text, &pw)?;
                NewItem {
                    content: sealed.content.clone(),
                    item_type,
                    timestamp: now_iso(),
                    size,
                    formats: vec!["text".to_string()],
                    is_encrypted: true,
                    encryption_data: Some(sealed.encryption_data()),
                    ..Default::default()
                }
            }
            None => NewItem {
                content: text.to_string(),
                item_type,
                timestamp: now_iso(),
                size,
                formats: vec!["text".to_string()],
                ..Default::default()
            },
        };

        let item = self.store.insert_item(new)?;
        lock_unpoisoned(&self.session).push_recent(item.clone());
        Ok(item)
    }

    /// Content edits are refused on encrypted rows: writing plaintext into
    /// the `content` column would desync it from the stored iv/auth_tag/salt
    /// and the row would never decrypt again. Metadata-only edits (title,
    /// favorite, group, tags) remain allowed.
    pub fn update_item(&self, id: &str, changes: ItemChanges) -> Result<bool> {
        if changes.content.is_some() {
            if let Some(item) = self.store.get_item(id)? {
                if item.is_encrypted {
                    return Err(AppError::validation(
                        "cannot edit the content of an encrypted item",
                    ));
                }
            }
        }
        self.store.update_item(id, changes)
    }

    pub fn delete_item(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete_item(id)?;
        if deleted {
            lock_unpoisoned(&self.session).remove_recent(id);
        }
        Ok(deleted)
    }

    pub fn clear_history(&self) -> Result<usize> {
        let count = self.store.clear_all()?;
        lock_unpoisoned(&self.session).clear_recent();
        Ok(count)
    }

    /// Flip the favorite flag and report the new state.
    pub fn toggle_favorite(&self, id: &str) -> Result<bool> {
        let item = self
            .store
            .get_item(id)?
            .ok_or_else(|| AppError::validation(format!("no item with id {}", id)))?;
        let next = !item.is_favorite;
        self.store.update_item(
            id,
            ItemChanges {
                is_favorite: Some(next),
                ..Default::default()
            },
        )?;
        Ok(next)
    }

    // ----- paste -----

    /// Write a stored item back to the system clipboard. Encrypted items
    /// require an unlocked session.
    pub fn paste_item(&mut self, id: &str) -> Result<()> {
        let item = self
            .store
            .get_item(id)?
            .ok_or_else(|| AppError::validation(format!("no item with id {}", id)))?;
        let presented = self.present(item);

        if presented.is_encrypted && presented.content == LOCKED_PLACEHOLDER {
            return Err(AppError::validation(
                "session is locked; unlock before pasting",
            ));
        }
        if presented.content == DECRYPT_FAILED_PLACEHOLDER {
            return Err(AppError::encryption("item cannot be decrypted"));
        }

        let image = presented
            .full_content
            .as_ref()
            .and_then(|bag| bag.image.clone());
        match (presented.item_type, image) {
            (ContentType::Image, Some(data_uri)) => self.writer.write_image(&data_uri),
            _ => self.writer.write_text(&presented.content),
        }
    }

    /// Paste the `index`-th most recent capture (0 = newest) using the
    /// session mirror for the id lookup.
    pub fn paste_from_history(&mut self, index: usize) -> Result<()> {
        let id = {
            let session = lock_unpoisoned(&self.session);
            session
                .recent(index)
                .map(|item| item.id.clone())
                .ok_or_else(|| {
                    AppError::validation(format!(
                        "history index {} out of range ({} entries)",
                        index,
                        session.recent_len()
                    ))
                })?
        };
        self.paste_item(&id)
    }

    // ----- groups -----

    pub fn create_group(&self, new: NewGroup) -> Result<Group> {
        self.store.create_group(new)
    }

    pub fn list_groups(&self) -> Result<Vec<Group>> {
        self.store.list_groups()
    }

    pub fn update_group(&self, id: &str, changes: GroupChanges) -> Result<bool> {
        self.store.update_group(id, changes)
    }

    pub fn delete_group(&self, id: &str) -> Result<bool> {
        self.store.delete_group(id)
    }

    /// Assign an item to a group, or `None` to ungroup it.
    pub fn move_item_to_group(&self, item_id: &str, group_id: Option<String>) -> Result<bool> {
        self.store.update_item(
            item_id,
            ItemChanges {
                group_id: Some(group_id),
                ..Default::default()
            },
        )
    }

    // ----- tags -----

    pub fn create_tag(&self, name: &str, color: Option<&str>) -> Result<Tag> {
        self.store.create_tag(name, color)
    }

    pub fn list_tags(&self) -> Result<Vec<Tag>> {
        self.store.list_tags()
    }

    pub fn delete_tag(&self, id: &str) -> Result<bool> {
        self.store.delete_tag(id)
    }

    pub fn tag_item(&self, item_id: &str, tag_name: &str) -> Result<()> {
        self.store.tag_item(item_id, tag_name)
    }

    pub fn untag_item(&self, item_id: &str, tag_name: &str) -> Result<bool> {
        self.store.untag_item(item_id, tag_name)
    }

    pub fn item_tags(&self, item_id: &str) -> Result<Vec<String>> {
        self.store.tags_for_item(item_id)
    }

    // ----- versions -----

    /// Snapshot an item's current content as a named version.
    pub fn create_version(&self, item_id: &str, note: Option<&str>) -> Result<Version> {
        let item = self
            .store
            .get_item(item_id)?
            .ok_or_else(|| AppError::validation(format!("no item with id {}", item_id)))?;
        self.store.add_version(item_id, &item.content, note)
    }

    pub fn list_versions(&self, item_id: &str) -> Result<Vec<Version>> {
        self.store.list_versions(item_id)
    }

    pub fn restore_version(&self, version_id: &str) -> Result<bool> {
        self.store.restore_version(version_id)
    }

    // ----- ocr -----

    /// Run text recognition over a stored image item.
    pub fn recognize_item_text(&mut self, id: &str, languages: Option<&str>) -> Result<String> {
        let recognizer = self
            .recognizer
            .as_mut()
            .ok_or_else(|| AppError::config("no OCR engine configured"))?;

        let item = self
            .store
            .get_item(id)?
            .ok_or_else(|| AppError::validation(format!("no item with id {}", id)))?;
        if item.item_type != ContentType::Image {
            return Err(AppError::validation("item is not an image"));
        }
        let data_uri = item
            .full_content
            .as_ref()
            .and_then(|bag| bag.image.as_deref())
            .ok_or_else(|| AppError::validation("item has no stored image data"))?;
        let bytes = decode_base64_payload(data_uri)?;

        recognizer.recognize(&bytes, languages.unwrap_or(DEFAULT_OCR_LANGUAGES))
    }

    // ----- presentation -----

    fn present_all(&self, items: Vec<ClipboardItem>) -> Vec<ClipboardItem> {
        items.into_iter().map(|item| self.present(item)).collect()
    }

    /// Decrypt one row for display when the session allows it. Locked
    /// sessions see a placeholder with richer representations withheld;
    /// undecryptable rows get a per-row failure marker rather than
    /// poisoning the whole listing.
    fn present(&self, mut item: ClipboardItem) -> ClipboardItem {
        if !item.is_encrypted {
            return item;
        }

        let session = lock_unpoisoned(&self.session);
        match (session.password(), &item.encryption_data) {
            (Some(pw), Some(data)) => {
                let payload = EncryptedPayload::from_parts(item.content.clone(), data);
                match encryption::decrypt(&payload, pw) {
                    Ok(plaintext) => item.content = plaintext,
                    Err(e) => {
                        warn!("failed to decrypt item {}: {}", item.id, e);
                        item.content = DECRYPT_FAILED_PLACEHOLDER.to_string();
                    }
                }
            }
            (Some(_), None) => {
                // Flag set without parameters: the row is unreadable.
                item.content = DECRYPT_FAILED_PLACEHOLDER.to_string();
            }
            (None, _) if session.encryption_enabled() => {
                item.content = LOCKED_PLACEHOLDER.to_string();
                item.full_content = None;
            }
            (None, _) => {
                // Encryption has since been disabled; the key material for
                // this row is gone.
                item.content = DECRYPT_FAILED_PLACEHOLDER.to_string();
            }
        }
        item
    }
}

fn decode_base64_payload(data_uri: &str) -> Result<Vec<u8>> {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine;

    let payload = data_uri
        .split_once(";base64,")
        .map(|(_, b64)| b64)
        .ok_or_else(|| AppError::validation("image content is not a base64 data uri"))?;
    BASE64
        .decode(payload)
        .map_err(|e| AppError::validation(format!("invalid base64 image payload: {}", e)))
}
