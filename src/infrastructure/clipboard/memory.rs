use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::core::ContentBag;
use crate::error::Result;

use super::{ClipboardReader, ClipboardWriter};

/// In-memory clipboard double. Reads pop from a queue of scripted bags
/// (repeating the last one once the queue drains, like a real clipboard
/// that keeps its content); writes are recorded for assertions.
#[derive(Clone, Default)]
pub struct MemoryClipboard {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    queued: VecDeque<ContentBag>,
    current: ContentBag,
    written_text: Vec<String>,
    written_images: Vec<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a bag to be returned by a subsequent `read`.
    pub fn push(&self, bag: ContentBag) {
        let mut state = self.lock();
        state.queued.push_back(bag);
    }

    pub fn push_text(&self, text: &str) {
        let mut bag = ContentBag::empty();
        bag.formats.push("text".to_string());
        bag.text = Some(text.to_string());
        self.push(bag);
    }

    pub fn written_text(&self) -> Vec<String> {
        self.lock().written_text.clone()
    }

    pub fn written_images(&self) -> Vec<String> {
        self.lock().written_images.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl ClipboardReader for MemoryClipboard {
    fn read(&mut self) -> ContentBag {
        let mut state = self.lock();
        if let Some(next) = state.queued.pop_front() {
            state.current = next;
        }
        state.current.clone()
    }
}

impl ClipboardWriter for MemoryClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut state = self.lock();
        state.written_text.push(text.to_string());
        let mut bag = ContentBag::empty();
        bag.formats.push("text".to_string());
        bag.text = Some(text.to_string());
        state.current = bag;
        Ok(())
    }

    fn write_image(&mut self, data_uri: &str) -> Result<()> {
        let mut state = self.lock();
        state.written_images.push(data_uri.to_string());
        Ok(())
    }
}
