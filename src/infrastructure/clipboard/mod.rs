//! Clipboard access ports. The capture loop and paste paths talk to these
//! traits so tests can substitute an in-memory clipboard.

pub mod memory;
pub mod system;

use crate::core::ContentBag;
use crate::error::Result;

/// Read side of the system clipboard. Reading never fails: formats that
/// cannot be fetched are simply absent from the returned bag.
pub trait ClipboardReader: Send {
    fn read(&mut self) -> ContentBag;
}

/// Write side of the system clipboard, used by the paste commands.
pub trait ClipboardWriter: Send {
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// `data_uri` is a `data:image/...;base64,` payload as stored in
    /// history image items.
    fn write_image(&mut self, data_uri: &str) -> Result<()>;
}

pub use memory::MemoryClipboard;
pub use system::SystemClipboard;
