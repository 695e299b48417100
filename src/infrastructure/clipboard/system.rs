use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use clipboard_rs::common::RustImage;
use clipboard_rs::{Clipboard, ClipboardContext, ContentFormat, RustImageData};
use log::warn;

use crate::core::{ContentBag, ImageSize};
use crate::error::{AppError, Result};

use super::{ClipboardReader, ClipboardWriter};

/// Real OS clipboard behind `clipboard_rs`.
pub struct SystemClipboard {
    ctx: ClipboardContext,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let ctx = ClipboardContext::new()
            .map_err(|e| AppError::clipboard(format!("failed to open system clipboard: {}", e)))?;
        Ok(Self { ctx })
    }
}

impl ClipboardReader for SystemClipboard {
    fn read(&mut self) -> ContentBag {
        let mut bag = ContentBag::empty();

        if self.ctx.has(ContentFormat::Text) {
            if let Ok(text) = self.ctx.get_text() {
                if !text.is_empty() {
                    bag.formats.push("text".to_string());
                    bag.text = Some(text);
                }
            }
        }

        if self.ctx.has(ContentFormat::Html) {
            if let Ok(html) = self.ctx.get_html() {
                if !html.is_empty() {
                    bag.formats.push("html".to_string());
                    bag.html = Some(html);
                }
            }
        }

        if self.ctx.has(ContentFormat::Rtf) {
            if let Ok(rtf) = self.ctx.get_rich_text() {
                if !rtf.is_empty() {
                    bag.formats.push("rtf".to_string());
                    bag.rtf = Some(rtf);
                }
            }
        }

        if self.ctx.has(ContentFormat::Image) {
            if let Ok(img) = self.ctx.get_image() {
                let (width, height) = img.get_size();
                match img.to_png() {
                    Ok(png) => {
                        bag.formats.push("image".to_string());
                        bag.image = Some(format!(
                            "data:image/png;base64,{}",
                            BASE64.encode(png.get_bytes())
                        ));
                        bag.image_size = Some(ImageSize { width, height });
                    }
                    Err(e) => warn!("failed to encode clipboard image as png: {}", e),
                }
            }
        }

        bag
    }
}

impl ClipboardWriter for SystemClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        self.ctx
            .set_text(text.to_string())
            .map_err(|e| AppError::clipboard(format!("failed to write text: {}", e)))
    }

    fn write_image(&mut self, data_uri: &str) -> Result<()> {
        let bytes = decode_data_uri(data_uri)?;
        let img = RustImageData::from_bytes(&bytes)
            .map_err(|e| AppError::clipboard(format!("invalid image data: {}", e)))?;
        self.ctx
            .set_image(img)
            .map_err(|e| AppError::clipboard(format!("failed to write image: {}", e)))
    }
}

fn decode_data_uri(data_uri: &str) -> Result<Vec<u8>> {
    let payload = data_uri
        .split_once(";base64,")
        .map(|(_, b64)| b64)
        .ok_or_else(|| AppError::clipboard("image content is not a base64 data uri"))?;
    BASE64
        .decode(payload)
        .map_err(|e| AppError::clipboard(format!("invalid base64 image payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_data_uri_extracts_payload() {
        let uri = format!("data:image/png;base64,{}", BASE64.encode(b"png-bytes"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"png-bytes");
    }

    #[test]
    fn decode_data_uri_rejects_plain_text() {
        assert!(decode_data_uri("hello world").is_err());
    }
}
