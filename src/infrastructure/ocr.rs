use crate::error::Result;

/// Text extraction from image bytes. The desktop build wires this to an
/// external OCR engine; headless and test builds leave it unset.
pub trait TextRecognizer: Send {
    /// `languages` follows the tesseract convention, e.g. "chi_sim+eng".
    fn recognize(&mut self, image: &[u8], languages: &str) -> Result<String>;
}

pub const DEFAULT_OCR_LANGUAGES: &str = "chi_sim+eng";
