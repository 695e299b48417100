pub mod clipboard;
pub mod ocr;
pub mod security;
pub mod storage;
