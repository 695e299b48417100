use lazy_static::lazy_static;
use regex::Regex;

use crate::core::content_type::ContentType;

lazy_static! {
    /// HTML root-tag marker, case-insensitive. Matches `<html`, `<HTML`,
    /// `<Html ...` anywhere in the string.
    static ref HTML_MARKER_REGEX: Regex = Regex::new(r"(?i)<html").unwrap();
}

/// Prefix every image data-URI starts with.
const IMAGE_DATA_URI_PREFIX: &str = "data:image/";

/// RTF stream header marker.
const RTF_MARKER: &str = "{\\rtf";

/// Classify a raw textual clipboard payload by syntactic cues.
///
/// Total function: every string has a defined classification and no rule can
/// fail. The checks are order-sensitive and the order is the tie-break:
/// image beats everything, HTML beats URL, and anything unmatched is text.
/// Only produces the five capture-time types; the richer types (`code`,
/// `password`, ...) are applied later via update operations.
pub fn classify(content: &str) -> ContentType {
    if content.starts_with(IMAGE_DATA_URI_PREFIX) {
        return ContentType::Image;
    }
    if HTML_MARKER_REGEX.is_match(content) {
        return ContentType::Html;
    }
    if content.contains(RTF_MARKER) {
        return ContentType::Rtf;
    }
    if content.contains("http://") || content.contains("https://") {
        return ContentType::Url;
    }
    ContentType::Text
}
