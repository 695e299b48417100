use serde::{Deserialize, Serialize};

use crate::core::content_detector::classify;
use crate::core::content_type::ContentType;

/// Pixel dimensions reported alongside an image representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// The multi-format payload read from the OS clipboard in one capture tick.
///
/// `formats` is the ordered list of OS-reported format identifiers; the
/// optional fields hold whichever representations were actually readable.
/// Images are carried as PNG data-URIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBag {
    pub formats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rtf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_size: Option<ImageSize>,
}

impl ContentBag {
    /// A bag with no formats, returned by readers on clipboard failure.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }

    /// Serialized form used both as the dedup comparator between ticks and
    /// as the fallback `content` when no plain-text representation exists.
    /// Struct field order makes this deterministic for identical bags.
    pub fn fingerprint(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The primary textual representation, if any.
    pub fn primary_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Resolve the capture-time content type. OS format hints take priority
    /// over syntactic classification when richer formats coexist with plain
    /// text: image beats html beats rtf. Without a hint, the classifier
    /// decides from the primary text (or the serialized bag).
    pub fn resolve_type(&self) -> ContentType {
        if self.formats.iter().any(|f| f == "image") {
            return ContentType::Image;
        }
        if self.formats.iter().any(|f| f == "html") {
            return ContentType::Html;
        }
        if self.formats.iter().any(|f| f == "rtf") {
            return ContentType::Rtf;
        }
        match self.primary_text() {
            Some(text) => classify(text),
            None => classify(&self.fingerprint()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_bag(text: &str) -> ContentBag {
        ContentBag {
            formats: vec!["text".to_string()],
            text: Some(text.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_fingerprint_stable_for_identical_bags() {
        let a = text_bag("hello");
        let b = text_bag("hello");
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_fingerprint_differs_for_different_content() {
        assert_ne!(text_bag("a").fingerprint(), text_bag("b").fingerprint());
    }

    #[test]
    fn test_format_hints_beat_plain_text() {
        let bag = ContentBag {
            formats: vec!["text".to_string(), "html".to_string()],
            text: Some("plain".to_string()),
            html: Some("<b>rich</b>".to_string()),
            ..Default::default()
        };
        assert_eq!(bag.resolve_type(), ContentType::Html);

        let bag = ContentBag {
            formats: vec!["text".into(), "html".into(), "image".into()],
            text: Some("plain".to_string()),
            ..Default::default()
        };
        assert_eq!(bag.resolve_type(), ContentType::Image);
    }

    #[test]
    fn test_no_hint_uses_classifier() {
        assert_eq!(
            text_bag("https://example.com").resolve_type(),
            ContentType::Url
        );
        assert_eq!(text_bag("hello").resolve_type(), ContentType::Text);
    }

    #[test]
    fn test_empty_bag() {
        let bag = ContentBag::empty();
        assert!(bag.is_empty());
        assert_eq!(bag.primary_text(), None);
    }
}
