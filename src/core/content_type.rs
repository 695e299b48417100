use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Clipboard content type.
///
/// Automatic capture only ever produces the first five variants; the rest
/// are applied by the user through tagging/update operations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    #[default]
    Text,
    Html,
    Rtf,
    Image,
    Url,
    Code,
    File,
    Shortcut,
    Password,
    Office,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Html => "html",
            ContentType::Rtf => "rtf",
            ContentType::Image => "image",
            ContentType::Url => "url",
            ContentType::Code => "code",
            ContentType::File => "file",
            ContentType::Shortcut => "shortcut",
            ContentType::Password => "password",
            ContentType::Office => "office",
        }
    }

    /// Parse a stored type string, falling back to `Text` for anything
    /// unrecognized so that one odd row never fails a listing.
    pub fn parse_lossy(s: &str) -> ContentType {
        ContentType::try_from(s).unwrap_or(ContentType::Text)
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for ContentType {
    type Error = String;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "text" => Ok(ContentType::Text),
            "html" => Ok(ContentType::Html),
            "rtf" => Ok(ContentType::Rtf),
            "image" => Ok(ContentType::Image),
            "url" => Ok(ContentType::Url),
            "code" => Ok(ContentType::Code),
            "file" => Ok(ContentType::File),
            "shortcut" => Ok(ContentType::Shortcut),
            "password" => Ok(ContentType::Password),
            "office" => Ok(ContentType::Office),
            _ => Err(format!("invalid content type: {}", s)),
        }
    }
}

impl From<ContentType> for String {
    fn from(content_type: ContentType) -> Self {
        content_type.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_strings() {
        for ct in [
            ContentType::Text,
            ContentType::Html,
            ContentType::Rtf,
            ContentType::Image,
            ContentType::Url,
            ContentType::Code,
            ContentType::File,
            ContentType::Shortcut,
            ContentType::Password,
            ContentType::Office,
        ] {
            assert_eq!(ContentType::try_from(ct.as_str()), Ok(ct));
        }
    }

    #[test]
    fn test_parse_lossy_falls_back_to_text() {
        assert_eq!(ContentType::parse_lossy("spreadsheet"), ContentType::Text);
        assert_eq!(ContentType::parse_lossy(""), ContentType::Text);
        assert_eq!(ContentType::parse_lossy("url"), ContentType::Url);
    }
}
