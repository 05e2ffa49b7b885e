use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// A localizable message: catalogue id plus the English default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageId {
    pub id: &'static str,
    pub default: &'static str,
}

pub const PLAY: MessageId = MessageId { id: "actions.play", default: "Play" };
pub const PAUSE: MessageId = MessageId { id: "actions.pause", default: "Pause" };
pub const COPY: MessageId = MessageId { id: "actions.copy", default: "Copy" };
pub const COPIED: MessageId = MessageId { id: "actions.copied", default: "Copied!" };
pub const TAFSIR: MessageId = MessageId { id: "actions.tafsir", default: "Tafsir" };
pub const TAFSIR_SELECT: MessageId = MessageId { id: "tafsir.select", default: "Select a tafsir" };
pub const BOOKMARK: MessageId = MessageId { id: "verse.bookmark", default: "Bookmark" };
pub const BOOKMARKED: MessageId = MessageId { id: "verse.bookmarked", default: "Bookmarked" };
pub const SHARE: MessageId = MessageId { id: "actions.share", default: "Share" };

pub trait MessageFormatter {
    fn format(&self, id: &str, default: &str) -> String;

    fn text(&self, message: MessageId) -> String {
        self.format(message.id, message.default)
    }
}

/// Always answers with the default text
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageFormatter for DefaultMessages {
    fn format(&self, _id: &str, default: &str) -> String {
        default.to_string()
    }
}

/// Flat `{ "message.id": "text" }` catalogue for one locale
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct Messages {
    entries: HashMap<String, String>,
}

impl Messages {
    pub fn from_json(content: &str) -> Result<Self> {
        let messages: Messages = serde_json::from_str(content)?;
        Ok(messages)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read locale file {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Invalid locale file {}", path.display()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl MessageFormatter for Messages {
    fn format(&self, id: &str, default: &str) -> String {
        self.entries
            .get(id)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_messages_use_default_text() {
        assert_eq!(DefaultMessages.text(PLAY), "Play");
        assert_eq!(DefaultMessages.text(BOOKMARKED), "Bookmarked");
    }

    #[test]
    fn test_catalogue_overrides_and_falls_back() {
        let messages = Messages::from_json(r#"{ "actions.play": "تشغيل" }"#).unwrap();
        assert_eq!(messages.text(PLAY), "تشغيل");
        assert_eq!(messages.text(PAUSE), "Pause");
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "tafsir.select": "Choisir un tafsir" }"#).unwrap();

        let messages = Messages::load(file.path()).unwrap();
        assert_eq!(messages.text(TAFSIR_SELECT), "Choisir un tafsir");
    }

    #[test]
    fn test_load_rejects_non_string_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{ "actions.play": 3 }"#).unwrap();

        assert!(Messages::load(file.path()).is_err());
    }
}
