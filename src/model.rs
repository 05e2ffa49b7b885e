use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Discriminator for entries in a verse's word sequence.
///
/// Only `Word` entries are lexical words with an audio segment. Everything
/// else (verse-end markers, pause marks, sajdah signs) is a decorative glyph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CharType {
    Word,
    Other(String),
}

impl CharType {
    pub fn is_word(&self) -> bool {
        matches!(self, CharType::Word)
    }
}

impl From<String> for CharType {
    fn from(s: String) -> Self {
        if s == "word" {
            CharType::Word
        } else {
            CharType::Other(s)
        }
    }
}

impl From<CharType> for String {
    fn from(c: CharType) -> Self {
        match c {
            CharType::Word => "word".to_string(),
            CharType::Other(s) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub position: u32,
    pub code: String,
    pub line_num: u32,
    pub char_type: CharType,
    #[serde(default)]
    pub text_madani: Option<String>,
    #[serde(default)]
    pub translation: Option<String>,
    #[serde(default)]
    pub transliteration: Option<String>,
}

impl Word {
    /// Text shown for this entry: the Madani text when present, the glyph code otherwise
    pub fn display_text(&self) -> &str {
        self.text_madani.as_deref().unwrap_or(&self.code)
    }

    /// Stable key for this entry within its verse
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.position, self.code, self.line_num)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: u64,
    pub resource_id: u64,
    pub text: String,
    #[serde(default)]
    pub resource_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub verse_key: String,
    pub chapter_id: u32,
    pub verse_number: u32,
    #[serde(default)]
    pub words: Option<Vec<Word>>,
    pub text_madani: String,
    #[serde(default)]
    pub translations: Option<Vec<Translation>>,
}

impl Verse {
    /// Resource ids of the verse's own translations, in order
    pub fn translation_resource_ids(&self) -> Vec<u64> {
        self.translations
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(|t| t.resource_id)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: u32,
    pub name_simple: String,
    #[serde(default)]
    pub name_arabic: Option<String>,
    #[serde(default)]
    pub verses_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tafsir {
    pub id: u64,
    pub name: String,
}

/// Which word annotation is shown next to the word under the audio cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TooltipKind {
    #[default]
    Translation,
    Transliteration,
}

impl TooltipKind {
    pub fn annotation<'a>(&self, word: &'a Word) -> Option<&'a str> {
        match self {
            TooltipKind::Translation => word.translation.as_deref(),
            TooltipKind::Transliteration => word.transliteration.as_deref(),
        }
    }
}

/// One chapter as stored in a data file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChapterData {
    pub chapter: Chapter,
    pub verses: Vec<Arc<Verse>>,
    #[serde(default)]
    pub tafsirs: Vec<Tafsir>,
}

impl ChapterData {
    pub fn from_json(content: &str) -> Result<Self> {
        let data: ChapterData = serde_json::from_str(content)?;
        Ok(data)
    }

    pub fn find_verse(&self, chapter_id: u32, verse_number: u32) -> Option<usize> {
        find_verse(&self.verses, chapter_id, verse_number)
    }
}

/// Index of a verse by chapter and number
pub fn find_verse(verses: &[Arc<Verse>], chapter_id: u32, verse_number: u32) -> Option<usize> {
    verses
        .iter()
        .position(|v| v.chapter_id == chapter_id && v.verse_number == verse_number)
}

pub async fn load_chapter(path: &Path) -> Result<ChapterData> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read chapter data from {}", path.display()))?;
    let data = ChapterData::from_json(&content)
        .with_context(|| format!("Invalid chapter data in {}", path.display()))?;

    tracing::info!(
        chapter = data.chapter.id,
        verses = data.verses.len(),
        tafsirs = data.tafsirs.len(),
        "Loaded chapter"
    );

    Ok(data)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn word(position: u32, code: &str, char_type: &str) -> Word {
        Word {
            position,
            code: code.to_string(),
            line_num: 2,
            char_type: CharType::from(char_type.to_string()),
            text_madani: None,
            translation: Some(format!("gloss-{}", position)),
            transliteration: Some(format!("translit-{}", position)),
        }
    }

    pub fn translation(id: u64, resource_id: u64, text: &str) -> Translation {
        Translation {
            id,
            resource_id,
            text: text.to_string(),
            resource_name: Some(format!("Resource {}", resource_id)),
        }
    }

    pub fn verse_2_5() -> Arc<Verse> {
        Arc::new(Verse {
            verse_key: "2:5".to_string(),
            chapter_id: 2,
            verse_number: 5,
            words: Some(vec![
                word(1, "w1", "word"),
                word(2, "w2", "word"),
                word(3, "w3", "word"),
                word(4, "end", "end"),
            ]),
            text_madani: "أُولَٰئِكَ عَلَىٰ هُدًى مِنْ رَبِّهِمْ".to_string(),
            translations: Some(vec![
                translation(10, 131, "Those are upon guidance from their Lord"),
                translation(11, 20, "They are on true guidance"),
            ]),
        })
    }

    pub fn plain_verse(key: &str) -> Arc<Verse> {
        let (chapter, number) = key.split_once(':').unwrap();
        Arc::new(Verse {
            verse_key: key.to_string(),
            chapter_id: chapter.parse().unwrap(),
            verse_number: number.parse().unwrap(),
            words: None,
            text_madani: format!("نص {}", key),
            translations: None,
        })
    }

    pub fn chapter() -> Chapter {
        Chapter {
            id: 2,
            name_simple: "Al-Baqarah".to_string(),
            name_arabic: Some("البقرة".to_string()),
            verses_count: 286,
        }
    }
}
