use crate::model::{Translation, Word};
use crate::routing::anchor_name;
use crate::messages::MessageFormatter;

use super::controls::{controls, Control};
use super::props::VerseProps;

/// Audio segment index for each entry of a word sequence.
///
/// The counter only advances on `word` entries, so glyphs get `None` and the
/// n-th word gets the number of words before it.
pub fn word_audio_positions(words: &[Word]) -> Vec<Option<u32>> {
    let mut next = 0u32;
    words
        .iter()
        .map(|word| {
            if word.char_type.is_word() {
                let position = next;
                next += 1;
                Some(position)
            } else {
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWord {
    pub key: String,
    pub text: String,
    pub audio_position: Option<u32>,
    pub highlighted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArabicText {
    Words(Vec<RenderedWord>),
    Plain(String),
}

pub fn arabic_text(props: &VerseProps<'_>) -> ArabicText {
    let verse = props.verse;
    let Some(words) = verse.words.as_deref() else {
        return ArabicText::Plain(verse.text_madani.clone());
    };

    let is_audio_verse = props.current_verse == Some(verse.verse_key.as_str());
    let rendered = words
        .iter()
        .zip(word_audio_positions(words))
        .map(|(word, audio_position)| RenderedWord {
            key: word.key(),
            text: word.display_text().to_string(),
            audio_position,
            highlighted: is_audio_verse
                && audio_position.is_some()
                && audio_position == props.current_word,
        })
        .collect();

    ArabicText::Words(rendered)
}

/// Annotation for the word under the audio cursor, if it has one
pub fn word_tooltip(props: &VerseProps<'_>) -> Option<String> {
    if props.current_verse != Some(props.verse.verse_key.as_str()) {
        return None;
    }
    let current = props.current_word?;
    let words = props.verse.words.as_deref()?;

    words
        .iter()
        .zip(word_audio_positions(words))
        .find(|(_, position)| *position == Some(current))
        .and_then(|(word, _)| props.tooltip.annotation(word))
        .map(str::to_string)
}

/// Search matches when given, else the verse's own translations
pub fn translations_to_render<'a>(props: &VerseProps<'a>) -> &'a [Translation] {
    match props.matches {
        Some(matches) => matches,
        None => props.verse.translations.as_deref().unwrap_or_default(),
    }
}

/// The full render decision for one verse
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseTree {
    /// Scroll anchor for deep links
    pub anchor: String,
    pub verse_key: String,
    pub highlighted: bool,
    pub controls: Vec<Control>,
    pub arabic: ArabicText,
    pub tooltip: Option<String>,
    pub translations: Vec<Translation>,
}

impl VerseTree {
    pub fn build(props: &VerseProps<'_>, messages: &dyn MessageFormatter) -> Self {
        Self {
            anchor: anchor_name(&props.verse.verse_key),
            verse_key: props.verse.verse_key.clone(),
            highlighted: props.is_current_verse,
            controls: controls(props, messages),
            arabic: arabic_text(props),
            tooltip: word_tooltip(props),
            // Only verses that carry their own translations show any, matches included
            translations: match props.verse.translations {
                Some(_) => translations_to_render(props).to_vec(),
                None => Vec::new(),
            },
        }
    }
}

/// Greedy word wrap. Never breaks inside a word; an over-long word gets its own line.
pub fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();

        if current_len == 0 {
            current_line = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current_line.push(' ');
            current_line.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current_line));
            current_line = word.to_string();
            current_len = word_len;
        }
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

/// Like `wrap_text_to_width`, but over pre-split items, returning index ranges per line
pub fn wrap_items(widths: &[usize], width: usize) -> Vec<std::ops::Range<usize>> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut current_len = 0;

    for (i, &w) in widths.iter().enumerate() {
        if i == start {
            current_len = w;
        } else if width == 0 || current_len + 1 + w <= width {
            current_len += 1 + w;
        } else {
            lines.push(start..i);
            start = i;
            current_len = w;
        }
    }

    if start < widths.len() || lines.is_empty() {
        lines.push(start..widths.len());
    }

    lines
}
