use std::sync::Arc;

use crate::actions::{AudioActions, BookmarkActions, TafsirLoader};
use crate::messages::MessageFormatter;
use crate::model::{Chapter, TooltipKind, Translation, Verse};

/// Everything a verse view reads for one render pass
#[derive(Debug, Clone, Copy)]
pub struct VerseProps<'a> {
    pub verse: &'a Arc<Verse>,
    pub chapter: &'a Chapter,
    /// Rendered as a search result
    pub is_searched: bool,
    /// Rendered for PDF export
    pub is_pdf: bool,
    pub is_playing: bool,
    pub is_current_verse: bool,
    pub bookmarked: bool,
    pub is_authenticated: bool,
    pub current_verse: Option<&'a str>,
    pub current_word: Option<u32>,
    pub tooltip: TooltipKind,
    /// Translations that matched a search, shown instead of the verse's own
    pub matches: Option<&'a [Translation]>,
    pub is_focused: bool,
}

impl<'a> VerseProps<'a> {
    /// Props for a plain chapter reading with nothing playing
    pub fn new(verse: &'a Arc<Verse>, chapter: &'a Chapter) -> Self {
        Self {
            verse,
            chapter,
            is_searched: false,
            is_pdf: false,
            is_playing: false,
            is_current_verse: false,
            bookmarked: false,
            is_authenticated: false,
            current_verse: None,
            current_word: None,
            tooltip: TooltipKind::default(),
            matches: None,
            is_focused: false,
        }
    }

    /// Whether this verse is the one audio is currently playing
    pub fn is_verse_playing(&self) -> bool {
        self.current_verse == Some(self.verse.verse_key.as_str()) && self.is_playing
    }
}

/// Collaborators injected by the host
#[derive(Clone, Copy)]
pub struct VerseHandlers<'a> {
    pub audio: &'a dyn AudioActions,
    pub bookmarks: &'a dyn BookmarkActions,
    pub tafsirs: &'a dyn TafsirLoader,
    pub messages: &'a dyn MessageFormatter,
}

/// Snapshot of the props that decide whether a verse is rebuilt.
///
/// Only the verse reference, bookmark state, tooltip mode, current word,
/// current-verse flag and the match count are compared. A match list whose
/// contents change at the same length does not trigger a rebuild, and neither
/// do playback, search or PDF flag changes on their own.
#[derive(Debug, Clone)]
pub struct RenderKey {
    verse: Arc<Verse>,
    bookmarked: bool,
    tooltip: TooltipKind,
    current_word: Option<u32>,
    is_current_verse: bool,
    match_len: Option<usize>,
}

impl RenderKey {
    pub fn from_props(props: &VerseProps<'_>) -> Self {
        Self {
            verse: Arc::clone(props.verse),
            bookmarked: props.bookmarked,
            tooltip: props.tooltip,
            current_word: props.current_word,
            is_current_verse: props.is_current_verse,
            match_len: props.matches.map(<[Translation]>::len),
        }
    }

    pub fn should_update(prev: &RenderKey, next: &RenderKey) -> bool {
        let mut changed = !Arc::ptr_eq(&prev.verse, &next.verse)
            || prev.bookmarked != next.bookmarked
            || prev.tooltip != next.tooltip
            || prev.current_word != next.current_word
            || prev.is_current_verse != next.is_current_verse;

        // Only compared when the previous render had a match list
        if prev.match_len.is_some() {
            changed |= prev.match_len != next.match_len;
        }

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    fn key(props: &VerseProps<'_>) -> RenderKey {
        RenderKey::from_props(props)
    }

    #[test]
    fn test_identical_props_skip_update() {
        let verse = fixtures::verse_2_5();
        let chapter = fixtures::chapter();
        let props = VerseProps {
            bookmarked: true,
            current_word: Some(2),
            ..VerseProps::new(&verse, &chapter)
        };

        assert!(!RenderKey::should_update(&key(&props), &key(&props)));
    }

    #[test]
    fn test_each_guarded_field_triggers_update() {
        let verse = fixtures::verse_2_5();
        let chapter = fixtures::chapter();
        let base = VerseProps::new(&verse, &chapter);
        let prev = key(&base);

        let bookmarked = VerseProps { bookmarked: true, ..base };
        let tooltip = VerseProps { tooltip: TooltipKind::Transliteration, ..base };
        let word = VerseProps { current_word: Some(0), ..base };
        let current = VerseProps { is_current_verse: true, ..base };

        for next in [bookmarked, tooltip, word, current] {
            assert!(RenderKey::should_update(&prev, &key(&next)));
        }
    }

    #[test]
    fn test_verse_compared_by_reference() {
        let verse = fixtures::verse_2_5();
        let same_content = Arc::new((*verse).clone());
        let chapter = fixtures::chapter();

        let prev = key(&VerseProps::new(&verse, &chapter));
        let next = key(&VerseProps::new(&same_content, &chapter));
        assert!(RenderKey::should_update(&prev, &next));
    }

    #[test]
    fn test_unguarded_flags_do_not_update() {
        let verse = fixtures::verse_2_5();
        let chapter = fixtures::chapter();
        let base = VerseProps::new(&verse, &chapter);
        let next = VerseProps {
            is_playing: true,
            is_pdf: true,
            is_authenticated: true,
            current_verse: Some("2:5"),
            ..base
        };

        assert!(!RenderKey::should_update(&key(&base), &key(&next)));
    }

    #[test]
    fn test_match_length_only_counts_when_previously_present() {
        let verse = fixtures::verse_2_5();
        let chapter = fixtures::chapter();
        let one = vec![fixtures::translation(1, 131, "a")];
        let other_one = vec![fixtures::translation(2, 20, "b")];
        let two = vec![
            fixtures::translation(1, 131, "a"),
            fixtures::translation(2, 20, "b"),
        ];
        let base = VerseProps::new(&verse, &chapter);

        let with_one = VerseProps { matches: Some(&one), ..base };
        let with_other = VerseProps { matches: Some(&other_one), ..base };
        let with_two = VerseProps { matches: Some(&two), ..base };

        assert!(RenderKey::should_update(&key(&with_one), &key(&with_two)));
        assert!(RenderKey::should_update(&key(&with_one), &key(&base)));
        // Same length, different content
        assert!(!RenderKey::should_update(&key(&with_one), &key(&with_other)));
        // No list before: the new list is not looked at
        assert!(!RenderKey::should_update(&key(&base), &key(&with_two)));
    }

    #[test]
    fn test_is_verse_playing() {
        let verse = fixtures::verse_2_5();
        let chapter = fixtures::chapter();
        let base = VerseProps::new(&verse, &chapter);

        assert!(!base.is_verse_playing());
        assert!(!VerseProps { current_verse: Some("2:5"), ..base }.is_verse_playing());
        assert!(!VerseProps { current_verse: Some("2:6"), is_playing: true, ..base }.is_verse_playing());
        assert!(VerseProps { current_verse: Some("2:5"), is_playing: true, ..base }.is_verse_playing());
    }
}
