use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

use verse_view::verse_view::word_audio_positions;
use verse_view::{
    find_verse, Activation, ActionDispatcher, Chapter, ChapterData, Config, ControlKind, Messages,
    Tafsir, Translation, Verse, VerseAction, VerseProps, VerseRoute, VerseView, VerseWidgets,
};

/// Simulated audio engine state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Playback {
    pub current_verse: Option<String>,
    pub is_playing: bool,
    pub current_word: Option<u32>,
}

#[derive(Debug)]
pub struct TafsirPicker {
    pub verse_key: String,
    pub prompt: String,
    pub state: ListState,
}

/// How the chapter is being presented
#[derive(Debug, Clone, Default)]
pub struct ReaderOptions {
    pub search: Option<String>,
    pub searched: bool,
    pub pdf: bool,
}

/// Everything verse props are read from
pub struct ReaderState {
    pub should_quit: bool,

    // Data
    pub chapter: Chapter,
    pub verses: Vec<Arc<Verse>>,
    pub matches: Vec<Option<Vec<Translation>>>,
    pub tafsirs: Vec<Tafsir>,

    // Presentation
    pub is_searched: bool,
    pub is_pdf: bool,
    pub selected: usize,
    pub first_visible: usize,
    pub status: Option<String>,
    pub tafsir_picker: Option<TafsirPicker>,

    // Upstream state owned by the host
    pub playback: Playback,
    pub config: Config,
    pub config_path: PathBuf,
}

impl ReaderState {
    pub fn new(data: ChapterData, config: Config, config_path: PathBuf, options: &ReaderOptions) -> Self {
        let (verses, matches) = match &options.search {
            Some(query) => filter_verses(data.verses, query),
            None => {
                let n = data.verses.len();
                (data.verses, vec![None; n])
            }
        };

        Self {
            should_quit: false,
            chapter: data.chapter,
            verses,
            matches,
            tafsirs: data.tafsirs,
            is_searched: options.searched || options.search.is_some(),
            is_pdf: options.pdf,
            selected: 0,
            first_visible: 0,
            status: None,
            tafsir_picker: None,
            playback: Playback::default(),
            config,
            config_path,
        }
    }

    pub fn props(&self, idx: usize) -> VerseProps<'_> {
        let verse = &self.verses[idx];
        let current_verse = self.playback.current_verse.as_deref();
        let is_current_verse = current_verse == Some(verse.verse_key.as_str());

        VerseProps {
            verse,
            chapter: &self.chapter,
            is_searched: self.is_searched,
            is_pdf: self.is_pdf,
            is_playing: self.playback.is_playing,
            is_current_verse,
            bookmarked: self.config.is_bookmarked(&verse.verse_key),
            is_authenticated: self.config.is_authenticated(),
            current_verse,
            // Only the playing verse tracks the word cursor
            current_word: if is_current_verse { self.playback.current_word } else { None },
            tooltip: self.config.tooltip,
            matches: self.matches.get(idx).and_then(|m| m.as_deref()),
            is_focused: idx == self.selected && self.tafsir_picker.is_none(),
        }
    }

    // Verse selection
    pub fn select_next(&mut self) {
        let len = self.verses.len();
        if len > 0 {
            self.selected = (self.selected + 1).min(len - 1);
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
    }

    pub fn select_last(&mut self) {
        self.selected = self.verses.len().saturating_sub(1);
    }

    /// Follow a verse permalink within the loaded chapter
    pub fn navigate(&mut self, path: &str) -> bool {
        let Some(route) = VerseRoute::parse(path) else {
            return false;
        };
        match find_verse(&self.verses, route.chapter_id, route.verse_number) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// Apply a queued collaborator call. Returns true when playback changed.
    pub fn apply(&mut self, action: VerseAction) -> bool {
        tracing::debug!(?action, "Applying verse action");
        match action {
            VerseAction::Pause => {
                let was_playing = self.playback.is_playing;
                self.playback.is_playing = false;
                was_playing
            }
            VerseAction::SetActiveVerse(verse_key) => {
                self.playback.current_verse = Some(verse_key);
                self.playback.current_word = None;
                true
            }
            VerseAction::SetCurrentWord { verse_key, position } => {
                self.playback.current_verse = Some(verse_key);
                self.playback.current_word = Some(position);
                true
            }
            VerseAction::Play => {
                if self.playback.current_verse.is_none() {
                    return false;
                }
                self.playback.is_playing = true;
                if self.playback.current_word.is_none() {
                    self.playback.current_word = Some(0);
                }
                true
            }
            VerseAction::AddBookmark(verse_key) => {
                if self.config.add_bookmark(&verse_key) {
                    self.save_config();
                    self.status = Some(format!("Bookmarked {}", verse_key));
                }
                false
            }
            VerseAction::RemoveBookmark(verse_key) => {
                if self.config.remove_bookmark(&verse_key) {
                    self.save_config();
                    self.status = Some(format!("Removed bookmark {}", verse_key));
                }
                false
            }
            VerseAction::LoadTafsirs { verse_key, prompt } => {
                let mut state = ListState::default();
                if !self.tafsirs.is_empty() {
                    state.select(Some(0));
                }
                self.tafsir_picker = Some(TafsirPicker {
                    verse_key,
                    prompt,
                    state,
                });
                false
            }
        }
    }

    /// Advance the simulated audio by one word. Returns true when playback changed.
    pub fn tick(&mut self) -> bool {
        if !self.playback.is_playing {
            return false;
        }
        let Some(idx) = self.current_verse_index() else {
            self.playback.is_playing = false;
            return true;
        };

        let word_count = self.verses[idx]
            .words
            .as_deref()
            .map(|words| word_audio_positions(words).into_iter().flatten().count())
            .unwrap_or(0) as u32;
        let next_word = self.playback.current_word.map_or(0, |w| w + 1);

        if next_word < word_count {
            self.playback.current_word = Some(next_word);
        } else if let Some(next) = self.verses.get(idx + 1) {
            self.playback.current_verse = Some(next.verse_key.clone());
            self.playback.current_word = Some(0);
        } else {
            tracing::info!("Reached end of chapter, stopping playback");
            self.playback.is_playing = false;
            self.playback.current_word = None;
        }
        true
    }

    pub fn current_verse_index(&self) -> Option<usize> {
        let key = self.playback.current_verse.as_deref()?;
        self.verses.iter().position(|v| v.verse_key == key)
    }

    pub fn on_activation(&mut self, activation: Activation) {
        match activation {
            Activation::Navigate(link) => {
                tracing::info!(path = %link.path, metric = link.metric, "Verse link followed");
                if self.navigate(&link.path) {
                    self.status = Some(link.path);
                }
            }
            Activation::Copied { verse_key } => {
                self.status = Some(format!("Copied {}", verse_key));
            }
            Activation::CopyFailed(err) => {
                self.status = Some(format!("Copy failed: {}", err));
            }
            Activation::Share(links) => {
                self.status = links
                    .iter()
                    .map(|link| format!("{}: {}", link.network.display_name(), link.url))
                    .reduce(|a, b| format!("{}  {}", a, b));
            }
            Activation::Unavailable(kind) => {
                let name = match kind {
                    ControlKind::Copy => "Copy",
                    ControlKind::Share => "Share",
                    _ => "Control",
                };
                self.status = Some(format!("{} is not available yet", name));
            }
            Activation::Play
            | Activation::SeekWord(_)
            | Activation::Tafsir
            | Activation::Bookmark { .. } => {}
        }
    }

    // Tafsir picker
    pub fn picker_nav_down(&mut self) {
        let len = self.tafsirs.len();
        if let Some(picker) = &mut self.tafsir_picker {
            if len > 0 {
                let i = picker.state.selected().unwrap_or(0);
                picker.state.select(Some((i + 1).min(len - 1)));
            }
        }
    }

    pub fn picker_nav_up(&mut self) {
        if let Some(picker) = &mut self.tafsir_picker {
            let i = picker.state.selected().unwrap_or(0);
            picker.state.select(Some(i.saturating_sub(1)));
        }
    }

    pub fn picker_confirm(&mut self) {
        if let Some(picker) = self.tafsir_picker.take() {
            let chosen = picker.state.selected().and_then(|i| self.tafsirs.get(i));
            if let Some(tafsir) = chosen {
                tracing::info!(verse_key = %picker.verse_key, tafsir = tafsir.id, "Tafsir selected");
                self.status = Some(format!("{} for {}", tafsir.name, picker.verse_key));
            }
        }
    }

    pub fn picker_cancel(&mut self) {
        self.tafsir_picker = None;
    }

    fn save_config(&mut self) {
        if let Err(e) = self.config.save_to(&self.config_path) {
            tracing::warn!("Failed to save bookmarks: {:#}", e);
            self.status = Some(format!("Could not save bookmarks: {}", e));
        }
    }
}

/// Keep verses with a translation containing `query` (case-insensitive), with those translations as matches
fn filter_verses(
    verses: Vec<Arc<Verse>>,
    query: &str,
) -> (Vec<Arc<Verse>>, Vec<Option<Vec<Translation>>>) {
    let query_lower = query.to_lowercase();
    verses
        .into_iter()
        .filter_map(|verse| {
            let matched: Vec<Translation> = verse
                .translations
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|t| t.text.to_lowercase().contains(&query_lower))
                .cloned()
                .collect();
            if matched.is_empty() {
                None
            } else {
                Some((verse, Some(matched)))
            }
        })
        .unzip()
}

pub struct App {
    pub state: ReaderState,
    pub views: Vec<VerseView>,
    pub widgets: VerseWidgets,
    pub dispatcher: ActionDispatcher,
    pub actions: mpsc::UnboundedReceiver<VerseAction>,
    pub messages: Messages,

    // Verse areas for mouse hit-testing (updated during render)
    pub verse_areas: Vec<(usize, Rect)>,
}

impl App {
    pub fn new(state: ReaderState, widgets: VerseWidgets, messages: Messages) -> Self {
        let (dispatcher, actions) = ActionDispatcher::channel();
        let views = state.verses.iter().map(|_| VerseView::new()).collect();

        Self {
            state,
            views,
            widgets,
            dispatcher,
            actions,
            messages,
            verse_areas: Vec::new(),
        }
    }

    /// Apply everything the verse views queued since the last frame
    pub fn drain_actions(&mut self) {
        let mut playback_changed = false;
        while let Ok(action) = self.actions.try_recv() {
            playback_changed |= self.state.apply(action);
        }
        if playback_changed {
            self.invalidate_views();
        }
    }

    pub fn tick(&mut self) {
        if self.state.tick() {
            self.invalidate_views();
        }
    }

    /// Playback flags are not part of the verse render key, so a playback
    /// change has to force the rebuild itself
    fn invalidate_views(&mut self) {
        for view in &mut self.views {
            view.invalidate();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DATA: &str = r#"{
        "chapter": { "id": 1, "nameSimple": "Al-Fatihah", "versesCount": 3 },
        "verses": [
            {
                "verseKey": "1:1", "chapterId": 1, "verseNumber": 1, "textMadani": "a",
                "words": [
                    { "position": 1, "code": "a", "lineNum": 1, "charType": "word" },
                    { "position": 2, "code": "b", "lineNum": 1, "charType": "word" },
                    { "position": 3, "code": "e", "lineNum": 1, "charType": "end" }
                ],
                "translations": [ { "id": 1, "resourceId": 131, "text": "In the name of God" } ]
            },
            {
                "verseKey": "1:2", "chapterId": 1, "verseNumber": 2, "textMadani": "b",
                "translations": [ { "id": 2, "resourceId": 131, "text": "Praise be to God" } ]
            },
            {
                "verseKey": "1:3", "chapterId": 1, "verseNumber": 3, "textMadani": "c",
                "translations": [ { "id": 3, "resourceId": 131, "text": "The Most Merciful" } ]
            }
        ],
        "tafsirs": [ { "id": 169, "name": "Ibn Kathir" }, { "id": 168, "name": "Ma'arif al-Qur'an" } ]
    }"#;

    fn state_with(options: ReaderOptions, dir: &tempfile::TempDir) -> ReaderState {
        let data = ChapterData::from_json(DATA).unwrap();
        let mut config = Config::new();
        config.user = Some("reader".to_string());
        ReaderState::new(data, config, dir.path().join("config.json"), &options)
    }

    #[test]
    fn test_play_flow_through_actions() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);

        assert!(state.apply(VerseAction::SetActiveVerse("1:2".into())));
        assert!(state.apply(VerseAction::Play));
        assert_eq!(state.playback.current_verse.as_deref(), Some("1:2"));
        assert!(state.playback.is_playing);

        let props = state.props(1);
        assert!(props.is_current_verse);
        assert!(props.is_verse_playing());
        assert!(!state.props(0).is_current_verse);
        assert_eq!(state.props(0).current_word, None);

        assert!(state.apply(VerseAction::Pause));
        assert!(!state.playback.is_playing);
        assert!(!state.apply(VerseAction::Pause));
    }

    #[test]
    fn test_word_click_moves_cursor_without_playing() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);

        assert!(state.apply(VerseAction::SetCurrentWord {
            verse_key: "1:1".into(),
            position: 1,
        }));
        assert_eq!(state.playback.current_verse.as_deref(), Some("1:1"));
        assert_eq!(state.props(0).current_word, Some(1));
        assert!(!state.playback.is_playing);

        // Playing from there keeps the chosen word
        state.apply(VerseAction::Play);
        assert_eq!(state.playback.current_word, Some(1));
    }

    #[test]
    fn test_tick_advances_words_then_verses() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);
        state.apply(VerseAction::SetActiveVerse("1:1".into()));
        state.apply(VerseAction::Play);
        assert_eq!(state.playback.current_word, Some(0));

        state.tick();
        assert_eq!(state.playback.current_word, Some(1));
        // Glyph has no audio segment: the next tick moves to the next verse
        state.tick();
        assert_eq!(state.playback.current_verse.as_deref(), Some("1:2"));
        assert_eq!(state.playback.current_word, Some(0));

        state.tick();
        assert_eq!(state.playback.current_verse.as_deref(), Some("1:3"));
        state.tick();
        assert!(!state.playback.is_playing);
        assert!(!state.tick());
    }

    #[test]
    fn test_bookmarks_are_persisted() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);

        state.apply(VerseAction::AddBookmark("1:3".into()));
        assert!(state.props(2).bookmarked);
        let saved = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(saved.bookmarks, vec!["1:3".to_string()]);

        state.apply(VerseAction::RemoveBookmark("1:3".into()));
        assert!(!state.props(2).bookmarked);
        let saved = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert!(saved.bookmarks.is_empty());
    }

    #[test]
    fn test_tafsir_picker() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);

        state.apply(VerseAction::LoadTafsirs {
            verse_key: "1:2".into(),
            prompt: "Select a tafsir".into(),
        });
        assert!(state.tafsir_picker.is_some());
        assert!(!state.props(0).is_focused);

        state.picker_nav_down();
        state.picker_nav_down();
        state.picker_confirm();
        assert!(state.tafsir_picker.is_none());
        assert_eq!(state.status.as_deref(), Some("Ma'arif al-Qur'an for 1:2"));
    }

    #[test]
    fn test_search_filters_and_sets_matches() {
        let dir = tempfile::tempdir().unwrap();
        let options = ReaderOptions {
            search: Some("god".to_string()),
            ..ReaderOptions::default()
        };
        let state = state_with(options, &dir);

        assert_eq!(state.verses.len(), 2);
        assert!(state.is_searched);
        let props = state.props(1);
        assert_eq!(props.matches.map(|m| m.len()), Some(1));
        assert_eq!(props.verse.verse_key, "1:2");
    }

    #[test]
    fn test_navigate_to_permalink() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_with(ReaderOptions::default(), &dir);

        assert!(state.navigate("/1/3?translations=131"));
        assert_eq!(state.selected, 2);
        assert!(!state.navigate("/2/1?translations="));
        assert_eq!(state.selected, 2);
    }

    #[test]
    fn test_drain_actions_invalidates_on_playback() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with(ReaderOptions::default(), &dir);
        let widgets = VerseWidgets::ready(
            verse_view::widgets::CopyWidget::new(Arc::new(NullClipboard)),
            verse_view::widgets::ShareWidget::default(),
        );
        let mut app = App::new(state, widgets, Messages::default());

        let props = app.state.props(0);
        app.views[0].tree(&props, &app.messages);
        assert_eq!(app.views[0].render_count(), 1);

        verse_view::AudioActions::play(&app.dispatcher);
        app.state.playback.current_verse = Some("1:2".to_string());
        app.drain_actions();

        let props = app.state.props(0);
        app.views[0].tree(&props, &app.messages);
        assert_eq!(app.views[0].render_count(), 2);
    }

    struct NullClipboard;

    impl verse_view::widgets::ClipboardSink for NullClipboard {
        fn set_text(&self, _text: String) -> anyhow::Result<()> {
            Ok(())
        }
    }
}
