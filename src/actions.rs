//! Collaborator interfaces a verse view calls into
//!
//! The view never owns playback, bookmark or tafsir state. It receives these
//! capabilities from its host and invokes them fire-and-forget.

use tokio::sync::mpsc;

use crate::model::Verse;

pub trait AudioActions {
    fn pause(&self);
    fn set_active_verse(&self, verse_key: &str);
    fn play(&self);
    /// Move the audio cursor to a word, by its audio position within the verse
    fn set_current_word(&self, verse_key: &str, position: u32);
}

pub trait BookmarkActions {
    fn add_bookmark(&self, verse_key: &str);
    fn remove_bookmark(&self, verse_key: &str);
}

pub trait TafsirLoader {
    fn load_tafsirs(&self, verse: &Verse, prompt: &str);
}

/// A collaborator call, as queued for the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseAction {
    Pause,
    SetActiveVerse(String),
    Play,
    SetCurrentWord { verse_key: String, position: u32 },
    AddBookmark(String),
    RemoveBookmark(String),
    LoadTafsirs { verse_key: String, prompt: String },
}

/// Implements every collaborator trait by queueing a `VerseAction` on an
/// unbounded channel that the host drains in its event loop.
#[derive(Debug, Clone)]
pub struct ActionDispatcher {
    tx: mpsc::UnboundedSender<VerseAction>,
}

impl ActionDispatcher {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<VerseAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, action: VerseAction) {
        if self.tx.send(action).is_err() {
            tracing::warn!("Action receiver dropped, discarding verse action");
        }
    }
}

impl AudioActions for ActionDispatcher {
    fn pause(&self) {
        self.send(VerseAction::Pause);
    }

    fn set_active_verse(&self, verse_key: &str) {
        self.send(VerseAction::SetActiveVerse(verse_key.to_string()));
    }

    fn play(&self) {
        self.send(VerseAction::Play);
    }

    fn set_current_word(&self, verse_key: &str, position: u32) {
        self.send(VerseAction::SetCurrentWord {
            verse_key: verse_key.to_string(),
            position,
        });
    }
}

impl BookmarkActions for ActionDispatcher {
    fn add_bookmark(&self, verse_key: &str) {
        self.send(VerseAction::AddBookmark(verse_key.to_string()));
    }

    fn remove_bookmark(&self, verse_key: &str) {
        self.send(VerseAction::RemoveBookmark(verse_key.to_string()));
    }
}

impl TafsirLoader for ActionDispatcher {
    fn load_tafsirs(&self, verse: &Verse, prompt: &str) {
        self.send(VerseAction::LoadTafsirs {
            verse_key: verse.verse_key.clone(),
            prompt: prompt.to_string(),
        });
    }
}

/// Records every collaborator call in order. Used by tests across the crate.
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub calls: std::cell::RefCell<Vec<VerseAction>>,
}

#[cfg(test)]
impl Recorder {
    pub fn take(&self) -> Vec<VerseAction> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }
}

#[cfg(test)]
impl AudioActions for Recorder {
    fn pause(&self) {
        self.calls.borrow_mut().push(VerseAction::Pause);
    }

    fn set_active_verse(&self, verse_key: &str) {
        self.calls
            .borrow_mut()
            .push(VerseAction::SetActiveVerse(verse_key.to_string()));
    }

    fn play(&self) {
        self.calls.borrow_mut().push(VerseAction::Play);
    }

    fn set_current_word(&self, verse_key: &str, position: u32) {
        self.calls.borrow_mut().push(VerseAction::SetCurrentWord {
            verse_key: verse_key.to_string(),
            position,
        });
    }
}

#[cfg(test)]
impl BookmarkActions for Recorder {
    fn add_bookmark(&self, verse_key: &str) {
        self.calls
            .borrow_mut()
            .push(VerseAction::AddBookmark(verse_key.to_string()));
    }

    fn remove_bookmark(&self, verse_key: &str) {
        self.calls
            .borrow_mut()
            .push(VerseAction::RemoveBookmark(verse_key.to_string()));
    }
}

#[cfg(test)]
impl TafsirLoader for Recorder {
    fn load_tafsirs(&self, verse: &Verse, prompt: &str) {
        self.calls.borrow_mut().push(VerseAction::LoadTafsirs {
            verse_key: verse.verse_key.clone(),
            prompt: prompt.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fixtures;

    #[test]
    fn test_dispatcher_queues_actions_in_order() {
        let (dispatcher, mut rx) = ActionDispatcher::channel();
        let verse = fixtures::verse_2_5();

        dispatcher.pause();
        dispatcher.set_active_verse("2:5");
        dispatcher.play();
        dispatcher.set_current_word("2:5", 2);
        dispatcher.add_bookmark("2:5");
        dispatcher.load_tafsirs(&verse, "Select a tafsir");

        assert_eq!(rx.try_recv().unwrap(), VerseAction::Pause);
        assert_eq!(rx.try_recv().unwrap(), VerseAction::SetActiveVerse("2:5".into()));
        assert_eq!(rx.try_recv().unwrap(), VerseAction::Play);
        assert_eq!(
            rx.try_recv().unwrap(),
            VerseAction::SetCurrentWord {
                verse_key: "2:5".into(),
                position: 2
            }
        );
        assert_eq!(rx.try_recv().unwrap(), VerseAction::AddBookmark("2:5".into()));
        assert_eq!(
            rx.try_recv().unwrap(),
            VerseAction::LoadTafsirs {
                verse_key: "2:5".into(),
                prompt: "Select a tafsir".into()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_dispatcher_survives_dropped_receiver() {
        let (dispatcher, rx) = ActionDispatcher::channel();
        drop(rx);
        dispatcher.remove_bookmark("1:1");
    }
}
