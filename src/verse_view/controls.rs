use crate::actions::AudioActions;
use crate::lazy::LoadState;
use crate::messages::{self, MessageFormatter};
use crate::routing::VerseLink;
use crate::widgets::{ShareLink, VerseWidgets};

use super::props::{VerseHandlers, VerseProps};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControlKind {
    Badge,
    Play,
    Copy,
    Tafsir,
    Bookmark,
    Share,
}

impl ControlKind {
    /// Display order in the controls column
    pub fn all() -> [ControlKind; 6] {
        [
            ControlKind::Badge,
            ControlKind::Play,
            ControlKind::Copy,
            ControlKind::Tafsir,
            ControlKind::Bookmark,
            ControlKind::Share,
        ]
    }

    pub fn from_key(c: char) -> Option<Self> {
        match c {
            'l' => Some(ControlKind::Badge),
            'p' => Some(ControlKind::Play),
            'y' => Some(ControlKind::Copy),
            't' => Some(ControlKind::Tafsir),
            'b' => Some(ControlKind::Bookmark),
            's' => Some(ControlKind::Share),
            _ => None,
        }
    }

    /// Whether this control exists for the given flags
    pub fn is_visible(&self, props: &VerseProps<'_>) -> bool {
        match self {
            ControlKind::Badge | ControlKind::Tafsir => true,
            ControlKind::Play | ControlKind::Copy | ControlKind::Share => {
                !props.is_pdf && !props.is_searched
            }
            ControlKind::Bookmark => !props.is_searched && props.is_authenticated,
        }
    }
}

/// One entry of the controls column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Badge { verse_key: String, link: VerseLink },
    Play { playing: bool, label: String },
    Copy { label: String, copied_label: String },
    Tafsir { label: String },
    Bookmark { bookmarked: bool, label: String },
    Share { label: String },
}

impl Control {
    pub fn kind(&self) -> ControlKind {
        match self {
            Control::Badge { .. } => ControlKind::Badge,
            Control::Play { .. } => ControlKind::Play,
            Control::Copy { .. } => ControlKind::Copy,
            Control::Tafsir { .. } => ControlKind::Tafsir,
            Control::Bookmark { .. } => ControlKind::Bookmark,
            Control::Share { .. } => ControlKind::Share,
        }
    }
}

/// Decide the controls column, in display order
pub fn controls(props: &VerseProps<'_>, messages: &dyn MessageFormatter) -> Vec<Control> {
    let verse = props.verse;

    ControlKind::all()
        .into_iter()
        .filter(|kind| kind.is_visible(props))
        .map(|kind| match kind {
            ControlKind::Badge => Control::Badge {
                verse_key: verse.verse_key.clone(),
                link: VerseLink::for_verse(verse, props.is_searched),
            },
            ControlKind::Play => {
                let playing = props.is_verse_playing();
                Control::Play {
                    playing,
                    label: messages.text(if playing { messages::PAUSE } else { messages::PLAY }),
                }
            }
            ControlKind::Copy => Control::Copy {
                label: messages.text(messages::COPY),
                copied_label: messages.text(messages::COPIED),
            },
            ControlKind::Tafsir => Control::Tafsir {
                label: messages.text(messages::TAFSIR),
            },
            ControlKind::Bookmark => Control::Bookmark {
                bookmarked: props.bookmarked,
                label: messages.text(if props.bookmarked {
                    messages::BOOKMARKED
                } else {
                    messages::BOOKMARK
                }),
            },
            ControlKind::Share => Control::Share {
                label: messages.text(messages::SHARE),
            },
        })
        .collect()
}

/// Play-control click.
///
/// Pauses first whenever something is playing, then stops if this verse is
/// already the active one. Otherwise makes it active and starts playback.
pub fn handle_play(
    verse_key: &str,
    is_playing: bool,
    is_current_verse: bool,
    audio: &dyn AudioActions,
) {
    if is_playing {
        audio.pause();
    }

    if is_current_verse {
        tracing::debug!(verse_key, "Play on current verse, not restarting");
        return;
    }

    tracing::debug!(verse_key, "Starting playback");
    audio.set_active_verse(verse_key);
    audio.play();
}

/// What a control activation did, for the host's status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    Navigate(VerseLink),
    Play,
    /// A word was clicked; the audio cursor moved to this position
    SeekWord(u32),
    Copied { verse_key: String },
    CopyFailed(String),
    Tafsir,
    Bookmark { added: bool },
    Share(Vec<ShareLink>),
    /// The control's widget is still loading or failed to load
    Unavailable(ControlKind),
}

/// Run the control's action. Controls hidden for the current flags do nothing.
pub fn activate(
    kind: ControlKind,
    props: &VerseProps<'_>,
    handlers: &VerseHandlers<'_>,
    widgets: &VerseWidgets,
) -> Option<Activation> {
    if !kind.is_visible(props) {
        return None;
    }

    let verse = props.verse;
    let activation = match kind {
        ControlKind::Badge => Activation::Navigate(VerseLink::for_verse(verse, props.is_searched)),
        ControlKind::Play => {
            handle_play(
                &verse.verse_key,
                props.is_playing,
                props.is_current_verse,
                handlers.audio,
            );
            Activation::Play
        }
        ControlKind::Copy => match widgets.copy.state() {
            LoadState::Ready(widget) => match widget.copy(&verse.text_madani, &verse.verse_key) {
                Ok(()) => Activation::Copied {
                    verse_key: verse.verse_key.clone(),
                },
                Err(e) => Activation::CopyFailed(format!("{:#}", e)),
            },
            _ => Activation::Unavailable(ControlKind::Copy),
        },
        ControlKind::Tafsir => {
            let prompt = handlers.messages.text(messages::TAFSIR_SELECT);
            handlers.tafsirs.load_tafsirs(verse, &prompt);
            Activation::Tafsir
        }
        ControlKind::Bookmark => {
            if props.bookmarked {
                handlers.bookmarks.remove_bookmark(&verse.verse_key);
            } else {
                handlers.bookmarks.add_bookmark(&verse.verse_key);
            }
            Activation::Bookmark {
                added: !props.bookmarked,
            }
        }
        ControlKind::Share => match widgets.share.state() {
            LoadState::Ready(widget) => Activation::Share(widget.links(props.chapter, verse)),
            _ => Activation::Unavailable(ControlKind::Share),
        },
    };

    Some(activation)
}
