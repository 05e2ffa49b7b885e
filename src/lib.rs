pub mod actions;
pub mod config;
pub mod lazy;
pub mod messages;
pub mod model;
pub mod routing;
pub mod verse_view;
pub mod widgets;

// Re-export main types for convenience
pub use actions::{ActionDispatcher, AudioActions, BookmarkActions, TafsirLoader, VerseAction};
pub use config::Config;
pub use lazy::{LazyWidget, LoadState};
pub use messages::{DefaultMessages, MessageFormatter, Messages};
pub use model::{find_verse, load_chapter, Chapter, ChapterData, CharType, Tafsir, TooltipKind, Translation, Verse, Word};
pub use routing::{VerseLink, VerseRoute};
pub use verse_view::{Activation, ControlKind, VerseHandlers, VerseProps, VerseView};
pub use widgets::VerseWidgets;
