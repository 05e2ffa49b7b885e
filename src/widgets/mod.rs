//! Secondary verse widgets, loaded on first use

pub mod copy;
pub mod share;

pub use copy::{ClipboardSink, CopyWidget, SystemClipboard};
pub use share::{Network, ShareLink, ShareWidget};

use crate::lazy::LazyWidget;

/// The lazily loaded widgets every verse view in a list shares
#[derive(Debug)]
pub struct VerseWidgets {
    pub copy: LazyWidget<CopyWidget>,
    pub share: LazyWidget<ShareWidget>,
}

impl VerseWidgets {
    /// System clipboard and share links against `base_url`
    pub fn system(base_url: &str) -> Self {
        let base_url = base_url.to_string();
        Self {
            copy: LazyWidget::new("copy", || async {
                tokio::task::spawn_blocking(CopyWidget::system).await?
            }),
            share: LazyWidget::new("share", move || {
                let widget = ShareWidget::new(&base_url);
                async move { Ok(widget) }
            }),
        }
    }

    pub fn ready(copy: CopyWidget, share: ShareWidget) -> Self {
        Self {
            copy: LazyWidget::ready("copy", copy),
            share: LazyWidget::ready("share", share),
        }
    }
}
