use anyhow::{anyhow, Context, Result};
use std::sync::{Arc, Mutex};

/// Destination for copied verse text
pub trait ClipboardSink: Send + Sync {
    fn set_text(&self, text: String) -> Result<()>;
}

/// The system clipboard, through arboard
pub struct SystemClipboard {
    inner: Mutex<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn open() -> Result<Self> {
        let clipboard = arboard::Clipboard::new().context("Could not open the system clipboard")?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&self, text: String) -> Result<()> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Clipboard lock poisoned"))?;
        clipboard.set_text(text)?;
        Ok(())
    }
}

/// Copies a verse's Madani text to the clipboard
#[derive(Clone)]
pub struct CopyWidget {
    sink: Arc<dyn ClipboardSink>,
}

impl std::fmt::Debug for CopyWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CopyWidget").finish_non_exhaustive()
    }
}

impl CopyWidget {
    pub fn new(sink: Arc<dyn ClipboardSink>) -> Self {
        Self { sink }
    }

    pub fn system() -> Result<Self> {
        Ok(Self::new(Arc::new(SystemClipboard::open()?)))
    }

    pub fn copy(&self, text: &str, verse_key: &str) -> Result<()> {
        self.sink
            .set_text(text.to_string())
            .with_context(|| format!("Failed to copy verse {}", verse_key))?;
        tracing::info!(verse_key, "Copied verse text");
        Ok(())
    }
}

/// In-memory sink for tests
#[cfg(test)]
#[derive(Debug, Default)]
pub(crate) struct MemoryClipboard {
    pub contents: Mutex<Vec<String>>,
}

#[cfg(test)]
impl ClipboardSink for MemoryClipboard {
    fn set_text(&self, text: String) -> Result<()> {
        self.contents.lock().unwrap().push(text);
        Ok(())
    }
}
