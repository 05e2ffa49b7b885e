//! Deferred widget loading
//!
//! A `LazyWidget` starts its loader the first time anybody reads its state and
//! publishes the outcome through a `watch` channel. Readers only ever see a
//! snapshot; the load is never retried or cancelled.

use anyhow::Result;
use futures_util::future::{BoxFuture, FutureExt};
use std::future::Future;
use std::sync::OnceLock;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState<T> {
    Pending,
    Ready(T),
    Failed(String),
}

impl<T> LoadState<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, LoadState::Pending)
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, LoadState::Ready(_))
    }
}

type Loader<T> = Box<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

pub struct LazyWidget<T> {
    name: &'static str,
    loader: Option<Loader<T>>,
    state: OnceLock<watch::Receiver<LoadState<T>>>,
}

impl<T> std::fmt::Debug for LazyWidget<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LazyWidget")
            .field("name", &self.name)
            .field("started", &self.state.get().is_some())
            .finish()
    }
}

impl<T: Clone + Send + Sync + 'static> LazyWidget<T> {
    pub fn new<F, Fut>(name: &'static str, loader: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            name,
            loader: Some(Box::new(move || loader().boxed())),
            state: OnceLock::new(),
        }
    }

    /// A widget that is already loaded
    pub fn ready(name: &'static str, value: T) -> Self {
        let (_tx, rx) = watch::channel(LoadState::Ready(value));
        let state = OnceLock::new();
        let _ = state.set(rx);
        Self {
            name,
            loader: None,
            state,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Current snapshot. Starts the load on first call.
    pub fn state(&self) -> LoadState<T> {
        self.receiver().borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.receiver().borrow().is_ready()
    }

    pub fn get(&self) -> Option<T> {
        match &*self.receiver().borrow() {
            LoadState::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    /// Wait until the load settles
    pub async fn loaded(&self) -> LoadState<T> {
        let mut rx = self.receiver().clone();
        let _ = rx.wait_for(|state| !state.is_pending()).await;
        let state = rx.borrow().clone();
        if state.is_pending() {
            // Loader task went away without reporting
            return LoadState::Failed(format!("{} loader stopped", self.name));
        }
        state
    }

    fn receiver(&self) -> &watch::Receiver<LoadState<T>> {
        self.state.get_or_init(|| self.start())
    }

    fn start(&self) -> watch::Receiver<LoadState<T>> {
        let (tx, rx) = watch::channel(LoadState::Pending);
        let name = self.name;

        let Some(loader) = &self.loader else {
            let _ = tx.send(LoadState::Failed(format!("{} has no loader", name)));
            return rx;
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                tracing::warn!(widget = name, "No async runtime to load widget");
                let _ = tx.send(LoadState::Failed("no async runtime".to_string()));
                return rx;
            }
        };

        tracing::debug!(widget = name, "Loading widget");
        let fut = loader();
        handle.spawn(async move {
            let state = match fut.await {
                Ok(value) => {
                    tracing::debug!(widget = name, "Widget ready");
                    LoadState::Ready(value)
                }
                Err(e) => {
                    tracing::warn!(widget = name, "Widget failed to load: {:#}", e);
                    LoadState::Failed(format!("{:#}", e))
                }
            };
            let _ = tx.send(state);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_ready_widget_is_ready_without_runtime() {
        let widget = LazyWidget::ready("copy", 7u32);
        assert!(widget.is_ready());
        assert_eq!(widget.get(), Some(7));
        assert_eq!(widget.state(), LoadState::Ready(7));
    }

    #[test]
    fn test_load_without_runtime_fails() {
        let widget = LazyWidget::new("share", || async { Ok(1u32) });
        assert!(matches!(widget.state(), LoadState::Failed(_)));
    }

    #[tokio::test]
    async fn test_loader_starts_on_first_read_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let widget = LazyWidget::new("copy", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok("loaded".to_string()) }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let _ = widget.state();
        let _ = widget.state();
        assert_eq!(widget.loaded().await, LoadState::Ready("loaded".to_string()));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pending_until_loader_finishes() {
        let widget: LazyWidget<u32> =
            LazyWidget::new("share", || std::future::pending::<Result<u32>>());
        assert!(widget.state().is_pending());
        assert!(!widget.is_ready());
        assert_eq!(widget.get(), None);
    }

    #[tokio::test]
    async fn test_failed_load_reports_error() {
        let widget: LazyWidget<u32> =
            LazyWidget::new("copy", || async { Err(anyhow!("clipboard unavailable")) });
        match widget.loaded().await {
            LoadState::Failed(msg) => assert!(msg.contains("clipboard unavailable")),
            other => panic!("unexpected state {:?}", other),
        }
    }
}
