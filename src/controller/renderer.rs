//! # Renderer callbacks.
//!
//! A [`Renderer`] is a view-layer consumer of one controller. It receives:
//! - the cached content immediately on subscribe (if any),
//! - every fresh or replayed content afterwards,
//! - load-start and load-failure signals so it can show a spinner or hide itself.
//!
//! Callbacks run synchronously inside the controller's fan-out, on a snapshot of the
//! subscriber list. They must be quick; a renderer may call
//! [`AdController::unsubscribe`](crate::AdController::unsubscribe) from inside a
//! callback. Panics are caught and published as `RendererPanicked`.

use std::sync::Arc;

use crate::content::AdContent;
use crate::error::AdLoadError;

/// View-layer consumer of a controller's content.
pub trait Renderer: Send + Sync + 'static {
    /// New content to display.
    fn on_content(&self, content: &Arc<AdContent>);

    /// A load started; content (if any) is about to be replaced.
    fn on_loading(&self) {}

    /// The current load failed; previously delivered content is still valid to show.
    fn on_error(&self, _error: &AdLoadError) {}
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

/// Closure-backed renderer that only cares about content.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use admob_native::{AdContent, Renderer, RendererFn};
///
/// let r = RendererFn::arc(|ad: &Arc<AdContent>| println!("show {}", ad.headline));
/// r.on_content(&Arc::new(AdContent::new("Hello")));
/// ```
pub struct RendererFn<F> {
    f: F,
}

impl<F> RendererFn<F>
where
    F: Fn(&Arc<AdContent>) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }

    pub fn arc(f: F) -> Arc<Self> {
        Arc::new(Self::new(f))
    }
}

impl<F> Renderer for RendererFn<F>
where
    F: Fn(&Arc<AdContent>) + Send + Sync + 'static,
{
    fn on_content(&self, content: &Arc<AdContent>) {
        (self.f)(content)
    }
}
