//! # AdView: renderer that paints content with typed options.
//!
//! ```text
//! controller fan-out ──► AdView::on_content ──► remember content ──► Paint::paint(content, options)
//! host setOptions    ──► AdView::update_options ──► merge patch ──► repaint last content
//! ```
//!
//! Content with an empty headline is remembered but not painted.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::content::AdContent;
use crate::controller::Renderer;
use crate::error::AdLoadError;
use crate::options::{NativeAdOptions, OptionsPatch};

/// Host drawing surface for one native ad view.
pub trait Paint: Send + Sync + 'static {
    /// Draws `content` styled by `options`.
    fn paint(&self, content: &AdContent, options: &NativeAdOptions);

    /// Nothing to show (a load failed before any content arrived).
    fn hide(&self) {}
}

/// Renderer bound to one host view.
pub struct AdView {
    id: String,
    painter: Arc<dyn Paint>,
    options: Mutex<NativeAdOptions>,
    last: Mutex<Option<Arc<AdContent>>>,
}

impl AdView {
    pub fn new(id: impl Into<String>, options: NativeAdOptions, painter: Arc<dyn Paint>) -> Arc<Self> {
        Arc::new(Self {
            id: id.into(),
            painter,
            options: Mutex::new(options),
            last: Mutex::new(None),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current options.
    pub fn options(&self) -> NativeAdOptions {
        lock(&self.options).clone()
    }

    /// Last content delivered to this view.
    pub fn content(&self) -> Option<Arc<AdContent>> {
        lock(&self.last).clone()
    }

    /// Merges `patch` into the options and repaints the last content, if any.
    pub fn update_options(&self, patch: OptionsPatch) {
        let options = {
            let mut guard = lock(&self.options);
            guard.merge(patch);
            guard.clone()
        };
        if let Some(content) = self.content() {
            self.paint(&content, &options);
        }
    }

    fn paint(&self, content: &AdContent, options: &NativeAdOptions) {
        if !content.is_valid() {
            tracing::debug!(view = %self.id, "content without headline not painted");
            return;
        }
        self.painter.paint(content, options);
    }
}

impl fmt::Debug for AdView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdView")
            .field("id", &self.id)
            .field("options", &*lock(&self.options))
            .field("headline", &lock(&self.last).as_ref().map(|c| c.headline.clone()))
            .finish_non_exhaustive()
    }
}

impl Renderer for AdView {
    fn on_content(&self, content: &Arc<AdContent>) {
        *lock(&self.last) = Some(Arc::clone(content));
        let options = self.options();
        self.paint(content, &options);
    }

    fn on_error(&self, _error: &AdLoadError) {
        if lock(&self.last).is_none() {
            self.painter.hide();
        }
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
