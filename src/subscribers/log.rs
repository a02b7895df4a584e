//! # LogWriter: event logger
//!
//! A subscriber that writes incoming [`Event`]s through `tracing`.
//! Install any `tracing` subscriber in the host to see the output.
//!
//! ## Example output
//! ```text
//! INFO  controller="home" [created]
//! DEBUG controller="home" ad_unit="unit-1" generation=1 [load-started]
//! INFO  controller="home" ad_unit="unit-1" generation=1 source=Network [load-completed]
//! WARN  controller="home" ad_unit="unit-2" generation=2 reason="no fill" [load-failed]
//! DEBUG controller="home" ad_unit="unit-1" generation=1 [stale-result-ignored]
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let controller = e.controller.as_deref().unwrap_or("-");
        let ad_unit = e.ad_unit.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("-");

        match e.kind {
            EventKind::ControllerCreated => {
                tracing::info!(seq = e.seq, controller, "[created]");
            }
            EventKind::ControllerDisposed => {
                tracing::info!(seq = e.seq, controller, "[disposed]");
            }
            EventKind::LoadStarted => {
                tracing::debug!(seq = e.seq, controller, ad_unit, generation = ?e.generation, "[load-started]");
            }
            EventKind::LoadCompleted => {
                tracing::info!(
                    seq = e.seq,
                    controller,
                    ad_unit,
                    generation = ?e.generation,
                    source = ?e.source,
                    "[load-completed]"
                );
            }
            EventKind::LoadFailed => {
                tracing::warn!(
                    seq = e.seq,
                    controller,
                    ad_unit,
                    generation = ?e.generation,
                    reason,
                    "[load-failed]"
                );
            }
            EventKind::StaleResultIgnored => {
                tracing::debug!(seq = e.seq, controller, ad_unit, generation = ?e.generation, "[stale-result-ignored]");
            }
            EventKind::RendererPanicked => {
                tracing::error!(seq = e.seq, controller, reason, "[renderer-panicked]");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(seq = e.seq, subscriber = controller, reason, "[subscriber-overflow]");
            }
            EventKind::SubscriberPanicked => {
                tracing::error!(seq = e.seq, subscriber = controller, reason, "[subscriber-panicked]");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
