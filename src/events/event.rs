//! # Runtime events emitted by controllers and the registry.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Registry events**: controller creation and disposal
//! - **Load events**: load flow of one controller (started, completed, failed, stale)
//! - **Delivery events**: renderer and subscriber failures
//!
//! The [`Event`] struct carries additional metadata such as timestamps, placement key,
//! ad unit, load generation and reasons.
//!
//! Host notifications (`loading`, `loadCompleted`, `loadError`) travel over the
//! controller's transport channel; events are the observability copy of the same
//! transitions plus everything the host never sees.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use admob_native::{Event, EventKind, LoadSource};
//!
//! let ev = Event::new(EventKind::LoadCompleted)
//!     .with_controller("home")
//!     .with_ad_unit("unit-1")
//!     .with_generation(2)
//!     .with_source(LoadSource::Cache);
//!
//! assert_eq!(ev.kind, EventKind::LoadCompleted);
//! assert_eq!(ev.controller.as_deref(), Some("home"));
//! assert_eq!(ev.source, Some(LoadSource::Cache));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Delivery events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `controller`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `controller`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    /// A renderer callback panicked during fan-out; other renderers still received it.
    ///
    /// Sets:
    /// - `controller`: placement key
    /// - `reason`: panic info/message
    RendererPanicked,

    // === Registry events ===
    /// A controller was created and registered.
    ///
    /// Sets:
    /// - `controller`: placement key
    ControllerCreated,

    /// A controller was removed from the registry.
    ///
    /// Sets:
    /// - `controller`: placement key
    ControllerDisposed,

    // === Load events ===
    /// A load was handed to the loader.
    ///
    /// Sets:
    /// - `controller`: placement key
    /// - `ad_unit`: requested ad unit
    /// - `generation`: load generation
    LoadStarted,

    /// Content is available (fresh from the loader or replayed from cache).
    ///
    /// Sets:
    /// - `controller`: placement key
    /// - `ad_unit`: ad unit the content belongs to
    /// - `generation`: generation of the load that produced the content
    /// - `source`: `Network` or `Cache`
    LoadCompleted,

    /// The loader reported a failure for the current load.
    ///
    /// Sets:
    /// - `controller`: placement key
    /// - `ad_unit`: requested ad unit
    /// - `generation`: load generation
    /// - `reason`: loader error message
    LoadFailed,

    /// A superseded load resolved and its result was discarded.
    ///
    /// Sets:
    /// - `controller`: placement key
    /// - `ad_unit`: ad unit of the superseded load
    /// - `generation`: generation of the superseded load
    StaleResultIgnored,
}

/// Where the content of a `LoadCompleted` came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Network,
    Cache,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Placement key (or subscriber name for delivery events).
    pub controller: Option<Arc<str>>,
    /// Ad unit the event refers to.
    pub ad_unit: Option<Arc<str>>,
    /// Load generation of the controller.
    pub generation: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
    /// Content origin for `LoadCompleted`.
    pub source: Option<LoadSource>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            controller: None,
            ad_unit: None,
            generation: None,
            reason: None,
            source: None,
        }
    }

    /// Attaches a placement key.
    #[inline]
    pub fn with_controller(mut self, key: impl AsRef<str>) -> Self {
        self.controller = Some(Arc::from(key.as_ref()));
        self
    }

    /// Attaches an ad unit.
    #[inline]
    pub fn with_ad_unit(mut self, unit: impl AsRef<str>) -> Self {
        self.ad_unit = Some(Arc::from(unit.as_ref()));
        self
    }

    /// Attaches a load generation.
    #[inline]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = Some(generation);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Marks where the content came from.
    #[inline]
    pub fn with_source(mut self, source: LoadSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_controller(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_controller(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    #[inline]
    pub fn is_load_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::LoadStarted
                | EventKind::LoadCompleted
                | EventKind::LoadFailed
                | EventKind::StaleResultIgnored
        )
    }
}

/// Extracts a printable message from a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
