//! # Event subscribers for the plugin runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out and the
//! built-in [`LogWriter`] for handling runtime events broadcast through the
//! [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   AdController ── publish(Event) ──► Bus ──► subscriber_listener ──► SubscriberSet
//!                                                                          │
//!                                                               ┌──────────┼─────────┐
//!                                                               ▼          ▼         ▼
//!                                                           LogWriter   Metrics   Custom
//! ```

#[cfg(feature = "logging")]
mod log;
mod subscriber;
mod subscriber_set;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use subscriber::Subscribe;
pub use subscriber_set::SubscriberSet;
