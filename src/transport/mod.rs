//! Host transport seam.
//!
//! ## Contents
//! - [`MethodCall`], [`Command`] inbound named calls and their typed form
//! - [`HostChannel`], [`Transport`] outbound per-controller notification channels
//! - [`QueueTransport`], [`Notification`] channel-backed transport implementation

mod call;
mod channel;

pub use call::{Command, MethodCall};
pub use channel::{HostChannel, Notification, QueueTransport, Transport};
